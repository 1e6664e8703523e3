//! Quantization Example
//!
//! Compares the two rounding tiers on values that straddle the `u8` range,
//! then widens the bytes back to floats.
//!
//! Run with: `cargo run --example quantize -- advanced`

use dense_kernels::kernels::quantize::{cast_u8_to_f32, RoundingTier};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tier: RoundingTier = std::env::args()
        .nth(1)
        .as_deref()
        .unwrap_or("baseline")
        .parse()?;

    let src = [-3.0_f32, 0.5, 1.5, 2.5, 127.49, 127.5, 254.5, 300.0, f32::NAN];
    let mut bytes = [0_u8; 9];
    let mut widened = [0.0_f32; 9];

    tier.round_clamp_f32_to_u8(src.len(), &src, &mut bytes);
    cast_u8_to_f32(bytes.len(), &bytes, &mut widened);

    println!("=== Quantization with the {tier} tier ===");
    println!();
    println!("{:>10} {:>6} {:>10}", "input", "u8", "widened");
    for ((s, b), w) in src.iter().zip(&bytes).zip(&widened) {
        println!("{s:>10.2} {b:>6} {w:>10.1}");
    }

    for other in [RoundingTier::Baseline, RoundingTier::Advanced] {
        let mut out = [0_u8; 9];
        other.round_clamp_f32_to_u8(src.len(), &src, &mut out);
        println!("{other:>9}: {out:?}");
    }

    Ok(())
}
