//! Streaming Moments Example
//!
//! Accumulates per-slot mean, variance, skewness and kurtosis over a stream
//! of sample vectors without keeping the history.
//!
//! Run with: `cargo run --example streaming_moments`

#![allow(clippy::cast_precision_loss)]

use dense_kernels::prelude::*;

fn main() -> Result<()> {
    let dim = 4;
    let count = 1000;

    // Pre-allocate the accumulator state once
    let mut mean = vec![0.0_f64; dim];
    let mut var = vec![0.0_f64; dim];
    let mut cm3 = vec![0.0_f64; dim];
    let mut cm4 = vec![0.0_f64; dim];
    let mut acc = MomentAccumulator::new(&mut mean, &mut var, &mut cm3, &mut cm4)?;

    // Slot 0 uniform, slot 1 right-skewed, slot 2 heavy-tailed, slot 3 constant
    let mut sample = vec![0.0_f64; dim];
    for k in 0..count {
        let u = ((k * 7919) % count) as f64 / count as f64;
        sample[0] = u;
        sample[1] = u * u * u;
        sample[2] = (u - 0.5).powi(5);
        sample[3] = 1.0;
        acc.fold(&sample)?;
    }

    let moments = acc.finalize()?;
    let mut skew = vec![0.0; dim];
    let mut kurt = vec![0.0; dim];
    moments.skewness_into(&mut skew)?;
    moments.excess_kurtosis_into(&mut kurt)?;

    println!("=== Moments over {} samples ===", moments.count());
    println!();
    println!("{:>6} {:>12} {:>12} {:>12} {:>12}", "slot", "mean", "variance", "skewness", "ex.kurt");
    for slot in 0..dim {
        println!(
            "{slot:>6} {:>12.6} {:>12.6} {:>12.4} {:>12.4}",
            moments.mean()[slot],
            moments.variance()[slot],
            skew[slot],
            kurt[slot]
        );
    }
    println!();
    println!("The constant slot has zero variance, so its shape statistics are NaN.");

    Ok(())
}
