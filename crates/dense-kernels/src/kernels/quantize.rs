//! Casting and quantization between `u8` and float buffers.
//!
//! # Rounding tiers
//!
//! `round_clamp_f32_to_u8` comes in two tiers with the same signature that
//! differ only in how exact halves are broken:
//!
//! | tier | entry point | `2.5` | `3.5` | rule |
//! |------|-------------|-------|-------|------|
//! | baseline | [`round_clamp_f32_to_u8_baseline`] | 3 | 4 | `floor(x + 0.5)`, ties up |
//! | advanced | [`round_clamp_f32_to_u8_advanced`] | 2 | 4 | ties to even |
//!
//! The tiers produce different bits, so neither is a fallback for the other.
//! Callers choose one explicitly, or resolve a [`RoundingTier`] once at
//! startup and call [`RoundingTier::round_clamp_f32_to_u8`].
//!
//! # Clamping and NaN
//!
//! Clamping is `min(max(x, lower), upper)` using [`f32::max`] and
//! [`f32::min`], which return the non-NaN operand. A NaN input therefore
//! becomes `lower` (0 when quantizing), and if `lower > upper` every output
//! is `upper`.
//!
//! # Example
//!
//! ```
//! use dense_kernels::kernels::quantize::{
//!     cast_u8_to_f32, round_clamp_f32_to_u8_advanced, round_clamp_f32_to_u8_baseline,
//! };
//!
//! let src = [-1.0_f32, 2.5, 3.5, 300.0];
//! let mut baseline = [0_u8; 4];
//! let mut advanced = [0_u8; 4];
//! round_clamp_f32_to_u8_baseline(4, &src, &mut baseline);
//! round_clamp_f32_to_u8_advanced(4, &src, &mut advanced);
//! assert_eq!(baseline, [0, 3, 4, 255]);
//! assert_eq!(advanced, [0, 2, 4, 255]);
//!
//! let mut back = [0.0_f32; 4];
//! cast_u8_to_f32(4, &baseline, &mut back);
//! assert_eq!(back, [0.0, 3.0, 4.0, 255.0]);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::config::Dispatch;
use crate::error::{Error, Result};

/// Smallest representable quantized value.
pub const U8_LOWER: f32 = 0.0;

/// Largest representable quantized value.
pub const U8_UPPER: f32 = 255.0;

/// Tie-breaking rule applied after clamping to `[0, 255]`.
pub trait RoundingPolicy {
    /// Tier name, as accepted by [`RoundingTier`]'s `FromStr`.
    const NAME: &'static str;

    /// Name of the quantization kernel using this rule, used in logs.
    const KERNEL: &'static str;

    /// Rounds a clamped, non-NaN value to an integral `f32`.
    fn round(x: f32) -> f32;
}

/// Baseline tier: add one half and take the floor, so ties round up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundHalfUp;

impl RoundingPolicy for RoundHalfUp {
    const NAME: &'static str = "baseline";
    const KERNEL: &'static str = "round_clamp_f32_to_u8_baseline";

    #[inline]
    fn round(x: f32) -> f32 {
        (x + 0.5).floor()
    }
}

/// Advanced tier: IEEE-754 round-half-to-even.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundHalfEven;

impl RoundingPolicy for RoundHalfEven {
    const NAME: &'static str = "advanced";
    const KERNEL: &'static str = "round_clamp_f32_to_u8_advanced";

    #[inline]
    fn round(x: f32) -> f32 {
        x.round_ties_even()
    }
}

/// Rounding tier selected by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RoundingTier {
    /// Ties round up ([`RoundHalfUp`]).
    #[default]
    Baseline,
    /// Ties round to even ([`RoundHalfEven`]).
    Advanced,
}

impl RoundingTier {
    /// Quantizes with this tier's tie rule.
    #[inline]
    pub fn round_clamp_f32_to_u8(self, dim: usize, src: &[f32], dst: &mut [u8]) {
        self.round_clamp_f32_to_u8_with(&Dispatch::default(), dim, src, dst);
    }

    /// [`RoundingTier::round_clamp_f32_to_u8`] with an explicit execution strategy.
    pub fn round_clamp_f32_to_u8_with(self, dispatch: &Dispatch, dim: usize, src: &[f32], dst: &mut [u8]) {
        match self {
            Self::Baseline => round_clamp_f32_to_u8_policy::<RoundHalfUp>(dispatch, dim, src, dst),
            Self::Advanced => round_clamp_f32_to_u8_policy::<RoundHalfEven>(dispatch, dim, src, dst),
        }
    }

    /// The tier's configuration name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => RoundHalfUp::NAME,
            Self::Advanced => RoundHalfEven::NAME,
        }
    }
}

impl fmt::Display for RoundingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RoundingTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" => Ok(Self::Baseline),
            "advanced" => Ok(Self::Advanced),
            _ => Err(Error::UnknownRoundingTier { name: s.to_string() }),
        }
    }
}

/// Widens `u8` to `f32`. Exact for every input.
#[inline]
pub fn cast_u8_to_f32(dim: usize, src: &[u8], dst: &mut [f32]) {
    cast_u8_to_f32_with(&Dispatch::default(), dim, src, dst);
}

/// [`cast_u8_to_f32`] with an explicit execution strategy.
pub fn cast_u8_to_f32_with(dispatch: &Dispatch, dim: usize, src: &[u8], dst: &mut [f32]) {
    dispatch.zip_mut("cast_u8_to_f32", &mut dst[..dim], &src[..dim], |dst, src| {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = f32::from(s);
        }
    });
}

/// Widens `u8` to `f64`. Exact for every input.
#[inline]
pub fn cast_u8_to_f64(dim: usize, src: &[u8], dst: &mut [f64]) {
    cast_u8_to_f64_with(&Dispatch::default(), dim, src, dst);
}

/// [`cast_u8_to_f64`] with an explicit execution strategy.
pub fn cast_u8_to_f64_with(dispatch: &Dispatch, dim: usize, src: &[u8], dst: &mut [f64]) {
    dispatch.zip_mut("cast_u8_to_f64", &mut dst[..dim], &src[..dim], |dst, src| {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = f64::from(s);
        }
    });
}

#[inline]
fn clamp(x: f32, lower: f32, upper: f32) -> f32 {
    x.max(lower).min(upper)
}

/// `dst[i] = min(max(src[i], lower), upper)`.
///
/// NaN inputs become `lower`. Unlike [`f32::clamp`] this never panics when
/// `lower > upper`; every output is then `upper`.
#[inline]
pub fn clamp_f32(dim: usize, src: &[f32], dst: &mut [f32], lower: f32, upper: f32) {
    clamp_f32_with(&Dispatch::default(), dim, src, dst, lower, upper);
}

/// [`clamp_f32`] with an explicit execution strategy.
pub fn clamp_f32_with(
    dispatch: &Dispatch,
    dim: usize,
    src: &[f32],
    dst: &mut [f32],
    lower: f32,
    upper: f32,
) {
    dispatch.zip_mut("clamp_f32", &mut dst[..dim], &src[..dim], |dst, src| {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = clamp(s, lower, upper);
        }
    });
}

/// Baseline quantization: clamp to `[0, 255]`, then `floor(x + 0.5)`.
///
/// Exact halves round up: `2.5 -> 3`, `0.5 -> 1`.
#[inline]
pub fn round_clamp_f32_to_u8_baseline(dim: usize, src: &[f32], dst: &mut [u8]) {
    round_clamp_f32_to_u8_policy::<RoundHalfUp>(&Dispatch::default(), dim, src, dst);
}

/// Advanced quantization: clamp to `[0, 255]`, then round half to even.
///
/// Exact halves go to the even neighbour: `2.5 -> 2`, `3.5 -> 4`.
#[inline]
pub fn round_clamp_f32_to_u8_advanced(dim: usize, src: &[f32], dst: &mut [u8]) {
    round_clamp_f32_to_u8_policy::<RoundHalfEven>(&Dispatch::default(), dim, src, dst);
}

/// Quantizes with the tie rule `P` and an explicit execution strategy.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_clamp_f32_to_u8_policy<P: RoundingPolicy>(
    dispatch: &Dispatch,
    dim: usize,
    src: &[f32],
    dst: &mut [u8],
) {
    dispatch.zip_mut(P::KERNEL, &mut dst[..dim], &src[..dim], |dst, src| {
        for (d, &s) in dst.iter_mut().zip(src) {
            // in [0, 255] and integral, so the cast is exact
            *d = P::round(clamp(s, U8_LOWER, U8_UPPER)) as u8;
        }
    });
}
