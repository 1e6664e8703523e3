//! Dense per-index numeric kernels.
//!
//! Every kernel operates on the first `dim` elements of caller-owned slices,
//! writes its result in place or into a caller-provided destination, and
//! never allocates. Each has a `*_with` twin taking a [`Dispatch`] that
//! decides whether the index range is split across threads.
//!
//! # Kernels
//!
//! - [`moments`]: streaming sum, mean, variance and third/fourth central
//!   moments, with the bias corrections applied after the last sample
//! - [`elementwise`]: fill, copy, scalar and vector arithmetic
//! - [`quantize`]: clamping and rounding `f32` to `u8`, and widening back
//!
//! [`Dispatch`]: crate::config::Dispatch

pub mod elementwise;
pub mod moments;
pub mod quantize;

pub use elementwise::{
    add_scalar, copy, div_scalar, elem_div, elem_ldiv, elem_mult, reciprocal, scale, set_scalar,
    sqrt, square, vector_add, vector_average,
};
pub use moments::{
    increduce_mean, increduce_stats2, increduce_stats4, increduce_sum, postreduce_cm3,
    postreduce_cm4, postreduce_var,
};
pub use quantize::{
    cast_u8_to_f32, cast_u8_to_f64, clamp_f32, round_clamp_f32_to_u8_advanced,
    round_clamp_f32_to_u8_baseline, RoundHalfEven, RoundHalfUp, RoundingPolicy, RoundingTier,
};
