//! Core traits for dense-kernels numeric operations.
//!
//! The float kernels are generic over [`Element`], which abstracts over `f32`
//! and `f64`. The quantizer is the exception: its rounding contract is
//! defined on `f32` and `u8` only.
//!
//! # Example
//!
//! ```
//! use dense_kernels::traits::Element;
//!
//! fn running_mean<T: Element>(samples: &[T]) -> T {
//!     let mut mean = T::zero();
//!     for (prev, &x) in samples.iter().enumerate() {
//!         mean = mean + (x - mean) / T::from_count(prev + 1);
//!     }
//!     mean
//! }
//!
//! assert!((running_mean(&[1.0_f64, 2.0, 3.0]) - 2.0).abs() < 1e-12);
//! ```

use num_traits::{Float, NumCast};

/// A floating-point element of a dense buffer.
///
/// # Type Bounds
///
/// - `Float`: IEEE-754 arithmetic, `sqrt`, NaN/Inf handling
/// - `NumCast`: conversion of sample counts into the element type
/// - `Send + Sync`: buffers can be split across fork-join workers
pub trait Element: Float + NumCast + Copy + Default + Send + Sync + 'static {
    /// Converts a sample count into the element type.
    ///
    /// Every `usize` is representable (possibly rounded) in `f32` and `f64`;
    /// a type that cannot represent the count yields NaN, which then
    /// propagates through the kernel like any other invalid count.
    #[inline]
    #[must_use]
    fn from_count(count: usize) -> Self {
        <Self as NumCast>::from(count).unwrap_or_else(Self::nan)
    }

    /// Converts an `f64` constant into the element type.
    #[inline]
    #[must_use]
    fn constant(value: f64) -> Self {
        <Self as NumCast>::from(value).unwrap_or_else(Self::nan)
    }
}

impl<T: Float + NumCast + Copy + Default + Send + Sync + 'static> Element for T {}
