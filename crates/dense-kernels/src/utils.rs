//! Floating-point comparison helpers.
//!
//! The moment kernels accumulate rounding error over long streams, so exact
//! equality is rarely the right check. These helpers are used by the crate's
//! own tests and are exposed for callers validating their pipelines.
//!
//! # Example
//!
//! ```
//! use dense_kernels::utils::{approx_eq, EPSILON};
//!
//! let a = 1.0 / 3.0;
//! let b = 0.333333333333333;
//! assert!(approx_eq(a, b, EPSILON));
//! ```

use crate::traits::Element;

/// Absolute tolerance for `f64` results of a handful of operations.
pub const EPSILON: f64 = 1e-10;

/// Absolute tolerance for results of long accumulations or `f32` work.
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Returns `true` if `a` and `b` are within `tolerance` of each other,
/// or if both are NaN.
///
/// # Example
///
/// ```
/// use dense_kernels::utils::{approx_eq, EPSILON};
///
/// assert!(approx_eq(1.0, 1.0 + 1e-11, EPSILON));
/// assert!(!approx_eq(1.0, 2.0, EPSILON));
/// assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
/// assert!(!approx_eq(f64::NAN, 1.0, EPSILON));
/// ```
#[inline]
#[must_use]
pub fn approx_eq<T: Element>(a: T, b: T, tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() < tolerance
}

/// Returns `true` if the relative difference between `a` and `b` is below
/// `rel_tolerance`, or if both are NaN.
///
/// # Example
///
/// ```
/// use dense_kernels::utils::approx_eq_relative;
///
/// assert!(approx_eq_relative(1e10, 1e10 + 1.0, 1e-9));
/// assert!(approx_eq_relative(1e-10, 1.000000001e-10, 1e-8));
/// ```
#[inline]
#[must_use]
pub fn approx_eq_relative<T: Element>(a: T, b: T, rel_tolerance: T) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }

    let diff = (a - b).abs();
    let max_abs = a.abs().max(b.abs());

    if max_abs == T::zero() {
        return diff == T::zero();
    }

    diff / max_abs < rel_tolerance
}

/// Largest relative difference between matching elements of two slices.
///
/// Pairs where both sides are zero contribute nothing; any NaN yields NaN.
#[must_use]
pub fn max_relative_error<T: Element>(a: &[T], b: &[T]) -> T {
    a.iter().zip(b).fold(T::zero(), |worst, (&x, &y)| {
        if x.is_nan() || y.is_nan() {
            return T::nan();
        }
        let scale = x.abs().max(y.abs());
        if scale == T::zero() {
            worst
        } else {
            // `max` discards NaN, keep it sticky.
            let err = (x - y).abs() / scale;
            if worst.is_nan() { worst } else { worst.max(err) }
        }
    })
}

/// Number of NaN values in a slice.
///
/// ```
/// use dense_kernels::utils::count_nans;
///
/// assert_eq!(count_nans(&[f64::NAN, 1.0, f64::NAN, 2.0]), 2);
/// ```
#[inline]
#[must_use]
pub fn count_nans<T: Element>(data: &[T]) -> usize {
    data.iter().filter(|x| x.is_nan()).count()
}

/// Number of NaN or infinite values in a slice.
#[inline]
#[must_use]
pub fn count_non_finite<T: Element>(data: &[T]) -> usize {
    data.iter().filter(|x| !x.is_finite()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_basic() {
        assert!(approx_eq(1.0_f64, 1.0, EPSILON));
        assert!(approx_eq(1.0_f64, 1.0 + 1e-11, EPSILON));
        assert!(!approx_eq(1.0_f64, 2.0, EPSILON));
    }

    #[test]
    fn test_approx_eq_nan() {
        assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
        assert!(!approx_eq(f64::NAN, 1.0, EPSILON));
        assert!(!approx_eq(1.0, f64::NAN, EPSILON));
    }

    #[test]
    fn test_approx_eq_infinity() {
        assert!(approx_eq(f64::INFINITY, f64::INFINITY, EPSILON));
        assert!(!approx_eq(f64::INFINITY, f64::NEG_INFINITY, EPSILON));
        assert!(!approx_eq(f64::INFINITY, 1e300, EPSILON));
    }

    #[test]
    fn test_approx_eq_f32() {
        assert!(approx_eq(1.0_f32, 1.0, 1e-5));
        assert!(!approx_eq(1.0_f32, 2.0, 1e-5));
    }

    #[test]
    fn test_approx_eq_relative_zero() {
        assert!(approx_eq_relative(0.0_f64, 0.0, 1e-10));
        assert!(!approx_eq_relative(0.0_f64, 1e-11, 1e-10));
    }

    #[test]
    fn test_max_relative_error() {
        assert_eq!(max_relative_error(&[1.0_f64, 0.0], &[1.0, 0.0]), 0.0);
        let err = max_relative_error(&[100.0_f64, 1.0], &[101.0, 1.0]);
        assert!((err - 1.0 / 101.0).abs() < 1e-15);
        assert!(max_relative_error(&[f64::NAN, 1.0], &[1.0, 1.0]).is_nan());
        assert!(max_relative_error(&[1.0, f64::NAN], &[1.0, 1.0]).is_nan());
    }

    #[test]
    fn test_counts() {
        let data = [f64::NAN, 1.0, f64::INFINITY, 2.0, f64::NAN];
        assert_eq!(count_nans(&data), 2);
        assert_eq!(count_non_finite(&data), 3);
        assert_eq!(count_non_finite(&[1.0_f32, 2.0]), 0);
    }
}
