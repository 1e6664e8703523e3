//! Streaming moment accumulation over sequences of same-shaped vectors.
//!
//! Every kernel treats its buffers as `dim` independent slots and folds one
//! sample vector `x` into running per-slot accumulators. After all samples
//! have been folded, the `postreduce_*` kernels apply the bias corrections
//! once.
//!
//! # Algorithm
//!
//! The single-pass updates generalize Welford's running mean/variance to the
//! third and fourth central moments. With `n = prev_count + 1`,
//! `delta = x - mean` (pre-update mean) and `d = delta / n`:
//!
//! ```text
//! mean += d
//! uvar += delta * (x - mean)                          # post-update mean
//! ucm3 += -3 d uvar + delta (delta^2 - d^2)           # uvar already updated
//! ucm4 += -4 d ucm3 - 6 d^2 uvar + delta (delta^3 - d^3)
//! ```
//!
//! The four updates form a strict chain: each reads the values written
//! earlier in the same step.
//!
//! # State lifecycle
//!
//! 1. Zero every accumulator buffer.
//! 2. Fold sample `k` (0-based) with `prev_count = k`.
//! 3. Finalize once, in the order `postreduce_var`, `postreduce_cm3`,
//!    `postreduce_cm4` (the fourth moment reads the normalized variance).
//!
//! Finalizing twice or folding after finalization corrupts the state. The
//! checked [`MomentAccumulator`](crate::accumulator::MomentAccumulator)
//! enforces this lifecycle.
//!
//! # Preconditions
//!
//! Nothing is validated per element. `postreduce_var` needs `count >= 2`,
//! `postreduce_cm3` needs `count >= 3` and `postreduce_cm4` needs
//! `count >= 4`; smaller counts divide by zero and yield NaN/Inf. Every
//! buffer must hold at least `dim` elements.
//!
//! # Example
//!
//! ```
//! use dense_kernels::kernels::moments::{increduce_stats2, postreduce_var};
//!
//! let mut mean = [0.0_f64; 3];
//! let mut uvar = [0.0_f64; 3];
//!
//! increduce_stats2(3, 0, &[1.0, 2.0, 3.0], &mut mean, &mut uvar);
//! increduce_stats2(3, 1, &[3.0, 4.0, 5.0], &mut mean, &mut uvar);
//! postreduce_var(3, 2, &mut uvar);
//!
//! assert_eq!(mean, [2.0, 3.0, 4.0]);
//! assert_eq!(uvar, [2.0, 2.0, 2.0]);
//! ```
//!
//! # References
//!
//! - Welford, B. P. (1962). "Note on a method for calculating corrected sums
//!   of squares and products". Technometrics. 4 (3): 419-420.
//! - Meng, X. (2015). "Simpler Online Updates for Arbitrary-Order Central
//!   Moments". arXiv:1510.04923.
//! - Klemens, B. (2008). "Modeling with Data", Appendix M.

use crate::config::Dispatch;
use crate::traits::Element;

/// Adds `x` to a running sum: `sum[i] += x[i]`.
#[inline]
pub fn increduce_sum<T: Element>(dim: usize, x: &[T], sum: &mut [T]) {
    increduce_sum_with(&Dispatch::default(), dim, x, sum);
}

/// [`increduce_sum`] with an explicit execution strategy.
pub fn increduce_sum_with<T: Element>(dispatch: &Dispatch, dim: usize, x: &[T], sum: &mut [T]) {
    dispatch.zip_mut("increduce_sum", &mut sum[..dim], &x[..dim], |sum, x| {
        for (s, &x) in sum.iter_mut().zip(x) {
            *s = *s + x;
        }
    });
}

/// Folds `x` into a running mean: `mean[i] += (x[i] - mean[i]) / n` with
/// `n = prev_count + 1`.
///
/// Each step is a bounded correction towards the new sample, so the mean
/// never grows like a raw sum does.
///
/// # Example
///
/// ```
/// use dense_kernels::kernels::moments::increduce_mean;
///
/// let mut mean = [0.0_f32; 2];
/// for (prev_count, x) in [[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]].iter().enumerate() {
///     increduce_mean(2, prev_count, x, &mut mean);
/// }
/// assert!((mean[0] - 2.0).abs() < 1e-6);
/// assert!((mean[1] - 20.0).abs() < 1e-5);
/// ```
#[inline]
pub fn increduce_mean<T: Element>(dim: usize, prev_count: usize, x: &[T], mean: &mut [T]) {
    increduce_mean_with(&Dispatch::default(), dim, prev_count, x, mean);
}

/// [`increduce_mean`] with an explicit execution strategy.
pub fn increduce_mean_with<T: Element>(
    dispatch: &Dispatch,
    dim: usize,
    prev_count: usize,
    x: &[T],
    mean: &mut [T],
) {
    let inv_n = T::from_count(prev_count + 1).recip();
    dispatch.zip_mut("increduce_mean", &mut mean[..dim], &x[..dim], |mean, x| {
        for (m, &x) in mean.iter_mut().zip(x) {
            *m = *m + inv_n * (x - *m);
        }
    });
}

/// Folds `x` into a running mean and an un-normalized sum of squared
/// deviations (Welford).
///
/// The deviation is taken against the mean *before* the update and the
/// second factor against the mean *after* it; swapping either breaks the
/// recurrence.
#[inline]
pub fn increduce_stats2<T: Element>(
    dim: usize,
    prev_count: usize,
    x: &[T],
    mean: &mut [T],
    uvar: &mut [T],
) {
    increduce_stats2_with(&Dispatch::default(), dim, prev_count, x, mean, uvar);
}

/// [`increduce_stats2`] with an explicit execution strategy.
pub fn increduce_stats2_with<T: Element>(
    dispatch: &Dispatch,
    dim: usize,
    prev_count: usize,
    x: &[T],
    mean: &mut [T],
    uvar: &mut [T],
) {
    let inv_n = T::from_count(prev_count + 1).recip();
    dispatch.zip2_mut(
        "increduce_stats2",
        &x[..dim],
        &mut mean[..dim],
        &mut uvar[..dim],
        |x, mean, uvar| stats2_chunk(inv_n, x, mean, uvar),
    );
}

fn stats2_chunk<T: Element>(inv_n: T, x: &[T], mean: &mut [T], uvar: &mut [T]) {
    let len = x.len();
    let (mean, uvar) = (&mut mean[..len], &mut uvar[..len]);
    for i in 0..len {
        let x_i = x[i];
        let delta = x_i - mean[i];
        mean[i] = mean[i] + inv_n * delta;
        uvar[i] = uvar[i] + delta * (x_i - mean[i]);
    }
}

/// Folds `x` into running mean, variance, third and fourth central moment
/// sums (Meng's recurrence).
///
/// `ucm3` is updated with the `uvar` written in this same step, and `ucm4`
/// with the `uvar` and `ucm3` written in this same step.
///
/// # Example
///
/// ```
/// use dense_kernels::kernels::moments::increduce_stats4;
///
/// let samples = [1.0_f64, 2.0, 4.0, 8.0];
/// let (mut mean, mut uvar, mut ucm3, mut ucm4) = ([0.0], [0.0], [0.0], [0.0]);
/// for (prev_count, &x) in samples.iter().enumerate() {
///     increduce_stats4(1, prev_count, &[x], &mut mean, &mut uvar, &mut ucm3, &mut ucm4);
/// }
///
/// // Two-pass sums of powered deviations around the mean 3.75
/// let sum_pow = |p: i32| samples.iter().map(|x| (x - 3.75_f64).powi(p)).sum::<f64>();
/// assert!((mean[0] - 3.75).abs() < 1e-12);
/// assert!((uvar[0] - sum_pow(2)).abs() < 1e-9);
/// assert!((ucm3[0] - sum_pow(3)).abs() < 1e-9);
/// assert!((ucm4[0] - sum_pow(4)).abs() < 1e-9);
/// ```
#[inline]
pub fn increduce_stats4<T: Element>(
    dim: usize,
    prev_count: usize,
    x: &[T],
    mean: &mut [T],
    uvar: &mut [T],
    ucm3: &mut [T],
    ucm4: &mut [T],
) {
    increduce_stats4_with(
        &Dispatch::default(),
        dim,
        prev_count,
        x,
        mean,
        uvar,
        ucm3,
        ucm4,
    );
}

/// [`increduce_stats4`] with an explicit execution strategy.
#[allow(clippy::too_many_arguments)]
pub fn increduce_stats4_with<T: Element>(
    dispatch: &Dispatch,
    dim: usize,
    prev_count: usize,
    x: &[T],
    mean: &mut [T],
    uvar: &mut [T],
    ucm3: &mut [T],
    ucm4: &mut [T],
) {
    let inv_n = T::from_count(prev_count + 1).recip();
    dispatch.zip4_mut(
        "increduce_stats4",
        &x[..dim],
        &mut mean[..dim],
        &mut uvar[..dim],
        &mut ucm3[..dim],
        &mut ucm4[..dim],
        |x, mean, uvar, ucm3, ucm4| stats4_chunk(inv_n, x, mean, uvar, ucm3, ucm4),
    );
}

fn stats4_chunk<T: Element>(
    inv_n: T,
    x: &[T],
    mean: &mut [T],
    uvar: &mut [T],
    ucm3: &mut [T],
    ucm4: &mut [T],
) {
    let three = T::constant(3.0);
    let four = T::constant(4.0);
    let six = T::constant(6.0);

    let len = x.len();
    let (mean, uvar) = (&mut mean[..len], &mut uvar[..len]);
    let (ucm3, ucm4) = (&mut ucm3[..len], &mut ucm4[..len]);
    for i in 0..len {
        let x_i = x[i];
        let delta = x_i - mean[i];
        let d = inv_n * delta;
        let d2 = d * d;
        let delta2 = delta * delta;

        mean[i] = mean[i] + d;
        uvar[i] = uvar[i] + delta * (x_i - mean[i]);
        ucm3[i] = ucm3[i] - three * d * uvar[i] + delta * (delta2 - d2);
        ucm4[i] = ucm4[i] - four * d * ucm3[i] - six * d2 * uvar[i]
            + delta * (delta2 * delta - d2 * d);
    }
}

/// Turns the sum of squared deviations into the Bessel-corrected sample
/// variance: `uvar[i] *= 1 / (count - 1)`.
///
/// Requires `count >= 2`; `count == 1` yields NaN (`0 * inf`).
#[inline]
pub fn postreduce_var<T: Element>(dim: usize, count: usize, uvar: &mut [T]) {
    postreduce_var_with(&Dispatch::default(), dim, count, uvar);
}

/// [`postreduce_var`] with an explicit execution strategy.
pub fn postreduce_var_with<T: Element>(dispatch: &Dispatch, dim: usize, count: usize, uvar: &mut [T]) {
    let n = T::from_count(count);
    let scale = (n - T::one()).recip();
    dispatch.for_each_mut("postreduce_var", &mut uvar[..dim], |uvar| {
        for v in uvar.iter_mut() {
            *v = *v * scale;
        }
    });
}

/// Bias-corrected third central moment: `ucm3[i] *= n / ((n - 1)(n - 2))`.
///
/// Requires `count >= 3`.
#[inline]
pub fn postreduce_cm3<T: Element>(dim: usize, count: usize, ucm3: &mut [T]) {
    postreduce_cm3_with(&Dispatch::default(), dim, count, ucm3);
}

/// [`postreduce_cm3`] with an explicit execution strategy.
pub fn postreduce_cm3_with<T: Element>(dispatch: &Dispatch, dim: usize, count: usize, ucm3: &mut [T]) {
    let scale = cm3_scale(T::from_count(count));
    dispatch.for_each_mut("postreduce_cm3", &mut ucm3[..dim], |ucm3| {
        for v in ucm3.iter_mut() {
            *v = *v * scale;
        }
    });
}

/// Bias-corrected fourth central moment:
/// `ucm4[i] = scale4 * ucm4[i] + scale2 * uvar[i]`.
///
/// `uvar` must already hold the normalized sample variance, i.e.
/// [`postreduce_var`] has run on it. Requires `count >= 4`.
#[inline]
pub fn postreduce_cm4<T: Element>(dim: usize, count: usize, uvar: &[T], ucm4: &mut [T]) {
    postreduce_cm4_with(&Dispatch::default(), dim, count, uvar, ucm4);
}

/// [`postreduce_cm4`] with an explicit execution strategy.
pub fn postreduce_cm4_with<T: Element>(
    dispatch: &Dispatch,
    dim: usize,
    count: usize,
    uvar: &[T],
    ucm4: &mut [T],
) {
    let (scale4, scale2) = cm4_scales::<T>(count);
    dispatch.zip_mut("postreduce_cm4", &mut ucm4[..dim], &uvar[..dim], |ucm4, uvar| {
        for (m4, &var) in ucm4.iter_mut().zip(uvar) {
            *m4 = scale4 * *m4 + scale2 * var;
        }
    });
}

/// `n / ((n - 1)(n - 2))`.
#[inline]
pub(crate) fn cm3_scale<T: Element>(n: T) -> T {
    let one = T::one();
    let two = T::constant(2.0);
    (n / (n - one)) / (n - two)
}

/// `(scale4, scale2)` of the fourth-moment correction for `count` samples.
///
/// Evaluated in `f64` and factored as
/// `scale4 = n/(n-1) * (n/q + (6n-9)/((n-1)^2 q))` and
/// `scale2 = n/(n-1) * (6n-9)/((n-1)^2 q)` with `q = n^2 - 3n + 3`, so the
/// `(n-1)^3 q` denominator is never formed in `T`. `f32` would overflow it
/// at counts around 5e7.
#[inline]
pub(crate) fn cm4_scales<T: Element>(count: usize) -> (T, T) {
    #[allow(clippy::cast_precision_loss)]
    let n = count as f64;
    let nm1 = n - 1.0;
    let q = n * n - 3.0 * n + 3.0;
    let ratio = n / nm1;
    let tail = (6.0 * n - 9.0) / (nm1 * nm1 * q);
    let scale4 = ratio * (n / q + tail);
    let scale2 = ratio * tail;
    (T::constant(scale4), T::constant(scale2))
}
