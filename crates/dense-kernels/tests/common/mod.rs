//! Shared test utilities for dense-kernels tests.
//!
//! Provides tolerance checks, a seeded sample generator, and a two-pass
//! reference implementation of the bias-corrected moments that the streaming
//! kernels are compared against.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Standard epsilon for high-precision comparisons.
#[allow(dead_code)]
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon for comparisons involving accumulated floating-point operations.
#[allow(dead_code)]
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Relative closeness with an absolute floor for values near zero.
///
/// Two NaN values are considered equal for testing purposes.
#[allow(dead_code)]
pub fn close(a: f64, b: f64, rel: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() <= rel * a.abs().max(b.abs()).max(1.0)
}

/// `count` samples of `dim` values each, uniformly drawn from `[lo, hi)`.
#[allow(dead_code)]
pub fn random_samples(seed: u64, count: usize, dim: usize, lo: f64, hi: f64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (0..dim).map(|_| rng.gen_range(lo..hi)).collect())
        .collect()
}

/// Moments of one slot computed from the full sample history.
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)]
pub struct Reference {
    pub mean: f64,
    pub variance: f64,
    pub cm3: f64,
    pub cm4: f64,
}

/// Two-pass reference for slot `slot` of `samples`.
///
/// Uses the same estimators the finalization kernels apply: Bessel-corrected
/// variance, `n / ((n-1)(n-2))` for the third moment, and the
/// `scale4 * m4 + scale2 * variance` form for the fourth.
#[allow(dead_code)]
pub fn two_pass(samples: &[Vec<f64>], slot: usize) -> Reference {
    let n = samples.len() as f64;
    let mean = samples.iter().map(|x| x[slot]).sum::<f64>() / n;
    let central = |p: i32| samples.iter().map(|x| (x[slot] - mean).powi(p)).sum::<f64>();

    let variance = central(2) / (n - 1.0);
    let cm3 = central(3) * n / ((n - 1.0) * (n - 2.0));

    let denom = (n - 1.0).powi(3) * (n * n - 3.0 * n + 3.0);
    let scale4 = n * (n * (n - 1.0).powi(2) + 6.0 * n - 9.0) / denom;
    let scale2 = n * (6.0 * n - 9.0) / denom;
    let cm4 = scale4 * central(4) + scale2 * variance;

    Reference {
        mean,
        variance,
        cm3,
        cm4,
    }
}

/// Streams `samples` through `increduce_stats4` and the three finalizers.
///
/// Returns `(mean, variance, cm3, cm4)`.
#[allow(dead_code)]
pub fn streamed(samples: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
    use dense_kernels::kernels::moments::{
        increduce_stats4, postreduce_cm3, postreduce_cm4, postreduce_var,
    };

    let dim = samples[0].len();
    let mut mean = vec![0.0; dim];
    let mut var = vec![0.0; dim];
    let mut cm3 = vec![0.0; dim];
    let mut cm4 = vec![0.0; dim];
    for (k, x) in samples.iter().enumerate() {
        increduce_stats4(dim, k, x, &mut mean, &mut var, &mut cm3, &mut cm4);
    }
    postreduce_var(dim, samples.len(), &mut var);
    postreduce_cm3(dim, samples.len(), &mut cm3);
    postreduce_cm4(dim, samples.len(), &var, &mut cm4);
    (mean, var, cm3, cm4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_basic() {
        assert!(close(1.0, 1.0 + 1e-12, EPSILON));
        assert!(close(1e9, 1e9 + 1.0, LOOSE_EPSILON));
        assert!(!close(1.0, 2.0, LOOSE_EPSILON));
        assert!(close(f64::NAN, f64::NAN, EPSILON));
        assert!(!close(f64::NAN, 1.0, EPSILON));
    }

    #[test]
    fn test_random_samples_are_seeded() {
        let a = random_samples(7, 5, 3, -1.0, 1.0);
        let b = random_samples(7, 5, 3, -1.0, 1.0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
        assert!(a.iter().flatten().all(|v| (-1.0..1.0).contains(v)));
    }

    #[test]
    fn test_two_pass_known_values() {
        let samples: Vec<Vec<f64>> = [1.0, 2.0, 3.0, 4.0].iter().map(|&v| vec![v]).collect();
        let r = two_pass(&samples, 0);
        assert!(close(r.mean, 2.5, EPSILON));
        assert!(close(r.variance, 5.0 / 3.0, EPSILON));
        assert!(r.cm3.abs() < EPSILON);
    }
}
