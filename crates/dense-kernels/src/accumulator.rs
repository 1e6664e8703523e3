//! Checked streaming moments over caller-owned buffers.
//!
//! [`MomentAccumulator`] wraps the raw kernels in
//! [`kernels::moments`](crate::kernels::moments) and enforces their
//! lifecycle:
//!
//! - buffer lengths are validated once, when the accumulator is created and
//!   for every sample folded;
//! - `count` is tracked internally, so `prev_count` can never drift;
//! - [`MomentAccumulator::finalize`] consumes the accumulator, so it runs at
//!   most once and nothing can be folded afterwards;
//! - finalization is refused until enough samples have been folded, and a
//!   refused finalization hands the accumulator back.
//!
//! The accumulator never allocates: it borrows the four state buffers for
//! its whole lifetime.
//!
//! # Example
//!
//! ```
//! use dense_kernels::accumulator::MomentAccumulator;
//!
//! let (mut mean, mut var, mut cm3, mut cm4) = ([0.0_f64; 2], [0.0; 2], [0.0; 2], [0.0; 2]);
//! let mut acc = MomentAccumulator::new(&mut mean, &mut var, &mut cm3, &mut cm4)?;
//!
//! for x in [[1.0, 5.0], [2.0, 5.0], [4.0, 5.0], [9.0, 5.0]] {
//!     acc.fold(&x)?;
//! }
//! let moments = acc.finalize()?;
//!
//! assert_eq!(moments.count(), 4);
//! assert!((moments.mean()[0] - 4.0).abs() < 1e-12);
//! // sum of squared deviations is 9 + 4 + 0 + 25 = 38
//! assert!((moments.variance()[0] - 38.0 / 3.0).abs() < 1e-12);
//! assert_eq!(moments.variance()[1], 0.0);
//! # Ok::<(), dense_kernels::Error>(())
//! ```

use std::fmt;

use log::debug;

use crate::config::Dispatch;
use crate::error::{Error, Result};
use crate::kernels::elementwise::set_scalar_with;
use crate::kernels::moments::{
    increduce_stats4_with, postreduce_cm3_with, postreduce_cm4_with, postreduce_var_with,
};
use crate::traits::Element;

/// Samples required before [`MomentAccumulator::finalize`] succeeds.
pub const MIN_SAMPLES: usize = 4;

fn check_len(buffer: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            buffer,
            expected,
            actual,
        })
    }
}

/// Running mean, variance and third/fourth central moments of a stream of
/// `dim`-element sample vectors.
#[derive(Debug)]
pub struct MomentAccumulator<'a, T> {
    count: usize,
    dispatch: Dispatch,
    mean: &'a mut [T],
    uvar: &'a mut [T],
    ucm3: &'a mut [T],
    ucm4: &'a mut [T],
}

impl<'a, T: Element> MomentAccumulator<'a, T> {
    /// Creates an accumulator over four equally sized state buffers and
    /// zeroes them. `dim` is the length of `mean`.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if `uvar`, `ucm3` or `ucm4` differ in
    /// length from `mean`.
    pub fn new(
        mean: &'a mut [T],
        uvar: &'a mut [T],
        ucm3: &'a mut [T],
        ucm4: &'a mut [T],
    ) -> Result<Self> {
        let dim = mean.len();
        check_len("uvar", dim, uvar.len())?;
        check_len("ucm3", dim, ucm3.len())?;
        check_len("ucm4", dim, ucm4.len())?;

        let mut acc = Self {
            count: 0,
            dispatch: Dispatch::default(),
            mean,
            uvar,
            ucm3,
            ucm4,
        };
        acc.reset();
        debug!("moment accumulator created with dim={dim}");
        Ok(acc)
    }

    /// Uses `dispatch` for every subsequent fold and for finalization.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Number of independent slots.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Number of samples folded so far.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// The running mean. Valid after every fold.
    #[must_use]
    pub fn mean(&self) -> &[T] {
        self.mean
    }

    /// Whether [`finalize`](Self::finalize) would succeed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.count >= MIN_SAMPLES
    }

    /// Folds one sample vector.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if `x` does not have `dim` elements;
    /// the state is left untouched.
    pub fn fold(&mut self, x: &[T]) -> Result<()> {
        let dim = self.dim();
        check_len("x", dim, x.len())?;
        increduce_stats4_with(
            &self.dispatch,
            dim,
            self.count,
            x,
            self.mean,
            self.uvar,
            self.ucm3,
            self.ucm4,
        );
        self.count += 1;
        Ok(())
    }

    /// Zeroes the state and the sample count.
    pub fn reset(&mut self) {
        let dim = self.dim();
        for buf in [&mut *self.mean, &mut *self.uvar, &mut *self.ucm3, &mut *self.ucm4] {
            set_scalar_with(&self.dispatch, buf, dim, T::zero());
        }
        self.count = 0;
    }

    /// Applies the bias corrections in the order variance, third moment,
    /// fourth moment, and hands out the finished moments.
    ///
    /// # Errors
    ///
    /// Returns a [`FinalizeError`] wrapping `Error::InsufficientSamples` if
    /// fewer than [`MIN_SAMPLES`] samples were folded. The state is left
    /// untouched and [`FinalizeError::into_accumulator`] hands the
    /// accumulator back so folding can continue.
    pub fn finalize(self) -> std::result::Result<FinalizedMoments<'a, T>, FinalizeError<'a, T>> {
        if self.count < MIN_SAMPLES {
            let error = Error::InsufficientSamples {
                operation: "finalize",
                required: MIN_SAMPLES,
                actual: self.count,
            };
            return Err(FinalizeError {
                accumulator: self,
                error,
            });
        }

        let Self {
            count,
            dispatch,
            mean,
            uvar,
            ucm3,
            ucm4,
        } = self;
        let dim = mean.len();

        postreduce_var_with(&dispatch, dim, count, uvar);
        postreduce_cm3_with(&dispatch, dim, count, ucm3);
        postreduce_cm4_with(&dispatch, dim, count, uvar, ucm4);
        debug!("moment accumulator finalized with dim={dim} count={count}");

        Ok(FinalizedMoments {
            count,
            mean,
            variance: uvar,
            cm3: ucm3,
            cm4: ucm4,
        })
    }
}

/// A refused [`MomentAccumulator::finalize`], carrying the accumulator back.
///
/// Converts into [`Error`], so `?` works in functions returning
/// [`Result`](crate::Result).
#[derive(Debug)]
pub struct FinalizeError<'a, T> {
    accumulator: MomentAccumulator<'a, T>,
    error: Error,
}

impl<'a, T> FinalizeError<'a, T> {
    /// The reason finalization was refused.
    #[must_use]
    pub const fn error(&self) -> &Error {
        &self.error
    }

    /// Recovers the accumulator with its state intact.
    #[must_use]
    pub fn into_accumulator(self) -> MomentAccumulator<'a, T> {
        self.accumulator
    }

    /// Discards the accumulator and keeps the error.
    #[must_use]
    pub fn into_error(self) -> Error {
        self.error
    }
}

impl<T> fmt::Display for FinalizeError<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<T: fmt::Debug> std::error::Error for FinalizeError<'_, T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<FinalizeError<'_, T>> for Error {
    fn from(err: FinalizeError<'_, T>) -> Self {
        err.error
    }
}

/// Bias-corrected moments produced by [`MomentAccumulator::finalize`].
#[derive(Debug, Clone, Copy)]
pub struct FinalizedMoments<'a, T> {
    count: usize,
    mean: &'a [T],
    variance: &'a [T],
    cm3: &'a [T],
    cm4: &'a [T],
}

impl<'a, T: Element> FinalizedMoments<'a, T> {
    /// Number of samples the moments were computed from.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Per-slot mean.
    #[must_use]
    pub const fn mean(&self) -> &'a [T] {
        self.mean
    }

    /// Per-slot Bessel-corrected sample variance.
    #[must_use]
    pub const fn variance(&self) -> &'a [T] {
        self.variance
    }

    /// Per-slot bias-corrected third central moment.
    #[must_use]
    pub const fn cm3(&self) -> &'a [T] {
        self.cm3
    }

    /// Per-slot bias-corrected fourth central moment.
    #[must_use]
    pub const fn cm4(&self) -> &'a [T] {
        self.cm4
    }

    /// Skewness `cm3 / variance^(3/2)` per slot.
    ///
    /// Slots with zero variance yield NaN or infinity.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if `out` does not have `dim` elements.
    pub fn skewness_into(&self, out: &mut [T]) -> Result<()> {
        check_len("out", self.mean.len(), out.len())?;
        for ((o, &m3), &var) in out.iter_mut().zip(self.cm3).zip(self.variance) {
            *o = m3 / (var * var.sqrt());
        }
        Ok(())
    }

    /// Kurtosis `cm4 / variance^2` per slot (3 for a normal distribution).
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if `out` does not have `dim` elements.
    pub fn kurtosis_into(&self, out: &mut [T]) -> Result<()> {
        check_len("out", self.mean.len(), out.len())?;
        for ((o, &m4), &var) in out.iter_mut().zip(self.cm4).zip(self.variance) {
            *o = m4 / (var * var);
        }
        Ok(())
    }

    /// Excess kurtosis, [`kurtosis_into`](Self::kurtosis_into) minus 3.
    ///
    /// # Errors
    ///
    /// Returns `Error::LengthMismatch` if `out` does not have `dim` elements.
    pub fn excess_kurtosis_into(&self, out: &mut [T]) -> Result<()> {
        self.kurtosis_into(out)?;
        let three = T::constant(3.0);
        for o in out.iter_mut() {
            *o = *o - three;
        }
        Ok(())
    }
}
