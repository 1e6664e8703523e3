//! Error types for dense-kernels.
//!
//! The raw kernels in [`crate::kernels`] never return errors: their
//! preconditions are the caller's responsibility and violations surface as
//! IEEE-754 NaN/Inf. This type is used by the checked
//! [`MomentAccumulator`](crate::accumulator::MomentAccumulator) and by
//! configuration parsing.

use thiserror::Error;

/// The main error type for dense-kernels operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A buffer does not have the length the operation was set up for.
    #[error("length mismatch for {buffer}: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// Name of the offending buffer.
        buffer: &'static str,
        /// The length required by the operation.
        expected: usize,
        /// The length that was provided.
        actual: usize,
    },

    /// Too few samples have been folded for the requested finalization.
    ///
    /// Sample variance needs 2 samples, the third central moment 3 and the
    /// fourth central moment 4.
    #[error("insufficient samples for {operation}: required {required}, got {actual}")]
    InsufficientSamples {
        /// The operation that was attempted.
        operation: &'static str,
        /// The minimum number of folded samples.
        required: usize,
        /// The number of samples folded so far.
        actual: usize,
    },

    /// A rounding tier name could not be parsed.
    #[error("unknown rounding tier {name:?}: expected \"baseline\" or \"advanced\"")]
    UnknownRoundingTier {
        /// The name that was provided.
        name: String,
    },
}

/// Convenience type alias for Results using the dense-kernels Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_error() {
        let err = Error::LengthMismatch {
            buffer: "uvar",
            expected: 8,
            actual: 7,
        };
        assert_eq!(
            err.to_string(),
            "length mismatch for uvar: expected 8 elements, got 7"
        );
    }

    #[test]
    fn test_insufficient_samples_error() {
        let err = Error::InsufficientSamples {
            operation: "postreduce_cm4",
            required: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "insufficient samples for postreduce_cm4: required 4, got 3"
        );
    }

    #[test]
    fn test_unknown_rounding_tier_error() {
        let err = Error::UnknownRoundingTier {
            name: "avx".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unknown rounding tier \"avx\": expected \"baseline\" or \"advanced\""
        );
    }

    #[test]
    fn test_error_equality() {
        let a = Error::InsufficientSamples {
            operation: "postreduce_var",
            required: 2,
            actual: 1,
        };
        let b = a.clone();
        let c = Error::InsufficientSamples {
            operation: "postreduce_var",
            required: 2,
            actual: 0,
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_error_is_std_error() {
        fn accepts_std_error<E: std::error::Error>(_: E) {}
        accepts_std_error(Error::UnknownRoundingTier {
            name: String::new(),
        });
    }
}
