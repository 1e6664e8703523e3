//! Commonly used types and kernels for convenient importing.
//!
//! ```
//! use dense_kernels::prelude::*;
//!
//! let mut mean = [0.0_f64; 3];
//! increduce_mean(3, 0, &[1.0, 2.0, 3.0], &mut mean);
//! assert_eq!(mean, [1.0, 2.0, 3.0]);
//! ```

// Error types
pub use crate::error::{Error, Result};

// Traits
pub use crate::traits::Element;

// Execution
pub use crate::config::{Dispatch, ExecutionStrategy};

// Checked accumulation
pub use crate::accumulator::{FinalizeError, FinalizedMoments, MomentAccumulator};

// Raw kernels
pub use crate::kernels::{
    increduce_mean, increduce_stats2, increduce_stats4, increduce_sum, postreduce_cm3,
    postreduce_cm4, postreduce_var,
};
pub use crate::kernels::{
    add_scalar, copy, div_scalar, elem_div, elem_ldiv, elem_mult, reciprocal, scale, set_scalar,
    sqrt, square, vector_add, vector_average,
};
pub use crate::kernels::{cast_u8_to_f32, cast_u8_to_f64, clamp_f32, RoundingTier};
