//! dense-kernels: allocation-free numeric kernels over dense buffers
//!
//! This crate provides the per-index building blocks of a data-parallel
//! statistics pipeline: streaming moment accumulation, elementwise vector
//! arithmetic, and `f32` to `u8` quantization. Every kernel works in place on
//! caller-owned slices and splits large index ranges across threads.
//!
//! # Features
//!
//! - **Streaming**: mean, variance, skewness and kurtosis in one pass, with
//!   O(`dim`) state and no sample history
//! - **Zero allocation**: kernels only read and write the slices they are given
//! - **Generics**: works with both `f32` and `f64`
//! - **Deterministic**: parallel and sequential execution produce identical bits
//!
//! # Quick Start
//!
//! ```
//! use dense_kernels::prelude::*;
//!
//! let dim = 2;
//! let (mut mean, mut var, mut cm3, mut cm4) = (vec![0.0; dim], vec![0.0; dim], vec![0.0; dim], vec![0.0; dim]);
//!
//! let samples = [[1.0_f64, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
//! for (k, x) in samples.iter().enumerate() {
//!     increduce_stats4(dim, k, x, &mut mean, &mut var, &mut cm3, &mut cm4);
//! }
//! postreduce_var(dim, samples.len(), &mut var);
//! postreduce_cm3(dim, samples.len(), &mut cm3);
//! postreduce_cm4(dim, samples.len(), &var, &mut cm4);
//!
//! assert!((mean[0] - 2.5).abs() < 1e-12);
//! assert!((var[0] - 5.0 / 3.0).abs() < 1e-12);
//! assert!(cm3[0].abs() < 1e-12);
//! ```
//!
//! # Checked Accumulation
//!
//! The raw kernels trust their caller. [`MomentAccumulator`] validates
//! lengths, tracks the sample count, and refuses to finalize too early:
//!
//! ```
//! use dense_kernels::prelude::*;
//!
//! let (mut mean, mut var, mut cm3, mut cm4) = ([0.0_f32; 1], [0.0; 1], [0.0; 1], [0.0; 1]);
//! let mut acc = MomentAccumulator::new(&mut mean, &mut var, &mut cm3, &mut cm4)?;
//! acc.fold(&[1.0])?;
//! assert!(acc.fold(&[1.0, 2.0]).is_err());
//! let refused = acc.finalize().unwrap_err();
//! assert!(matches!(refused.error(), Error::InsufficientSamples { .. }));
//!
//! // the folded state survives a refused finalize
//! let acc = refused.into_accumulator();
//! assert_eq!(acc.count(), 1);
//! # Ok::<(), Error>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_arguments)]

pub mod accumulator;
pub mod config;
pub mod error;
pub mod kernels;
mod parallel;
pub mod prelude;
pub mod traits;
pub mod utils;

// Re-export commonly used types at crate root
pub use accumulator::{FinalizeError, FinalizedMoments, MomentAccumulator};
pub use config::{Dispatch, ExecutionStrategy};
pub use error::{Error, Result};
pub use kernels::quantize::RoundingTier;
pub use traits::Element;
pub use utils::{approx_eq, approx_eq_relative, EPSILON, LOOSE_EPSILON};
