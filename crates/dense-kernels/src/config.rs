//! Execution configuration for the kernels.
//!
//! Kernels are configured through two axes, both resolved by the caller and
//! never detected inside a kernel:
//!
//! - **Execution strategy**: sequential or fork-join parallel, carried by a
//!   [`Dispatch`] value. The build-time default follows the `parallel` cargo
//!   feature.
//! - **Rounding tier**: baseline or advanced tie-breaking for
//!   `round_clamp_f32_to_u8`, carried by [`RoundingTier`].
//!
//! # Example
//!
//! ```
//! use dense_kernels::config::{Dispatch, ExecutionStrategy};
//!
//! let dispatch = Dispatch::new()
//!     .strategy(ExecutionStrategy::Parallel)
//!     .min_parallel_len(1 << 16)
//!     .chunk_len(8192);
//!
//! assert_eq!(dispatch.get_chunk_len(), 8192);
//! assert!(!dispatch.runs_parallel(1024));
//! ```

pub use crate::kernels::quantize::RoundingTier;

/// Buffers shorter than this run sequentially even under
/// [`ExecutionStrategy::Parallel`].
pub const DEFAULT_MIN_PARALLEL_LEN: usize = 4096;

/// Number of indices handed to one worker at a time.
pub const DEFAULT_CHUNK_LEN: usize = 4096;

/// How a kernel walks the index range `0..dim`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionStrategy {
    /// One loop over the whole range on the calling thread.
    Sequential,
    /// Disjoint chunks of the range processed by fork-join workers.
    ///
    /// Without the `parallel` feature this runs sequentially.
    Parallel,
}

impl ExecutionStrategy {
    /// The strategy selected by the build: `Parallel` when the `parallel`
    /// feature is enabled, `Sequential` otherwise.
    #[must_use]
    pub const fn build_default() -> Self {
        if cfg!(feature = "parallel") {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }
}

impl Default for ExecutionStrategy {
    fn default() -> Self {
        Self::build_default()
    }
}

/// Execution settings passed to the `*_with` kernel variants.
///
/// Every kernel produces bit-identical results under every `Dispatch`: each
/// index is computed by exactly one worker with the same scalar formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    strategy: ExecutionStrategy,
    min_parallel_len: usize,
    chunk_len: usize,
}

impl Default for Dispatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatch {
    /// Creates the build-default dispatch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strategy: ExecutionStrategy::build_default(),
            min_parallel_len: DEFAULT_MIN_PARALLEL_LEN,
            chunk_len: DEFAULT_CHUNK_LEN,
        }
    }

    /// A dispatch that always runs on the calling thread.
    #[must_use]
    pub const fn sequential() -> Self {
        Self::new().strategy(ExecutionStrategy::Sequential)
    }

    /// A dispatch that always requests fork-join execution.
    #[must_use]
    pub const fn parallel() -> Self {
        Self::new().strategy(ExecutionStrategy::Parallel)
    }

    /// Sets the execution strategy.
    #[must_use]
    pub const fn strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the minimum buffer length for parallel execution.
    ///
    /// Shorter buffers are processed sequentially to avoid fork-join
    /// overhead.
    #[must_use]
    pub const fn min_parallel_len(mut self, len: usize) -> Self {
        self.min_parallel_len = len;
        self
    }

    /// Sets the number of indices per parallel chunk. Zero is treated as 1.
    #[must_use]
    pub const fn chunk_len(mut self, len: usize) -> Self {
        self.chunk_len = if len == 0 { 1 } else { len };
        self
    }

    /// Returns the configured strategy.
    #[must_use]
    pub const fn get_strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Returns the configured minimum parallel length.
    #[must_use]
    pub const fn get_min_parallel_len(&self) -> usize {
        self.min_parallel_len
    }

    /// Returns the configured chunk length.
    #[must_use]
    pub const fn get_chunk_len(&self) -> usize {
        self.chunk_len
    }

    /// Whether a buffer of `len` indices would be split across workers.
    #[must_use]
    pub const fn runs_parallel(&self, len: usize) -> bool {
        matches!(self.strategy, ExecutionStrategy::Parallel)
            && cfg!(feature = "parallel")
            && len >= self.min_parallel_len
            && len > self.chunk_len
    }
}
