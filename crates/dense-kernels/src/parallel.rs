//! Fork-join parallel-for over an index range.
//!
//! Each helper takes buffers that have already been restricted to the same
//! length `dim`, splits them into aligned chunks of
//! [`Dispatch::get_chunk_len`] indices, and runs a chunk body on every chunk.
//! Chunk `k` of every buffer covers the same index range, so no two workers
//! ever touch the same output index. All workers join before the helper
//! returns.
//!
//! With the `parallel` feature the chunks are distributed with Rayon; without
//! it, or for buffers below [`Dispatch::get_min_parallel_len`], the body runs
//! once over the whole range on the calling thread. Because the chunk bodies
//! are per-index formulas, both paths produce identical bits.
//!
//! # Example
//!
//! ```
//! use dense_kernels::config::Dispatch;
//!
//! let mut dst = vec![1.0_f32; 10_000];
//! let src = vec![2.0_f32; 10_000];
//!
//! Dispatch::parallel()
//!     .min_parallel_len(0)
//!     .chunk_len(1000)
//!     .zip_mut("example", &mut dst, &src, |d, s| {
//!         for (d, &s) in d.iter_mut().zip(s) {
//!             *d += s;
//!         }
//!     });
//!
//! assert!(dst.iter().all(|&v| v == 3.0));
//! ```

use std::sync::Once;

use log::{trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{Dispatch, ExecutionStrategy};

static PARALLEL_UNAVAILABLE: Once = Once::new();

impl Dispatch {
    /// Decides between the sequential and the chunked path for `len` indices.
    fn split(&self, kernel: &'static str, len: usize) -> bool {
        if self.get_strategy() == ExecutionStrategy::Parallel && !cfg!(feature = "parallel") {
            PARALLEL_UNAVAILABLE.call_once(|| {
                warn!("parallel execution requested but the `parallel` feature is disabled; running sequentially");
            });
        }
        let parallel = self.runs_parallel(len);
        if parallel {
            trace!(
                "{kernel}: dim={len} split into {} chunks of {}",
                len.div_ceil(self.get_chunk_len()),
                self.get_chunk_len()
            );
        } else {
            trace!("{kernel}: dim={len} sequential");
        }
        parallel
    }

    /// Runs `body` over disjoint chunks of `dst`.
    #[cfg(feature = "parallel")]
    pub fn for_each_mut<T, F>(&self, kernel: &'static str, dst: &mut [T], body: F)
    where
        T: Send,
        F: Fn(&mut [T]) + Send + Sync,
    {
        if self.split(kernel, dst.len()) {
            dst.par_chunks_mut(self.get_chunk_len()).for_each(body);
        } else {
            body(dst);
        }
    }

    /// Sequential version when parallel feature is disabled.
    #[cfg(not(feature = "parallel"))]
    pub fn for_each_mut<T, F>(&self, kernel: &'static str, dst: &mut [T], body: F)
    where
        T: Send,
        F: Fn(&mut [T]) + Send + Sync,
    {
        self.split(kernel, dst.len());
        body(dst);
    }

    /// Runs `body` over aligned chunks of `dst` and `src`.
    #[cfg(feature = "parallel")]
    pub fn zip_mut<T, U, F>(&self, kernel: &'static str, dst: &mut [T], src: &[U], body: F)
    where
        T: Send,
        U: Sync,
        F: Fn(&mut [T], &[U]) + Send + Sync,
    {
        debug_assert_eq!(dst.len(), src.len());
        if self.split(kernel, dst.len()) {
            let chunk = self.get_chunk_len();
            dst.par_chunks_mut(chunk)
                .zip(src.par_chunks(chunk))
                .for_each(|(d, s)| body(d, s));
        } else {
            body(dst, src);
        }
    }

    /// Sequential version when parallel feature is disabled.
    #[cfg(not(feature = "parallel"))]
    pub fn zip_mut<T, U, F>(&self, kernel: &'static str, dst: &mut [T], src: &[U], body: F)
    where
        T: Send,
        U: Sync,
        F: Fn(&mut [T], &[U]) + Send + Sync,
    {
        debug_assert_eq!(dst.len(), src.len());
        self.split(kernel, dst.len());
        body(dst, src);
    }

    /// Runs `body` over aligned chunks of one input and two outputs.
    #[cfg(feature = "parallel")]
    pub fn zip2_mut<T, U, F>(&self, kernel: &'static str, src: &[U], a: &mut [T], b: &mut [T], body: F)
    where
        T: Send,
        U: Sync,
        F: Fn(&[U], &mut [T], &mut [T]) + Send + Sync,
    {
        debug_assert!(a.len() == src.len() && b.len() == src.len());
        if self.split(kernel, src.len()) {
            let chunk = self.get_chunk_len();
            a.par_chunks_mut(chunk)
                .zip(b.par_chunks_mut(chunk))
                .zip(src.par_chunks(chunk))
                .for_each(|((a, b), s)| body(s, a, b));
        } else {
            body(src, a, b);
        }
    }

    /// Sequential version when parallel feature is disabled.
    #[cfg(not(feature = "parallel"))]
    pub fn zip2_mut<T, U, F>(&self, kernel: &'static str, src: &[U], a: &mut [T], b: &mut [T], body: F)
    where
        T: Send,
        U: Sync,
        F: Fn(&[U], &mut [T], &mut [T]) + Send + Sync,
    {
        debug_assert!(a.len() == src.len() && b.len() == src.len());
        self.split(kernel, src.len());
        body(src, a, b);
    }

    /// Runs `body` over aligned chunks of one input and four outputs.
    #[cfg(feature = "parallel")]
    #[allow(clippy::too_many_arguments)]
    pub fn zip4_mut<T, U, F>(
        &self,
        kernel: &'static str,
        src: &[U],
        a: &mut [T],
        b: &mut [T],
        c: &mut [T],
        d: &mut [T],
        body: F,
    ) where
        T: Send,
        U: Sync,
        F: Fn(&[U], &mut [T], &mut [T], &mut [T], &mut [T]) + Send + Sync,
    {
        debug_assert!(
            a.len() == src.len() && b.len() == src.len() && c.len() == src.len() && d.len() == src.len()
        );
        if self.split(kernel, src.len()) {
            let chunk = self.get_chunk_len();
            a.par_chunks_mut(chunk)
                .zip(b.par_chunks_mut(chunk))
                .zip(c.par_chunks_mut(chunk))
                .zip(d.par_chunks_mut(chunk))
                .zip(src.par_chunks(chunk))
                .for_each(|((((a, b), c), d), s)| body(s, a, b, c, d));
        } else {
            body(src, a, b, c, d);
        }
    }

    /// Sequential version when parallel feature is disabled.
    #[cfg(not(feature = "parallel"))]
    #[allow(clippy::too_many_arguments)]
    pub fn zip4_mut<T, U, F>(
        &self,
        kernel: &'static str,
        src: &[U],
        a: &mut [T],
        b: &mut [T],
        c: &mut [T],
        d: &mut [T],
        body: F,
    ) where
        T: Send,
        U: Sync,
        F: Fn(&[U], &mut [T], &mut [T], &mut [T], &mut [T]) + Send + Sync,
    {
        debug_assert!(
            a.len() == src.len() && b.len() == src.len() && c.len() == src.len() && d.len() == src.len()
        );
        self.split(kernel, src.len());
        body(src, a, b, c, d);
    }
}
