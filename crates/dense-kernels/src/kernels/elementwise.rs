//! In-place elementwise arithmetic over dense buffers.
//!
//! Every kernel applies one scalar formula to each index `0..dim` of `dst`,
//! optionally reading the same index of a second buffer `xs`. There is no
//! cross-index dependency, so any partition of the index range gives the
//! same result as a sequential loop.
//!
//! `sqrt` and `reciprocal` follow IEEE-754: negative inputs give NaN, zero
//! gives infinity. Nothing is special-cased.
//!
//! # Example
//!
//! ```
//! use dense_kernels::kernels::elementwise::{scale, vector_add};
//!
//! let mut dst = [1.0_f32, 2.0, 3.0];
//! scale(&mut dst, 3, 2.0);
//! vector_add(&mut dst, 3, &[1.0, 1.0, 1.0], 0.5);
//! assert_eq!(dst, [2.5, 4.5, 6.5]);
//! ```

use crate::config::Dispatch;
use crate::traits::Element;

fn map_in_place<T, F>(dispatch: &Dispatch, kernel: &'static str, dst: &mut [T], f: F)
where
    T: Copy + Send,
    F: Fn(T) -> T + Send + Sync,
{
    dispatch.for_each_mut(kernel, dst, |dst| {
        for v in dst.iter_mut() {
            *v = f(*v);
        }
    });
}

fn zip_in_place<T, F>(dispatch: &Dispatch, kernel: &'static str, dst: &mut [T], xs: &[T], f: F)
where
    T: Copy + Send + Sync,
    F: Fn(T, T) -> T + Send + Sync,
{
    dispatch.zip_mut(kernel, dst, xs, |dst, xs| {
        for (d, &x) in dst.iter_mut().zip(xs) {
            *d = f(*d, x);
        }
    });
}

/// Fills `dst` with `c`.
///
/// Works for any plain element type, integer buffers included.
#[inline]
pub fn set_scalar<T: Copy + Send + Sync>(dst: &mut [T], dim: usize, c: T) {
    set_scalar_with(&Dispatch::default(), dst, dim, c);
}

/// [`set_scalar`] with an explicit execution strategy.
pub fn set_scalar_with<T: Copy + Send + Sync>(dispatch: &Dispatch, dst: &mut [T], dim: usize, c: T) {
    dispatch.for_each_mut("set_scalar", &mut dst[..dim], |dst| dst.fill(c));
}

/// Copies `src` into `dst`.
#[inline]
pub fn copy<T: Copy + Send + Sync>(dst: &mut [T], dim: usize, src: &[T]) {
    copy_with(&Dispatch::default(), dst, dim, src);
}

/// [`copy`] with an explicit execution strategy.
pub fn copy_with<T: Copy + Send + Sync>(dispatch: &Dispatch, dst: &mut [T], dim: usize, src: &[T]) {
    dispatch.zip_mut("copy", &mut dst[..dim], &src[..dim], |dst, src| {
        dst.copy_from_slice(src);
    });
}

/// `dst[i] = dst[i] * dst[i]`.
#[inline]
pub fn square<T: Element>(dst: &mut [T], dim: usize) {
    square_with(&Dispatch::default(), dst, dim);
}

/// [`square`] with an explicit execution strategy.
pub fn square_with<T: Element>(dispatch: &Dispatch, dst: &mut [T], dim: usize) {
    map_in_place(dispatch, "square", &mut dst[..dim], |y| y * y);
}

/// `dst[i] = sqrt(dst[i])`; negative inputs become NaN.
#[inline]
pub fn sqrt<T: Element>(dst: &mut [T], dim: usize) {
    sqrt_with(&Dispatch::default(), dst, dim);
}

/// [`sqrt`] with an explicit execution strategy.
pub fn sqrt_with<T: Element>(dispatch: &Dispatch, dst: &mut [T], dim: usize) {
    map_in_place(dispatch, "sqrt", &mut dst[..dim], T::sqrt);
}

/// `dst[i] = 1 / dst[i]`; zero becomes a signed infinity.
#[inline]
pub fn reciprocal<T: Element>(dst: &mut [T], dim: usize) {
    reciprocal_with(&Dispatch::default(), dst, dim);
}

/// [`reciprocal`] with an explicit execution strategy.
pub fn reciprocal_with<T: Element>(dispatch: &Dispatch, dst: &mut [T], dim: usize) {
    map_in_place(dispatch, "reciprocal", &mut dst[..dim], |y| T::one() / y);
}

/// `dst[i] += c`.
#[inline]
pub fn add_scalar<T: Element>(dst: &mut [T], dim: usize, c: T) {
    add_scalar_with(&Dispatch::default(), dst, dim, c);
}

/// [`add_scalar`] with an explicit execution strategy.
pub fn add_scalar_with<T: Element>(dispatch: &Dispatch, dst: &mut [T], dim: usize, c: T) {
    map_in_place(dispatch, "add_scalar", &mut dst[..dim], |y| y + c);
}

/// `dst[i] *= c`.
#[inline]
pub fn scale<T: Element>(dst: &mut [T], dim: usize, c: T) {
    scale_with(&Dispatch::default(), dst, dim, c);
}

/// [`scale`] with an explicit execution strategy.
pub fn scale_with<T: Element>(dispatch: &Dispatch, dst: &mut [T], dim: usize, c: T) {
    map_in_place(dispatch, "scale", &mut dst[..dim], |y| y * c);
}

/// `dst[i] /= c`.
///
/// This is a true division per element, not a multiplication by `1 / c`,
/// so results match `dst[i] / c` bit for bit.
#[inline]
pub fn div_scalar<T: Element>(dst: &mut [T], dim: usize, c: T) {
    div_scalar_with(&Dispatch::default(), dst, dim, c);
}

/// [`div_scalar`] with an explicit execution strategy.
pub fn div_scalar_with<T: Element>(dispatch: &Dispatch, dst: &mut [T], dim: usize, c: T) {
    map_in_place(dispatch, "div_scalar", &mut dst[..dim], |y| y / c);
}

/// `dst[i] *= xs[i]`.
#[inline]
pub fn elem_mult<T: Element>(dst: &mut [T], dim: usize, xs: &[T]) {
    elem_mult_with(&Dispatch::default(), dst, dim, xs);
}

/// [`elem_mult`] with an explicit execution strategy.
pub fn elem_mult_with<T: Element>(dispatch: &Dispatch, dst: &mut [T], dim: usize, xs: &[T]) {
    zip_in_place(dispatch, "elem_mult", &mut dst[..dim], &xs[..dim], |d, x| d * x);
}

/// `dst[i] /= xs[i]`.
#[inline]
pub fn elem_div<T: Element>(dst: &mut [T], dim: usize, xs: &[T]) {
    elem_div_with(&Dispatch::default(), dst, dim, xs);
}

/// [`elem_div`] with an explicit execution strategy.
pub fn elem_div_with<T: Element>(dispatch: &Dispatch, dst: &mut [T], dim: usize, xs: &[T]) {
    zip_in_place(dispatch, "elem_div", &mut dst[..dim], &xs[..dim], |d, x| d / x);
}

/// Reverse division: `dst[i] = xs[i] / dst[i]`.
#[inline]
pub fn elem_ldiv<T: Element>(dst: &mut [T], dim: usize, xs: &[T]) {
    elem_ldiv_with(&Dispatch::default(), dst, dim, xs);
}

/// [`elem_ldiv`] with an explicit execution strategy.
pub fn elem_ldiv_with<T: Element>(dispatch: &Dispatch, dst: &mut [T], dim: usize, xs: &[T]) {
    zip_in_place(dispatch, "elem_ldiv", &mut dst[..dim], &xs[..dim], |d, x| x / d);
}

/// Scaled accumulation: `dst[i] += c * xs[i]`.
#[inline]
pub fn vector_add<T: Element>(dst: &mut [T], dim: usize, xs: &[T], c: T) {
    vector_add_with(&Dispatch::default(), dst, dim, xs, c);
}

/// [`vector_add`] with an explicit execution strategy.
pub fn vector_add_with<T: Element>(dispatch: &Dispatch, dst: &mut [T], dim: usize, xs: &[T], c: T) {
    zip_in_place(dispatch, "vector_add", &mut dst[..dim], &xs[..dim], |d, x| d + c * x);
}

/// One exponential-moving-average step: `dst[i] += c * (xs[i] - dst[i])`.
///
/// # Example
///
/// ```
/// use dense_kernels::kernels::elementwise::vector_average;
///
/// let mut dst = [0.0_f32, 0.0];
/// vector_average(&mut dst, 2, &[4.0, 8.0], 0.5);
/// assert_eq!(dst, [2.0, 4.0]);
/// ```
#[inline]
pub fn vector_average<T: Element>(dst: &mut [T], dim: usize, xs: &[T], c: T) {
    vector_average_with(&Dispatch::default(), dst, dim, xs, c);
}

/// [`vector_average`] with an explicit execution strategy.
pub fn vector_average_with<T: Element>(
    dispatch: &Dispatch,
    dst: &mut [T],
    dim: usize,
    xs: &[T],
    c: T,
) {
    zip_in_place(dispatch, "vector_average", &mut dst[..dim], &xs[..dim], |d, x| {
        d + c * (x - d)
    });
}
