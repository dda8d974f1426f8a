//! Matrix storage and the naive kernels.
//!
//! These provide correctness baselines for the blocked and cache-oblivious
//! implementations, plus the shape checks every matrix-level entry point
//! shares.

pub mod dense;
pub mod naive_ijk;
pub mod naive_ikj;
pub mod transpose;

pub use dense::Matrix;

use crate::error::{Result, shape_mismatch};

/// Checks `A (m×k) · B (k×n) -> C (m×n)` and returns `(m, n, k)`.
pub(crate) fn check_product_shapes(
    op: &'static str,
    a: &Matrix,
    b: &Matrix,
    c: &Matrix,
) -> Result<(usize, usize, usize)> {
    let (m, k) = a.shape();
    let n = b.cols();
    if b.rows() != k {
        return Err(shape_mismatch(op, (k, n), b.shape()));
    }
    if c.shape() != (m, n) {
        return Err(shape_mismatch(op, (m, n), c.shape()));
    }
    Ok((m, n, k))
}

/// Checks that `dst` is shaped like `src^T`.
pub(crate) fn check_transpose_shapes(op: &'static str, src: &Matrix, dst: &Matrix) -> Result<()> {
    if dst.shape() != (src.cols(), src.rows()) {
        return Err(shape_mismatch(op, (src.cols(), src.rows()), dst.shape()));
    }
    Ok(())
}
