//! Blocked transpose.

use super::BlockSize;
use crate::error::Result;
use crate::matrix::{Matrix, check_transpose_shapes};

/// Cache-blocked transpose: dst = src^T.
///
/// Walks `src` in `block × block` tiles and transposes each tile in place
/// in `dst`, so the strided writes of one tile land in `block` cache lines
/// that are reused across the tile instead of one new line per write.
/// Edge tiles are clamped the same way as in
/// [`matmul_blocked`](super::gemm::matmul_blocked).
///
/// # Arguments
///
/// * `src` - Source matrix (rows × cols), row-major
/// * `dst` - Destination matrix (cols × rows), row-major
///
/// # Panics
///
/// Panics if the slice sizes don't match rows and cols.
pub fn transpose_blocked(src: &[f32], dst: &mut [f32], rows: usize, cols: usize, block: BlockSize) {
    assert_eq!(src.len(), rows * cols, "src: expected {}x{} elements", rows, cols);
    assert_eq!(dst.len(), rows * cols, "dst: expected {}x{} elements", cols, rows);

    let bs = block.get();

    for ii in (0..rows).step_by(bs) {
        let i_max = (ii + bs).min(rows);
        for jj in (0..cols).step_by(bs) {
            let j_max = (jj + bs).min(cols);

            for i in ii..i_max {
                for j in jj..j_max {
                    dst[j * rows + i] = src[i * cols + j];
                }
            }
        }
    }
}

/// `A^T` into a fresh matrix with the blocked kernel.
pub fn transpose(a: &Matrix, block: BlockSize) -> Matrix {
    let mut t = Matrix::zeros(a.cols(), a.rows());
    transpose_blocked(a.as_slice(), t.as_mut_slice(), a.rows(), a.cols(), block);
    t
}

/// Writes `A^T` into `dst` with the blocked kernel.
pub fn transpose_into(a: &Matrix, dst: &mut Matrix, block: BlockSize) -> Result<()> {
    check_transpose_shapes("blocked_transpose", a, dst)?;
    transpose_blocked(a.as_slice(), dst.as_mut_slice(), a.rows(), a.cols(), block);
    Ok(())
}
