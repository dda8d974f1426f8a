use super::{Matrix, check_transpose_shapes};
use crate::error::Result;

/// Transpose a matrix: dst = src^T
///
/// Converts from row-major (rows × cols) to row-major (cols × rows).
/// After transpose, what was column j of src becomes row j of dst.
/// The writes into `dst` stride by `rows`, which is what the blocked
/// transpose improves on.
///
/// # Arguments
///
/// * `src` - Source matrix (rows × cols), row-major
/// * `dst` - Destination matrix (cols × rows), row-major
/// * `rows` - Number of rows in src
/// * `cols` - Number of columns in src
///
/// # Example
///
/// ```
/// use cacheblock::matrix::transpose::transpose_naive;
///
/// let src = vec![1.0, 2.0, 3.0,   // 2×3 matrix
///                4.0, 5.0, 6.0];
/// let mut dst = vec![0.0; 6];      // will be 3×2
///
/// transpose_naive(&src, &mut dst, 2, 3);
///
/// assert_eq!(dst, vec![1.0, 4.0,   // 3×2 matrix
///                      2.0, 5.0,
///                      3.0, 6.0]);
/// ```
pub fn transpose_naive(src: &[f32], dst: &mut [f32], rows: usize, cols: usize) {
    assert_eq!(src.len(), rows * cols, "src: expected {}x{} elements", rows, cols);
    assert_eq!(dst.len(), rows * cols, "dst: expected {}x{} elements", cols, rows);

    for i in 0..rows {
        for j in 0..cols {
            dst[j * rows + i] = src[i * cols + j];
        }
    }
}

/// `A^T` into a fresh matrix.
pub fn transpose(a: &Matrix) -> Matrix {
    let mut t = Matrix::zeros(a.cols(), a.rows());
    transpose_naive(a.as_slice(), t.as_mut_slice(), a.rows(), a.cols());
    t
}

/// Writes `A^T` into `dst`, which must be `cols × rows` of `a`.
pub fn transpose_into(a: &Matrix, dst: &mut Matrix) -> Result<()> {
    check_transpose_shapes("transpose", a, dst)?;
    transpose_naive(a.as_slice(), dst.as_mut_slice(), a.rows(), a.cols());
    Ok(())
}
