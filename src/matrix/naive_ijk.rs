use super::{Matrix, check_product_shapes};
use crate::error::Result;

/// Naive matrix multiplication using i-j-k loop order.
///
/// This is the textbook triple-loop implementation. It's slow because
/// the innermost loop accesses B with stride `n` (column-wise), causing
/// cache misses on every iteration. Keep it that way: it is the oracle
/// every other kernel is checked against and the baseline they're timed
/// against.
///
/// # Arguments
///
/// * `a` - Matrix A (m × k), row-major
/// * `b` - Matrix B (k × n), row-major
/// * `c` - Matrix C (m × n), row-major, accumulated into (C += A * B)
/// * `m` - Rows of A and C
/// * `n` - Columns of B and C
/// * `k` - Columns of A, rows of B
///
/// # Panics
///
/// Panics if the slice sizes don't match m, n, k.
pub fn matmul_naive_ijk(a: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize) {
    assert_eq!(a.len(), m * k, "A: expected {}x{}={} elements", m, k, m * k);
    assert_eq!(b.len(), k * n, "B: expected {}x{}={} elements", k, n, k * n);
    assert_eq!(c.len(), m * n, "C: expected {}x{}={} elements", m, n, m * n);

    for i in 0..m {
        for j in 0..n {
            for p in 0..k {
                c[i * n + j] += a[i * k + p] * b[p * n + j];
            }
        }
    }
}

/// `A · B` into a fresh matrix with the i-j-k kernel.
///
/// ```
/// use cacheblock::Matrix;
/// use cacheblock::matrix::naive_ijk;
///
/// let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// let b = Matrix::from_vec(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();
/// let c = naive_ijk::multiply(&a, &b).unwrap();
/// assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
/// ```
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut c = Matrix::zeros(a.rows(), b.cols());
    multiply_into(a, b, &mut c)?;
    Ok(c)
}

/// `C += A · B` with the i-j-k kernel.
pub fn multiply_into(a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
    let (m, n, k) = check_product_shapes("naive_ijk", a, b, c)?;
    matmul_naive_ijk(a.as_slice(), b.as_slice(), c.as_mut_slice(), m, n, k);
    Ok(())
}
