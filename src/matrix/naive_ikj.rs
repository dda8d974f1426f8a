use super::{Matrix, check_product_shapes};
use crate::error::Result;

/// Cache-friendly matrix multiplication using i-k-j loop order.
///
/// By swapping the j and k loops, the innermost loop now accesses both
/// B and C sequentially (stride 1), and `a[i][p]` is loaded once per row
/// of B instead of once per element. No tiling is involved; this is the
/// loop-interchange answer to the same locality problem blocking solves.
///
/// Per-element accumulation order over `p` is the same as
/// [`matmul_naive_ijk`](super::naive_ijk::matmul_naive_ijk), so results
/// match it exactly.
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
pub fn matmul_naive_ikj(a: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize) {
    assert_eq!(a.len(), m * k, "A: expected {}x{}={} elements", m, k, m * k);
    assert_eq!(b.len(), k * n, "B: expected {}x{}={} elements", k, n, k * n);
    assert_eq!(c.len(), m * n, "C: expected {}x{}={} elements", m, n, m * n);

    for i in 0..m {
        for p in 0..k {
            let a_ip = a[i * k + p];
            for j in 0..n {
                c[i * n + j] += a_ip * b[p * n + j];
            }
        }
    }
}

/// `A · B` into a fresh matrix with the i-k-j kernel.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut c = Matrix::zeros(a.rows(), b.cols());
    multiply_into(a, b, &mut c)?;
    Ok(c)
}

/// `C += A · B` with the i-k-j kernel.
pub fn multiply_into(a: &Matrix, b: &Matrix, c: &mut Matrix) -> Result<()> {
    let (m, n, k) = check_product_shapes("naive_ikj", a, b, c)?;
    matmul_naive_ikj(a.as_slice(), b.as_slice(), c.as_mut_slice(), m, n, k);
    Ok(())
}
