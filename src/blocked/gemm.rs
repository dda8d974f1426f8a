//! Blocked GEMM.

use super::BlockSize;
use crate::error::Result;
use crate::matrix::{Matrix, check_product_shapes};

/// Cache-blocked matrix multiplication: C += A * B.
///
/// The outer three loops walk tile origins in ii → jj → kk order (outer to
/// inner). For a fixed (ii, jj) the C tile stays hot across every kk step,
/// and each A tile row is reused across the whole j range of the tile. The
/// inner i-j-k nest covers `[origin, min(origin + block, extent))` on each
/// axis, so tiles past the last full block are clamped rather than padded.
///
/// kk ascends in the outer loop and p ascends inside each tile, so every
/// C element sees its products added in the same order as
/// [`matmul_naive_ijk`](crate::matrix::naive_ijk::matmul_naive_ijk).
///
/// # Arguments
///
/// * `a` - Matrix A (m × k), row-major
/// * `b` - Matrix B (k × n), row-major
/// * `c` - Matrix C (m × n), row-major, accumulated into
/// * `block` - Tile edge, used on all three axes
///
/// # Panics
///
/// Panics if the slice sizes don't match m, n, k.
pub fn matmul_blocked(
    a: &[f32],
    b: &[f32],
    c: &mut [f32],
    m: usize,
    n: usize,
    k: usize,
    block: BlockSize,
) {
    assert_eq!(a.len(), m * k, "A: expected {}x{}={} elements", m, k, m * k);
    assert_eq!(b.len(), k * n, "B: expected {}x{}={} elements", k, n, k * n);
    assert_eq!(c.len(), m * n, "C: expected {}x{}={} elements", m, n, m * n);

    let bs = block.get();

    for ii in (0..m).step_by(bs) {
        let i_max = (ii + bs).min(m);
        for jj in (0..n).step_by(bs) {
            let j_max = (jj + bs).min(n);
            for kk in (0..k).step_by(bs) {
                let k_max = (kk + bs).min(k);

                for i in ii..i_max {
                    for j in jj..j_max {
                        for p in kk..k_max {
                            c[i * n + j] += a[i * k + p] * b[p * n + j];
                        }
                    }
                }
            }
        }
    }
}

/// `A · B` into a fresh matrix with the blocked kernel.
///
/// ```
/// use cacheblock::Matrix;
/// use cacheblock::blocked::{BlockSize, gemm};
///
/// let a = Matrix::from_fn(5, 5, |r, c| (r + c) as f32);
/// let b = Matrix::from_fn(5, 5, |r, c| (r * c) as f32);
/// let c = gemm::multiply(&a, &b, BlockSize::new(2).unwrap()).unwrap();
/// let oracle = cacheblock::matrix::naive_ijk::multiply(&a, &b).unwrap();
/// assert_eq!(c, oracle);
/// ```
pub fn multiply(a: &Matrix, b: &Matrix, block: BlockSize) -> Result<Matrix> {
    let mut c = Matrix::zeros(a.rows(), b.cols());
    multiply_into(a, b, &mut c, block)?;
    Ok(c)
}

/// `C += A · B` with the blocked kernel.
pub fn multiply_into(a: &Matrix, b: &Matrix, c: &mut Matrix, block: BlockSize) -> Result<()> {
    let (m, n, k) = check_product_shapes("blocked_multiply", a, b, c)?;
    log::debug!(
        "blocked multiply {}x{}x{} with {}-wide tiles",
        m,
        n,
        k,
        block.get()
    );
    matmul_blocked(a.as_slice(), b.as_slice(), c.as_mut_slice(), m, n, k, block);
    Ok(())
}
