//! Recursive cache-oblivious matrix multiplication.
//!
//! No block size is ever chosen. The product is split in half along all
//! three dimensions until every extent is at most [`BASE_THRESHOLD`], at
//! which point the naive triple loop runs over the sub-block. Some level of
//! that recursion fits each cache in the hierarchy, whatever its size; the
//! threshold only trims call overhead and never affects the result.
//!
//! Sub-blocks are addressed with plain offset values into the caller's
//! matrices. Nothing is copied and no pointer arithmetic escapes this
//! module.

use crate::error::{Result, invalid_parameter};
use crate::matrix::{Matrix, check_product_shapes};

/// Extent at or below which the recursion falls back to the naive loop.
pub const BASE_THRESHOLD: usize = 64;

/// Row/column offset of a sub-block inside its matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Origin {
    pub row: usize,
    pub col: usize,
}

impl Origin {
    pub const fn new(row: usize, col: usize) -> Self {
        Origin { row, col }
    }

    fn offset(self, rows: usize, cols: usize) -> Self {
        Origin {
            row: self.row + rows,
            col: self.col + cols,
        }
    }
}

/// A square `size × size` view into each of A, B and C.
///
/// The view multiplies the A block at `a` by the B block at `b` and adds
/// the product into the C block at `c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubproblemCoordinate {
    pub a: Origin,
    pub b: Origin,
    pub c: Origin,
    pub size: usize,
}

impl SubproblemCoordinate {
    /// The whole `size × size` problem, all origins at (0, 0).
    pub const fn root(size: usize) -> Self {
        SubproblemCoordinate {
            a: Origin::new(0, 0),
            b: Origin::new(0, 0),
            c: Origin::new(0, 0),
            size,
        }
    }
}

/// Extents of one recursion step: C block is `m × n`, inner dimension `k`.
///
/// Square problems with an odd size split into uneven halves, so below the
/// root a block is not necessarily square.
#[derive(Debug, Clone, Copy)]
struct Block {
    a: Origin,
    b: Origin,
    c: Origin,
    m: usize,
    n: usize,
    k: usize,
}

impl From<SubproblemCoordinate> for Block {
    fn from(s: SubproblemCoordinate) -> Self {
        Block {
            a: s.a,
            b: s.b,
            c: s.c,
            m: s.size,
            n: s.size,
            k: s.size,
        }
    }
}

impl Block {
    /// Child block for one octant. `lo` selects the first half of the
    /// corresponding axis, otherwise the second.
    fn child(&self, i_lo: bool, j_lo: bool, p_lo: bool) -> Block {
        let (m_off, m) = split(self.m, i_lo);
        let (n_off, n) = split(self.n, j_lo);
        let (k_off, k) = split(self.k, p_lo);
        Block {
            a: self.a.offset(m_off, k_off),
            b: self.b.offset(k_off, n_off),
            c: self.c.offset(m_off, n_off),
            m,
            n,
            k,
        }
    }

    fn is_empty(&self) -> bool {
        self.m == 0 || self.n == 0 || self.k == 0
    }
}

/// `(offset, extent)` of the low or high half of `d`. The high half takes
/// the remainder when `d` is odd.
fn split(d: usize, lo: bool) -> (usize, usize) {
    let half = d / 2;
    if lo { (0, half) } else { (half, d - half) }
}

struct Recursion<'a> {
    a: &'a [f32],
    lda: usize,
    b: &'a [f32],
    ldb: usize,
    c: &'a mut [f32],
    ldc: usize,
    threshold: usize,
}

impl Recursion<'_> {
    fn run(&mut self, blk: Block) {
        if blk.is_empty() {
            return;
        }
        if blk.m <= self.threshold && blk.n <= self.threshold && blk.k <= self.threshold {
            self.base_case(blk);
            return;
        }

        // C11 = A11·B11 + A12·B21
        self.run(blk.child(true, true, true));
        self.run(blk.child(true, true, false));
        // C12 = A11·B12 + A12·B22
        self.run(blk.child(true, false, true));
        self.run(blk.child(true, false, false));
        // C21 = A21·B11 + A22·B21
        self.run(blk.child(false, true, true));
        self.run(blk.child(false, true, false));
        // C22 = A21·B12 + A22·B22
        self.run(blk.child(false, false, true));
        self.run(blk.child(false, false, false));
    }

    fn base_case(&mut self, blk: Block) {
        let Block { a, b, c, m, n, k } = blk;
        for i in 0..m {
            for j in 0..n {
                let c_idx = (c.row + i) * self.ldc + c.col + j;
                let a_row = (a.row + i) * self.lda + a.col;
                for p in 0..k {
                    self.c[c_idx] += self.a[a_row + p] * self.b[(b.row + p) * self.ldb + b.col + j];
                }
            }
        }
    }
}

/// Multiply-accumulates one square sub-problem: `C[c..] += A[a..] · B[b..]`
/// over `size × size` blocks.
///
/// C is not cleared; pass zeros for a plain product.
///
/// # Errors
///
/// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if any of the
/// three sub-blocks extends past its matrix.
pub fn multiply_range(a: &Matrix, b: &Matrix, c: &mut Matrix, at: SubproblemCoordinate) -> Result<()> {
    for (name, origin, m) in [("a", at.a, &*a), ("b", at.b, &*b), ("c", at.c, &*c)] {
        let past = |start: usize, limit: usize| {
            start.checked_add(at.size).is_none_or(|end| end > limit)
        };
        if past(origin.row, m.rows()) || past(origin.col, m.cols()) {
            return Err(invalid_parameter(
                "coordinate",
                format!(
                    "{} at ({}, {}) size {} in {}x{}",
                    name,
                    origin.row,
                    origin.col,
                    at.size,
                    m.rows(),
                    m.cols()
                ),
                "sub-block extends past the matrix",
            ));
        }
    }
    run(a, b, c, Block::from(at), BASE_THRESHOLD);
    Ok(())
}

/// `A · B` into a fresh matrix with the recursive kernel.
///
/// ```
/// use cacheblock::Matrix;
/// use cacheblock::oblivious;
///
/// let a = Matrix::from_fn(100, 100, |r, c| ((r + 2 * c) % 7) as f32);
/// let b = Matrix::from_fn(100, 100, |r, c| ((3 * r + c) % 5) as f32);
/// let c = oblivious::multiply(&a, &b).unwrap();
/// assert_eq!(c, cacheblock::matrix::naive_ijk::multiply(&a, &b).unwrap());
/// ```
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    multiply_with_threshold(a, b, BASE_THRESHOLD)
}

/// Same as [`multiply`] with a different base-case cutoff.
///
/// # Errors
///
/// `ShapeMismatch` if `a.cols() != b.rows()`, `InvalidParameter` if
/// `threshold` is zero.
pub fn multiply_with_threshold(a: &Matrix, b: &Matrix, threshold: usize) -> Result<Matrix> {
    if threshold == 0 {
        return Err(invalid_parameter("threshold", threshold, "must be at least 1"));
    }
    let mut c = Matrix::zeros(a.rows(), b.cols());
    let (m, n, k) = check_product_shapes("oblivious_multiply", a, b, &c)?;
    log::debug!(
        "cache-oblivious multiply {}x{}x{}, base case <= {}",
        m,
        n,
        k,
        threshold
    );
    let root = Block {
        a: Origin::default(),
        b: Origin::default(),
        c: Origin::default(),
        m,
        n,
        k,
    };
    run(a, b, &mut c, root, threshold);
    Ok(c)
}

fn run(a: &Matrix, b: &Matrix, c: &mut Matrix, root: Block, threshold: usize) {
    let ldc = c.cols();
    let mut rec = Recursion {
        a: a.as_slice(),
        lda: a.cols(),
        b: b.as_slice(),
        ldb: b.cols(),
        c: c.as_mut_slice(),
        ldc,
        threshold,
    };
    rec.run(root);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_gives_remainder_to_high_half() {
        assert_eq!(split(7, true), (0, 3));
        assert_eq!(split(7, false), (3, 4));
        assert_eq!(split(1, true), (0, 0));
        assert_eq!(split(1, false), (0, 1));
    }

    #[test]
    fn test_children_tile_the_parent() {
        let parent = Block::from(SubproblemCoordinate {
            a: Origin::new(1, 2),
            b: Origin::new(3, 4),
            c: Origin::new(5, 6),
            size: 9,
        });
        let c22 = parent.child(false, false, false);
        assert_eq!(c22.a, Origin::new(1 + 4, 2 + 4));
        assert_eq!(c22.b, Origin::new(3 + 4, 4 + 4));
        assert_eq!(c22.c, Origin::new(5 + 4, 6 + 4));
        assert_eq!((c22.m, c22.n, c22.k), (5, 5, 5));

        let c12_second = parent.child(true, false, false);
        assert_eq!(c12_second.a, Origin::new(1, 2 + 4));
        assert_eq!(c12_second.b, Origin::new(3 + 4, 4 + 4));
        assert_eq!(c12_second.c, Origin::new(5, 6 + 4));
        assert_eq!((c12_second.m, c12_second.n, c12_second.k), (4, 5, 5));
    }

    #[test]
    fn test_size_one_is_base_case() {
        let a = Matrix::from_vec(1, 1, vec![3.0]).unwrap();
        let b = Matrix::from_vec(1, 1, vec![4.0]).unwrap();
        let mut c = Matrix::from_vec(1, 1, vec![1.0]).unwrap();
        multiply_range(&a, &b, &mut c, SubproblemCoordinate::root(1)).unwrap();
        assert_eq!(c[(0, 0)], 13.0);
    }
}
