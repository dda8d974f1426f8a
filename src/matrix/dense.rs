//! Dense row-major matrix storage.

use std::ops::{Index, IndexMut};

use rand::Rng;

use crate::error::{Result, invalid_parameter, shape_mismatch};

/// A dense `rows × cols` matrix of `f32`, stored row-major.
///
/// Element `(r, c)` lives at `r * cols + c` in [`as_slice`](Self::as_slice),
/// which is the layout every kernel in this crate indexes directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Allocates a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// [`Error::ShapeMismatch`](crate::Error::ShapeMismatch) if `data` doesn't
    /// hold exactly `rows * cols` elements.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(shape_mismatch("from_vec", (rows, cols), (1, data.len())));
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix by evaluating `f(row, col)` at every position.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Allocates a matrix and fills it with uniform draws from `[low, high)`.
    ///
    /// ```
    /// use cacheblock::Matrix;
    /// use rand::{SeedableRng, rngs::StdRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let m = Matrix::random(4, 3, 0.0, 1.0, &mut rng).unwrap();
    /// assert!(m.as_slice().iter().all(|&x| (0.0..1.0).contains(&x)));
    /// ```
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        low: f32,
        high: f32,
        rng: &mut R,
    ) -> Result<Self> {
        let mut m = Self::zeros(rows, cols);
        m.fill_random_uniform(rng, low, high)?;
        Ok(m)
    }

    /// Overwrites every element with an independent draw from `[low, high)`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if the
    /// range is empty or either bound isn't finite.
    pub fn fill_random_uniform<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        low: f32,
        high: f32,
    ) -> Result<()> {
        if !low.is_finite() || !high.is_finite() {
            return Err(invalid_parameter(
                "range",
                format!("[{}, {})", low, high),
                "bounds must be finite",
            ));
        }
        if low >= high {
            return Err(invalid_parameter(
                "range",
                format!("[{}, {})", low, high),
                "low must be below high",
            ));
        }
        for x in self.data.iter_mut() {
            *x = rng.random_range(low..high);
        }
        Ok(())
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`, the order [`Error::ShapeMismatch`](crate::Error) reports.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Bounds-checked element read.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// True when shapes match and no pair of elements differs by more than
    /// `epsilon`.
    ///
    /// A NaN on either side always counts as a difference. Infinities compare
    /// equal only to an infinity of the same sign.
    ///
    /// ```
    /// use cacheblock::Matrix;
    ///
    /// let a = Matrix::from_vec(1, 2, vec![1.0, 2.0]).unwrap();
    /// let b = Matrix::from_vec(1, 2, vec![1.0, 2.000001]).unwrap();
    /// assert!(a.equals_within_tolerance(&b, 1e-5));
    /// assert!(!a.equals_within_tolerance(&b, 1e-7));
    /// ```
    pub fn equals_within_tolerance(&self, other: &Matrix, epsilon: f32) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        self.data
            .iter()
            .zip(&other.data)
            .all(|(&x, &y)| elements_close(x, y, epsilon))
    }

    /// Largest absolute element-wise difference, or `None` if the shapes
    /// differ. NaN anywhere yields NaN.
    pub fn max_abs_diff(&self, other: &Matrix) -> Option<f32> {
        if self.shape() != other.shape() {
            return None;
        }
        let mut max = 0.0f32;
        for (&x, &y) in self.data.iter().zip(&other.data) {
            if x == y {
                continue;
            }
            let d = (x - y).abs();
            if d.is_nan() {
                return Some(f32::NAN);
            }
            max = max.max(d);
        }
        Some(max)
    }
}

fn elements_close(x: f32, y: f32, epsilon: f32) -> bool {
    // `x == y` covers same-signed infinities, whose difference would be NaN.
    x == y || (x - y).abs() <= epsilon
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &mut self.data[row * self.cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        let err = Matrix::from_vec(2, 3, vec![0.0; 5]).unwrap_err();
        assert!(matches!(err, crate::Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_row_major_indexing() {
        let m = Matrix::from_fn(2, 3, |r, c| (r * 10 + c) as f32);
        assert_eq!(m.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(m[(1, 2)], 12.0);
        assert_eq!(m.get(1, 2), Some(12.0));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn test_fill_random_uniform_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::random(32, 32, -2.0, 3.0, &mut rng).unwrap();
        assert!(m.as_slice().iter().all(|&x| (-2.0..3.0).contains(&x)));
        // not all draws identical
        assert!(m.as_slice().iter().any(|&x| x != m.as_slice()[0]));
    }

    #[test]
    fn test_fill_random_uniform_is_seeded() {
        let a = Matrix::random(8, 8, 0.0, 1.0, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = Matrix::random(8, 8, 0.0, 1.0, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fill_random_uniform_rejects_bad_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut m = Matrix::zeros(2, 2);
        assert!(m.fill_random_uniform(&mut rng, 1.0, 1.0).is_err());
        assert!(m.fill_random_uniform(&mut rng, 2.0, 1.0).is_err());
        assert!(m.fill_random_uniform(&mut rng, 0.0, f32::INFINITY).is_err());
    }

    #[test]
    fn test_tolerance_edges() {
        let a = Matrix::from_vec(1, 3, vec![1.0, 2.0, 3.0]).unwrap();
        let b = Matrix::from_vec(1, 3, vec![1.0, 2.5, 3.0]).unwrap();
        assert!(a.equals_within_tolerance(&b, 0.5));
        assert!(!a.equals_within_tolerance(&b, 0.4));
        assert_eq!(a.max_abs_diff(&b), Some(0.5));

        let c = Matrix::zeros(3, 1);
        assert!(!a.equals_within_tolerance(&c, 1.0));
        assert_eq!(a.max_abs_diff(&c), None);
    }

    #[test]
    fn test_tolerance_non_finite() {
        let nan = Matrix::from_vec(1, 1, vec![f32::NAN]).unwrap();
        assert!(!nan.equals_within_tolerance(&nan, f32::MAX));
        assert!(nan.max_abs_diff(&nan).unwrap().is_nan());

        let inf = Matrix::from_vec(1, 1, vec![f32::INFINITY]).unwrap();
        let neg = Matrix::from_vec(1, 1, vec![f32::NEG_INFINITY]).unwrap();
        assert!(inf.equals_within_tolerance(&inf, 0.0));
        assert!(!inf.equals_within_tolerance(&neg, f32::MAX));
    }
}
