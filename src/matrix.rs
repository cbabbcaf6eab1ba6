//! Dense row-major integer matrices (C2).

use crate::int::Int;
use std::fmt;

/// A dense `rows x cols` matrix over an [`Int`] ring element.
///
/// Dimensions are fixed at construction and never change for the lifetime
/// of the value; reshaping always produces a new `Matrix`.
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix<I: Int> {
    rows: usize,
    cols: usize,
    data: Vec<I>,
}

impl<I: Int> Matrix<I> {
    /// Construct a zero-filled `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![I::zero(); rows * cols],
        }
    }

    /// Construct a `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Matrix::new(n, n);
        m.make_identity();
        m
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.rows && j < self.cols, "matrix index ({i},{j}) out of bounds");
        i * self.cols + j
    }

    /// Read entry `(i, j)`.
    pub fn entry(&self, i: usize, j: usize) -> &I {
        &self.data[self.index(i, j)]
    }

    /// Mutable access to entry `(i, j)`.
    pub fn entry_mut(&mut self, i: usize, j: usize) -> &mut I {
        let idx = self.index(i, j);
        &mut self.data[idx]
    }

    /// Set entry `(i, j)`.
    pub fn set(&mut self, i: usize, j: usize, value: I) {
        let idx = self.index(i, j);
        self.data[idx] = value;
    }

    /// Overwrite this matrix with the identity (requires square dimensions
    /// to be meaningful, but is safe to call on any matrix: the diagonal up
    /// to `min(rows, cols)` is set to one and everything else to zero).
    pub fn make_identity(&mut self) {
        for v in self.data.iter_mut() {
            *v = I::zero();
        }
        for k in 0..self.rows.min(self.cols) {
            self.set(k, k, I::one());
        }
    }

    /// Swap two rows.
    pub fn swap_rows(&mut self, r1: usize, r2: usize) {
        if r1 == r2 {
            return;
        }
        for j in 0..self.cols {
            self.data.swap(self.index(r1, j), self.index(r2, j));
        }
    }

    /// Swap two columns.
    pub fn swap_cols(&mut self, c1: usize, c2: usize) {
        if c1 == c2 {
            return;
        }
        for i in 0..self.rows {
            self.data.swap(self.index(i, c1), self.index(i, c2));
        }
    }

    /// Row `i` as a read-only slice.
    pub fn row(&self, i: usize) -> &[I] {
        let start = self.index(i, 0);
        &self.data[start..start + self.cols]
    }

    /// `true` iff every entry of row `i` in `[from, self.cols)` is zero.
    pub fn row_is_zero_from(&self, i: usize, from: usize) -> bool {
        (from..self.cols).all(|j| self.entry(i, j).is_zero())
    }

    /// `true` iff every entry of column `j` in `[from, self.rows)` is zero.
    pub fn col_is_zero_from(&self, j: usize, from: usize) -> bool {
        (from..self.rows).all(|i| self.entry(i, j).is_zero())
    }

    /// Matrix product `self * other`.
    pub fn mul(&self, other: &Matrix<I>) -> Matrix<I> {
        assert_eq!(
            self.cols, other.rows,
            "matrix dimension mismatch: {}x{} * {}x{}",
            self.rows, self.cols, other.rows, other.cols
        );
        let mut result = Matrix::new(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.entry(i, k);
                if a.is_zero() {
                    continue;
                }
                for j in 0..other.cols {
                    let b = other.entry(k, j);
                    if b.is_zero() {
                        continue;
                    }
                    let prod = a.clone() * b;
                    let sum = std::mem::replace(result.entry_mut(i, j), I::zero());
                    *result.entry_mut(i, j) = sum + &prod;
                }
            }
        }
        result
    }

    /// Apply a binary column operation to columns `c1`/`c2` across all rows:
    /// `new_c1 = u*c1 + v*c2`, `new_c2 = a*c2 - b*c1` (the unimodular
    /// operation used by Smith Normal Form reduction, §4.1 step 3).
    pub fn apply_col_op(&mut self, c1: usize, c2: usize, u: &I, v: &I, a: &I, b: &I) {
        for i in 0..self.rows {
            let x1 = self.entry(i, c1).clone();
            let x2 = self.entry(i, c2).clone();
            let new1 = u.clone() * &x1 + &(v.clone() * &x2);
            let new2 = a.clone() * &x2 - &(b.clone() * &x1);
            self.set(i, c1, new1);
            self.set(i, c2, new2);
        }
    }

    /// Apply the row-symmetric counterpart of [`Self::apply_col_op`] to rows
    /// `r1`/`r2`.
    pub fn apply_row_op(&mut self, r1: usize, r2: usize, u: &I, v: &I, a: &I, b: &I) {
        for j in 0..self.cols {
            let x1 = self.entry(r1, j).clone();
            let x2 = self.entry(r2, j).clone();
            let new1 = u.clone() * &x1 + &(v.clone() * &x2);
            let new2 = a.clone() * &x2 - &(b.clone() * &x1);
            self.set(r1, j, new1);
            self.set(r2, j, new2);
        }
    }

    /// Add `factor * row(src)` into `row(dst)`.
    pub fn add_row_multiple(&mut self, dst: usize, src: usize, factor: &I) {
        for j in 0..self.cols {
            let add = factor.clone() * self.entry(src, j);
            let sum = std::mem::replace(self.entry_mut(dst, j), I::zero());
            *self.entry_mut(dst, j) = sum + &add;
        }
    }

    /// Add `factor * col(src)` into `col(dst)`.
    pub fn add_col_multiple(&mut self, dst: usize, src: usize, factor: &I) {
        for i in 0..self.rows {
            let add = factor.clone() * self.entry(i, src);
            let sum = std::mem::replace(self.entry_mut(i, dst), I::zero());
            *self.entry_mut(i, dst) = sum + &add;
        }
    }

    /// Negate every entry of row `i`.
    pub fn negate_row(&mut self, i: usize) {
        for j in 0..self.cols {
            let mut v = self.entry(i, j).clone();
            v.negate();
            self.set(i, j, v);
        }
    }

    /// Negate every entry of column `j`.
    pub fn negate_col(&mut self, j: usize) {
        for i in 0..self.rows {
            let mut v = self.entry(i, j).clone();
            v.negate();
            self.set(i, j, v);
        }
    }

    /// Extract a column as an owned vector.
    pub fn col_vec(&self, j: usize) -> Vec<I> {
        (0..self.rows).map(|i| self.entry(i, j).clone()).collect()
    }

    /// Build a matrix from column vectors of equal length.
    pub fn from_cols(cols: &[Vec<I>]) -> Self {
        let ncols = cols.len();
        let nrows = cols.first().map(|c| c.len()).unwrap_or(0);
        let mut m = Matrix::new(nrows, ncols);
        for (j, col) in cols.iter().enumerate() {
            assert_eq!(col.len(), nrows, "ragged column set passed to from_cols");
            for (i, v) in col.iter().enumerate() {
                m.set(i, j, v.clone());
            }
        }
        m
    }

    /// Multiply this matrix (as a linear map) by a column vector.
    pub fn mul_vec(&self, v: &[I]) -> Vec<I> {
        assert_eq!(v.len(), self.cols, "mul_vec dimension mismatch");
        (0..self.rows)
            .map(|i| {
                let mut acc = I::zero();
                for j in 0..self.cols {
                    if v[j].is_zero() {
                        continue;
                    }
                    acc = acc + &(self.entry(i, j).clone() * &v[j]);
                }
                acc
            })
            .collect()
    }
}

impl<I: Int> fmt::Debug for Matrix<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix {}x{} [", self.rows, self.cols)?;
        for i in 0..self.rows {
            write!(f, "  ")?;
            for j in 0..self.cols {
                write!(f, "{} ", self.entry(i, j))?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}
