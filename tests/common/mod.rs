//! Shared fixture builders for the cross-module behavioral test suite.

use regina_core::int::{Int, Integer};
use regina_core::matrix::Matrix;

/// Build an `Integer` from a machine integer; shorthand shared across test files.
pub fn int(v: i64) -> Integer {
    Integer::from_int(v)
}

/// Build a row-major `Matrix<Integer>` from a flat slice of values.
pub fn mat(rows: usize, cols: usize, vals: &[i64]) -> Matrix<Integer> {
    assert_eq!(vals.len(), rows * cols);
    let mut m = Matrix::new(rows, cols);
    for i in 0..rows {
        for j in 0..cols {
            m.set(i, j, int(vals[i * cols + j]));
        }
    }
    m
}

/// Extract a matrix's entries back out as a flat `Vec<i64>`, for asserting
/// against hand-computed expected values.
pub fn as_i64_rows(m: &Matrix<Integer>) -> Vec<i64> {
    let mut out = Vec::with_capacity(m.rows() * m.cols());
    for i in 0..m.rows() {
        for j in 0..m.cols() {
            out.push(m.entry(i, j).as_bigint().clone().try_into().expect("entry too large for i64 in test fixture"));
        }
    }
    out
}
