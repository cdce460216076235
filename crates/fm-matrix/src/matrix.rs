use std::ops::{Index, IndexMut};

use rand::Rng;

use crate::error::{MatrixError, Result};

/// Upper bound (exclusive) of the values produced by [`Matrix::random`].
pub const RANDOM_UPPER: f64 = 10.0;

/// A dense matrix of 64-bit floats.
///
/// Holds contiguous, row-major data with dimensions fixed at construction.
/// Storage length is always exactly `rows * cols`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a zero-filled matrix with the given dimensions.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a matrix from row-major data.
    ///
    /// # Errors
    /// Returns `LengthMismatch` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(MatrixError::LengthMismatch {
                rows,
                cols,
                got: data.len(),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Create a matrix from a list of rows.
    ///
    /// # Errors
    /// Returns `RaggedRows` if any row differs in length from the first.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::RaggedRows {
                    row: i,
                    expected: cols,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Create an `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Matrix::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Create a matrix whose cells are drawn independently and uniformly
    /// from `[0, 10)` using the thread-local RNG.
    pub fn random(rows: usize, cols: usize) -> Self {
        Self::random_with_rng(rows, cols, &mut rand::thread_rng())
    }

    /// Like [`Matrix::random`], but draws from a caller-supplied RNG so the
    /// result can be reproduced from a seed.
    pub fn random_with_rng<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let data = (0..rows * cols)
            .map(|_| rng.gen_range(0.0..RANDOM_UPPER))
            .collect();
        Matrix { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the underlying row-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns the underlying row-major data as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Returns row `r` as a slice of length `cols`.
    ///
    /// # Panics
    /// Panics if `r >= rows`.
    pub fn row(&self, r: usize) -> &[f64] {
        assert!(r < self.rows, "row {} out of range for {} rows", r, self.rows);
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Returns the cell at `(r, c)`.
    ///
    /// # Panics
    /// Panics if the index is out of range.
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[self.offset(r, c)]
    }

    /// Overwrites the cell at `(r, c)`.
    ///
    /// # Panics
    /// Panics if the index is out of range.
    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        let idx = self.offset(r, c);
        self.data[idx] = value;
    }

    /// Returns a new matrix with every cell multiplied by `s`.
    pub fn scale(&self, s: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| v * s).collect(),
        }
    }

    /// Largest absolute cell difference, or `None` if the shapes differ.
    pub fn max_abs_diff(&self, other: &Matrix) -> Option<f64> {
        if self.shape() != other.shape() {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max),
        )
    }

    /// True if both matrices have the same shape and every pair of cells
    /// differs by at most `tol`.
    pub fn approx_eq(&self, other: &Matrix, tol: f64) -> bool {
        self.max_abs_diff(other).is_some_and(|d| d <= tol)
    }

    fn offset(&self, r: usize, c: usize) -> usize {
        assert!(
            r < self.rows && c < self.cols,
            "index ({}, {}) out of range for {}x{} matrix",
            r,
            c,
            self.rows,
            self.cols
        );
        r * self.cols + c
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.data[self.offset(r, c)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        let idx = self.offset(r, c);
        &mut self.data[idx]
    }
}
