//! Combine operations over output fragments.
//!
//! Each function is a pure function of its operands: it allocates a fresh
//! matrix and never mutates its inputs.

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

impl Matrix {
    /// Element-wise sum of two same-shaped matrices.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the shapes differ.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        if self.shape() != other.shape() {
            return Err(MatrixError::ShapeMismatch {
                expected: self.shape(),
                got: other.shape(),
            });
        }
        let data = self
            .as_slice()
            .iter()
            .zip(other.as_slice().iter())
            .map(|(a, b)| a + b)
            .collect();
        Matrix::from_vec(self.rows(), self.cols(), data)
    }

    /// Stack `top`'s rows above `bottom`'s rows.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the column counts differ.
    pub fn vstack(top: &Matrix, bottom: &Matrix) -> Result<Matrix> {
        if top.cols() != bottom.cols() {
            return Err(MatrixError::ShapeMismatch {
                expected: (bottom.rows(), top.cols()),
                got: bottom.shape(),
            });
        }
        let mut data = Vec::with_capacity(top.as_slice().len() + bottom.as_slice().len());
        data.extend_from_slice(top.as_slice());
        data.extend_from_slice(bottom.as_slice());
        Matrix::from_vec(top.rows() + bottom.rows(), top.cols(), data)
    }

    /// Place four quadrants into one matrix:
    ///
    /// ```text
    /// [ tl  tr ]
    /// [ bl  br ]
    /// ```
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the quadrants do not share row heights
    /// across each band and column widths down each side.
    pub fn tile(tl: &Matrix, tr: &Matrix, bl: &Matrix, br: &Matrix) -> Result<Matrix> {
        let top = tl.rows();
        let bottom = bl.rows();
        let left = tl.cols();
        let right = tr.cols();

        for (quad, expected) in [
            (tr, (top, right)),
            (bl, (bottom, left)),
            (br, (bottom, right)),
        ] {
            if quad.shape() != expected {
                return Err(MatrixError::ShapeMismatch {
                    expected,
                    got: quad.shape(),
                });
            }
        }

        let cols = left + right;
        let mut out = Matrix::zeros(top + bottom, cols);
        let dst = out.as_mut_slice();
        for (band_offset, west, east) in [(0, tl, tr), (top, bl, br)] {
            for i in 0..west.rows() {
                let row = &mut dst[(band_offset + i) * cols..(band_offset + i + 1) * cols];
                row[..left].copy_from_slice(west.row(i));
                row[left..].copy_from_slice(east.row(i));
            }
        }
        Ok(out)
    }
}
