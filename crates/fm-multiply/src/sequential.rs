use fm_matrix::Matrix;
use tracing::debug;

use crate::error::Result;
use crate::multiplier::{check_dimensions, Multiplier};

/// Single-threaded triple-loop multiplier.
///
/// Accumulates each output cell over `k` in ascending order; this is the
/// reference result the parallel strategies are checked against.
#[derive(Debug, Clone, Default)]
pub struct SequentialMultiplier;

impl SequentialMultiplier {
    pub fn new() -> Self {
        SequentialMultiplier
    }
}

impl Multiplier for SequentialMultiplier {
    fn name(&self) -> &str {
        "sequential"
    }

    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        check_dimensions(a, b)?;
        debug!(a = ?a.shape(), b = ?b.shape(), "sequential multiply");

        let (m, k) = a.shape();
        let n = b.cols();
        let lhs = a.as_slice();
        let rhs = b.as_slice();

        let mut c = Matrix::zeros(m, n);
        let out = c.as_mut_slice();
        for i in 0..m {
            for j in 0..n {
                let mut sum = 0.0f64;
                for p in 0..k {
                    sum += lhs[i * k + p] * rhs[p * n + j];
                }
                out[i * n + j] = sum;
            }
        }
        Ok(c)
    }
}
