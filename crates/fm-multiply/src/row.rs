use std::sync::Arc;

use fm_matrix::Matrix;
use tracing::{debug, trace};

use crate::error::Result;
use crate::multiplier::{check_dimensions, check_threshold, Multiplier};
use crate::pool::ForkJoinPool;

/// Fork-join multiplier that splits the output by rows.
///
/// The output row range is halved recursively until a range holds at most
/// `threshold` rows; such leaves are computed sequentially. At each split
/// the upper half is forked, the lower half computed inline, and the two
/// fragments stacked back together in row order.
#[derive(Debug, Clone)]
pub struct RowMultiplier {
    pool: Arc<ForkJoinPool>,
    threshold: usize,
}

impl RowMultiplier {
    /// Create a row-decomposition multiplier running on `pool`.
    ///
    /// # Errors
    /// Returns `InvalidThreshold` if `threshold` is 0.
    pub fn new(pool: Arc<ForkJoinPool>, threshold: usize) -> Result<Self> {
        Ok(RowMultiplier {
            pool,
            threshold: check_threshold(threshold)?,
        })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Multiplier for RowMultiplier {
    fn name(&self) -> &str {
        "row"
    }

    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        check_dimensions(a, b)?;
        debug!(a = ?a.shape(), b = ?b.shape(), threshold = self.threshold, "row multiply");

        let root = RowTask {
            a,
            b,
            pool: &self.pool,
            threshold: self.threshold,
            start: 0,
            end: a.rows(),
        };
        self.pool.invoke(move || root.compute())
    }
}

/// Computes output rows `[start, end)`.
#[derive(Clone, Copy)]
struct RowTask<'a> {
    a: &'a Matrix,
    b: &'a Matrix,
    pool: &'a ForkJoinPool,
    threshold: usize,
    start: usize,
    end: usize,
}

impl RowTask<'_> {
    fn compute(self) -> Result<Matrix> {
        if self.end - self.start <= self.threshold {
            return Ok(self.compute_leaf());
        }

        let mid = (self.start + self.end) / 2;
        let upper = RowTask { end: mid, ..self };
        let lower = RowTask { start: mid, ..self };
        trace!(start = self.start, mid, end = self.end, "row split");

        let (upper, lower) = self
            .pool
            .fork_join(move || upper.compute(), move || lower.compute());
        let (upper, lower) = (upper?, lower?);

        Ok(Matrix::vstack(&upper, &lower)?)
    }

    fn compute_leaf(&self) -> Matrix {
        let k = self.a.cols();
        let n = self.b.cols();
        let lhs = self.a.as_slice();
        let rhs = self.b.as_slice();

        let mut fragment = Matrix::zeros(self.end - self.start, n);
        let out = fragment.as_mut_slice();
        for (i, row) in (self.start..self.end).enumerate() {
            for j in 0..n {
                let mut sum = 0.0f64;
                for p in 0..k {
                    sum += lhs[row * k + p] * rhs[p * n + j];
                }
                out[i * n + j] = sum;
            }
        }
        fragment
    }
}
