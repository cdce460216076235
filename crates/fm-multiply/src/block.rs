use std::sync::Arc;

use fm_matrix::Matrix;
use tracing::{debug, trace};

use crate::error::Result;
use crate::multiplier::{check_dimensions, check_threshold, Multiplier};
use crate::pool::ForkJoinPool;

/// Fork-join multiplier that splits along the shared dimension and into
/// 2D output quadrants.
///
/// A unit covers an output block `[r_start, r_end) x [c_start, c_end)` and a
/// k-range `[k_start, k_end)`. It is a leaf once the block area or the
/// k-range length is at most `threshold`. Otherwise:
///
/// - if the k-range exceeds `threshold`, it is halved: both halves compute
///   partial sums for the same block and their fragments are added;
/// - else the block is cut into four quadrants sharing the k-range, and the
///   four fragments are tiled back into place.
///
/// The k-split is always tried first, so operands with a long shared
/// dimension recurse on k until it reaches `threshold` even when the output
/// block is already small. Since a k-range at or under `threshold` already
/// makes a unit a leaf, the quadrant split is only reached by units whose
/// leaf test is bypassed; `multiply` itself always resolves through k-splits.
#[derive(Debug, Clone)]
pub struct BlockMultiplier {
    pool: Arc<ForkJoinPool>,
    threshold: usize,
}

impl BlockMultiplier {
    /// Create a block-decomposition multiplier running on `pool`.
    ///
    /// # Errors
    /// Returns `InvalidThreshold` if `threshold` is 0.
    pub fn new(pool: Arc<ForkJoinPool>, threshold: usize) -> Result<Self> {
        Ok(BlockMultiplier {
            pool,
            threshold: check_threshold(threshold)?,
        })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Multiplier for BlockMultiplier {
    fn name(&self) -> &str {
        "block"
    }

    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        check_dimensions(a, b)?;
        debug!(a = ?a.shape(), b = ?b.shape(), threshold = self.threshold, "block multiply");

        let root = BlockTask {
            a,
            b,
            pool: &self.pool,
            threshold: self.threshold,
            r_start: 0,
            r_end: a.rows(),
            c_start: 0,
            c_end: b.cols(),
            k_start: 0,
            k_end: a.cols(),
        };
        self.pool.invoke(move || root.compute())
    }
}

#[derive(Clone, Copy)]
struct BlockTask<'a> {
    a: &'a Matrix,
    b: &'a Matrix,
    pool: &'a ForkJoinPool,
    threshold: usize,
    r_start: usize,
    r_end: usize,
    c_start: usize,
    c_end: usize,
    k_start: usize,
    k_end: usize,
}

impl BlockTask<'_> {
    fn rows(&self) -> usize {
        self.r_end - self.r_start
    }

    fn cols(&self) -> usize {
        self.c_end - self.c_start
    }

    fn k_size(&self) -> usize {
        self.k_end - self.k_start
    }

    fn compute(self) -> Result<Matrix> {
        if self.rows() * self.cols() <= self.threshold || self.k_size() <= self.threshold {
            return Ok(self.compute_leaf());
        }

        if self.k_size() > self.threshold {
            self.split_k()
        } else {
            self.split_quadrants()
        }
    }

    /// Partial sums over `[k_start, k_mid)` and `[k_mid, k_end)`, added.
    fn split_k(self) -> Result<Matrix> {
        let k_mid = (self.k_start + self.k_end) / 2;
        let front = BlockTask { k_end: k_mid, ..self };
        let back = BlockTask { k_start: k_mid, ..self };
        trace!(k_start = self.k_start, k_mid, k_end = self.k_end, "block k split");

        let (front, back) = self
            .pool
            .fork_join(move || front.compute(), move || back.compute());
        let (front, back) = (front?, back?);

        Ok(front.add(&back)?)
    }

    /// Four output quadrants over the same k-range, tiled.
    fn split_quadrants(self) -> Result<Matrix> {
        let r_mid = (self.r_start + self.r_end) / 2;
        let c_mid = (self.c_start + self.c_end) / 2;
        let tl = BlockTask { r_end: r_mid, c_end: c_mid, ..self };
        let tr = BlockTask { r_end: r_mid, c_start: c_mid, ..self };
        let bl = BlockTask { r_start: r_mid, c_end: c_mid, ..self };
        let br = BlockTask { r_start: r_mid, c_start: c_mid, ..self };
        trace!(r_mid, c_mid, "block quadrant split");

        let (tl, tr, bl, br) = self.pool.fork_join4(
            move || tl.compute(),
            move || tr.compute(),
            move || bl.compute(),
            move || br.compute(),
        );
        let (tl, tr, bl, br) = (tl?, tr?, bl?, br?);

        Ok(Matrix::tile(&tl, &tr, &bl, &br)?)
    }

    /// Direct computation of the block, summing only over this unit's k-range.
    fn compute_leaf(&self) -> Matrix {
        let k = self.a.cols();
        let n = self.b.cols();
        let lhs = self.a.as_slice();
        let rhs = self.b.as_slice();
        let cols = self.cols();

        let mut fragment = Matrix::zeros(self.rows(), cols);
        let out = fragment.as_mut_slice();
        for (i, row) in (self.r_start..self.r_end).enumerate() {
            for (j, col) in (self.c_start..self.c_end).enumerate() {
                let mut sum = 0.0f64;
                for p in self.k_start..self.k_end {
                    sum += lhs[row * k + p] * rhs[p * n + col];
                }
                out[i * cols + j] = sum;
            }
        }
        fragment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::error::MultiplyError;
    use crate::sequential::SequentialMultiplier;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool() -> Arc<ForkJoinPool> {
        Arc::new(ForkJoinPool::new(&PoolConfig::with_threads(4)).unwrap())
    }

    fn task<'a>(
        a: &'a Matrix,
        b: &'a Matrix,
        pool: &'a ForkJoinPool,
        threshold: usize,
    ) -> BlockTask<'a> {
        BlockTask {
            a,
            b,
            pool,
            threshold,
            r_start: 0,
            r_end: a.rows(),
            c_start: 0,
            c_end: b.cols(),
            k_start: 0,
            k_end: a.cols(),
        }
    }

    #[test]
    fn test_multiply_basic() {
        let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        for threshold in [1, 2] {
            let c = BlockMultiplier::new(pool(), threshold)
                .unwrap()
                .multiply(&a, &b)
                .unwrap();
            assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
        }
    }

    #[test]
    fn test_leaf_uses_only_own_k_range() {
        // a = [1 2 3], b = [1;10;100]; k-range [1, 3) gives 2*10 + 3*100.
        let a = Matrix::from_vec(1, 3, vec![1.0, 2.0, 3.0]).unwrap();
        let b = Matrix::from_vec(3, 1, vec![1.0, 10.0, 100.0]).unwrap();
        let p = pool();
        let t = BlockTask {
            k_start: 1,
            ..task(&a, &b, &p, 8)
        };
        assert_eq!(t.compute_leaf().as_slice(), &[320.0]);
    }

    #[test]
    fn test_k_split_adds_partial_sums() {
        // 1x1 output but k = 8 > threshold = 2 forces k-splitting only.
        let a = Matrix::from_vec(1, 8, (1..=8).map(f64::from).collect()).unwrap();
        let b = Matrix::from_vec(8, 1, vec![1.0; 8]).unwrap();
        let p = pool();
        let c = p.invoke(|| task(&a, &b, &p, 2).split_k()).unwrap();
        assert_eq!(c.as_slice(), &[36.0]);
    }

    #[test]
    fn test_quadrant_split_tiles_in_place() {
        // k = 1 keeps every unit on the quadrant path.
        let a = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
        let b = Matrix::from_vec(1, 3, vec![1.0, 10.0, 100.0]).unwrap();
        let p = pool();
        let c = p.invoke(|| task(&a, &b, &p, 1).split_quadrants()).unwrap();
        let expected = SequentialMultiplier::new().multiply(&a, &b).unwrap();
        assert_eq!(c, expected);
    }

    #[test]
    fn test_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = Matrix::random_with_rng(19, 41, &mut rng);
        let b = Matrix::random_with_rng(41, 13, &mut rng);
        let expected = SequentialMultiplier::new().multiply(&a, &b).unwrap();
        for threshold in [1, 3, 10, 64, 1000] {
            let c = BlockMultiplier::new(pool(), threshold)
                .unwrap()
                .multiply(&a, &b)
                .unwrap();
            assert!(c.approx_eq(&expected, 1e-6), "threshold {threshold}");
        }
    }

    #[test]
    fn test_long_shared_dimension() {
        let mut rng = StdRng::seed_from_u64(9);
        let a = Matrix::random_with_rng(2, 500, &mut rng);
        let b = Matrix::random_with_rng(500, 2, &mut rng);
        let expected = SequentialMultiplier::new().multiply(&a, &b).unwrap();
        let c = BlockMultiplier::new(pool(), 1)
            .unwrap()
            .multiply(&a, &b)
            .unwrap();
        assert!(c.approx_eq(&expected, 1e-6));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = BlockMultiplier::new(pool(), 4)
            .unwrap()
            .multiply(&Matrix::zeros(2, 3), &Matrix::zeros(2, 2))
            .unwrap_err();
        assert!(matches!(err, MultiplyError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_zero_threshold_rejected() {
        assert!(matches!(
            BlockMultiplier::new(pool(), 0),
            Err(MultiplyError::InvalidThreshold(0))
        ));
    }
}
