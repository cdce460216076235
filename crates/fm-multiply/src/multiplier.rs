use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use fm_matrix::Matrix;

use crate::block::BlockMultiplier;
use crate::error::{MultiplyError, Result};
use crate::pool::ForkJoinPool;
use crate::row::RowMultiplier;
use crate::sequential::SequentialMultiplier;

/// Trait for matrix multiplication strategies.
///
/// Every implementation computes `C = A * B` for `A` of shape `m x k` and
/// `B` of shape `k x n`, and fails with `DimensionMismatch` before doing any
/// work when `A.cols() != B.rows()`.
pub trait Multiplier: Send + Sync {
    /// Returns the name of this strategy.
    fn name(&self) -> &str;

    /// Multiply `a` by `b`, returning a fresh `a.rows() x b.cols()` matrix.
    fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix>;
}

/// Fails with `DimensionMismatch` unless `a.cols() == b.rows()`.
pub fn check_dimensions(a: &Matrix, b: &Matrix) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(MultiplyError::DimensionMismatch {
            a_rows: a.rows(),
            a_cols: a.cols(),
            b_rows: b.rows(),
            b_cols: b.cols(),
        });
    }
    Ok(())
}

pub(crate) fn check_threshold(threshold: usize) -> Result<usize> {
    if threshold == 0 {
        return Err(MultiplyError::InvalidThreshold(threshold));
    }
    Ok(threshold)
}

/// Selects one of the available strategies by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Sequential,
    RowDecomposition,
    BlockDecomposition,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Sequential,
        Strategy::RowDecomposition,
        Strategy::BlockDecomposition,
    ];

    /// Construct the multiplier for this strategy.
    ///
    /// `pool` and `threshold` are ignored by `Sequential`.
    pub fn build(self, pool: Arc<ForkJoinPool>, threshold: usize) -> Result<Box<dyn Multiplier>> {
        Ok(match self {
            Strategy::Sequential => Box::new(SequentialMultiplier::new()),
            Strategy::RowDecomposition => Box::new(RowMultiplier::new(pool, threshold)?),
            Strategy::BlockDecomposition => Box::new(BlockMultiplier::new(pool, threshold)?),
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::RowDecomposition => "row",
            Strategy::BlockDecomposition => "block",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = MultiplyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(Strategy::Sequential),
            "row" | "rows" => Ok(Strategy::RowDecomposition),
            "block" | "blocks" => Ok(Strategy::BlockDecomposition),
            other => Err(MultiplyError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;

    #[test]
    fn test_check_dimensions() {
        assert!(check_dimensions(&Matrix::zeros(2, 3), &Matrix::zeros(3, 4)).is_ok());
        let err = check_dimensions(&Matrix::zeros(2, 3), &Matrix::zeros(2, 2)).unwrap_err();
        assert!(matches!(
            err,
            MultiplyError::DimensionMismatch {
                a_rows: 2,
                a_cols: 3,
                b_rows: 2,
                b_cols: 2
            }
        ));
        assert_eq!(
            err.to_string(),
            "matrix dimensions incompatible: A(2x3) cannot be multiplied by B(2x2)"
        );
    }

    #[test]
    fn test_strategy_round_trip_names() {
        for s in Strategy::ALL {
            assert_eq!(s.to_string().parse::<Strategy>().unwrap(), s);
        }
        assert_eq!(" Block ".parse::<Strategy>().unwrap(), Strategy::BlockDecomposition);
        assert!(matches!(
            "diagonal".parse::<Strategy>(),
            Err(MultiplyError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_build_names_match() {
        let pool = Arc::new(ForkJoinPool::new(&PoolConfig::with_threads(2)).unwrap());
        for s in Strategy::ALL {
            let m = s.build(pool.clone(), 4).unwrap();
            assert_eq!(m.name(), s.as_str());
        }
    }

    #[test]
    fn test_build_rejects_zero_threshold() {
        let pool = Arc::new(ForkJoinPool::new(&PoolConfig::with_threads(1)).unwrap());
        assert!(Strategy::Sequential.build(pool.clone(), 0).is_ok());
        assert!(matches!(
            Strategy::RowDecomposition.build(pool.clone(), 0),
            Err(MultiplyError::InvalidThreshold(0))
        ));
        assert!(matches!(
            Strategy::BlockDecomposition.build(pool, 0),
            Err(MultiplyError::InvalidThreshold(0))
        ));
    }
}
