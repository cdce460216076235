use fm_matrix::MatrixError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MultiplyError {
    #[error(
        "matrix dimensions incompatible: A({a_rows}x{a_cols}) cannot be multiplied by B({b_rows}x{b_cols})"
    )]
    DimensionMismatch {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },
    #[error("threshold must be a positive integer, got {0}")]
    InvalidThreshold(usize),
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
    #[error("failed to build worker pool: {0}")]
    PoolBuild(String),
    #[error("unit of work panicked: {0}")]
    TaskPanicked(String),
    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),
}

pub type Result<T> = std::result::Result<T, MultiplyError>;
