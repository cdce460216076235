use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("shape mismatch: expected {}x{}, got {}x{}", expected.0, expected.1, got.0, got.1)]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    #[error("data length {got} does not match {rows}x{cols}")]
    LengthMismatch { rows: usize, cols: usize, got: usize },
    #[error("ragged rows: row {row} has {got} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
}

pub type Result<T> = std::result::Result<T, MatrixError>;
