//! `fm-matrix` - Dense matrix container for fork-join matrix multiplication.
//!
//! This crate provides:
//! - A row-major `f64` `Matrix` with fixed dimensions
//! - A `random` factory drawing cells uniformly from `[0, 10)`
//! - Pure combine helpers (`add`, `vstack`, `tile`) used to reassemble
//!   output fragments produced by recursive multipliers
//! - Tolerance-based comparison for checking results across strategies

pub mod error;
pub mod matrix;
pub mod ops;

// Re-export primary types at the crate root for convenience.
pub use error::{MatrixError, Result};
pub use matrix::Matrix;
