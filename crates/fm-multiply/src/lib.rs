//! `fm-multiply` - Sequential and fork-join matrix multiplication.
//!
//! Three interchangeable strategies implement [`Multiplier`]:
//! - [`SequentialMultiplier`]: the single-threaded reference
//! - [`RowMultiplier`]: recursive halving of output rows
//! - [`BlockMultiplier`]: recursive halving of the shared dimension, then
//!   of the output block into quadrants
//!
//! The parallel strategies run on an injected [`ForkJoinPool`], a
//! work-stealing pool that may be shared by any number of concurrent calls.

pub mod block;
pub mod config;
pub mod error;
pub mod multiplier;
pub mod pool;
pub mod row;
pub mod sequential;

pub use block::BlockMultiplier;
pub use config::{PoolConfig, DEFAULT_THRESHOLD};
pub use error::{MultiplyError, Result};
pub use multiplier::{check_dimensions, Multiplier, Strategy};
pub use pool::ForkJoinPool;
pub use row::RowMultiplier;
pub use sequential::SequentialMultiplier;
