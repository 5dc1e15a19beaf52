//! Core types for grade statistics
//!
//! This crate provides the pieces shared by every grade-stats crate:
//!
//! - **Errors**: one [`Error`] enum and [`Result`] alias for the workspace
//! - **Percentiles**: linearly interpolated percentiles of sorted data
//! - **Execution**: sequential or Rayon-backed batches of independent trials
//! - **Utilities**: sorting, means and weighted moments over slices
//!
//! # Example
//!
//! ```rust
//! use grade_core::{percentile, utils::sort_ascending};
//!
//! let mut means = vec![5.1, 4.9, 5.4, 5.0, 5.2];
//! sort_ascending(&mut means);
//!
//! let median = percentile(&means, 0.5).unwrap();
//! assert_eq!(median, 5.1);
//! ```

pub mod error;
pub mod execution;
pub mod percentile;
pub mod utils;

// Re-export core types
pub use error::{Error, Result};
pub use execution::{execute_batch, ExecutionEngine, ExecutionStrategy, SequentialEngine};
#[cfg(feature = "parallel")]
pub use execution::ParallelEngine;
pub use percentile::{central_interval, percentile};
