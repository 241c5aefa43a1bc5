//! # parsum - Parallel range partitioning and summation
//!
//! Splits the integer domain `[0, total)` into contiguous ranges, runs one
//! isolated worker per range, and reduces the partial sums to the exact
//! total.
//!
//! ## Features
//!
//! - **Exact partitioning**: ranges cover the domain with no gaps or overlaps
//! - **Fan-out/fan-in**: one worker per range, all joined before returning
//! - **Fail-fast**: the first worker error aborts the run, cause preserved
//! - **Strategies**: scoped threads, a rayon pool, or sequential
//! - **Layered config**: defaults, files, `PARSUM_*` env vars, CLI flags
//!
//! ## Quick Start
//!
//! ```rust
//! let total = parsum::run_parallel_sum(1_000).unwrap();
//! assert_eq!(total, 499_500);
//! ```

pub mod cli;
pub mod config;
pub mod parallel;
pub mod sum;

pub use cli::{Cli, Output};
pub use config::{ParsumConfig, Settings};
pub use parallel::{ExecutionStrategy, ExecutorError, Range, split};
pub use sum::{ParallelSum, SumReport, run_parallel_sum};
