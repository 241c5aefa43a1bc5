//! Range partitioning and fan-out/fan-in execution
//!
//! This module splits a workload `[0, total)` into contiguous ranges and runs
//! one isolated worker per range, collecting exactly one partial result from
//! each before reducing them.
//!
//! # Architecture Responsibilities
//!
//! ## What This Module Does:
//! - **Partitioning**: `split` divides `[0, total)` into at most `workers` contiguous ranges
//! - **Resource Discovery**: Detects available CPU cores using `num_cpus::get()`
//! - **Execution Strategy**: Sequential, scoped threads, or a rayon pool
//! - **Lifecycle**: Every spawned worker is joined before a run returns
//! - **Fail-fast**: The first worker error or panic aborts the run
//!
//! ## What This Module Does NOT Do:
//! - **Domain Logic**: Does not know what a worker computes over its range
//! - **Retries**: A failed worker is never re-spawned
//! - **Reporting**: Presenting results belongs to the caller
//!
//! ```text
//! ┌─────────────┐   ranges   ┌──────────────┐  Range  ┌──────────┐
//! │ Partitioner │──────────▶│   Executor   │────────▶│ Worker i │
//! │   split()   │           │              │◀────────│          │
//! └─────────────┘           │ collect (i)  │ partial └──────────┘
//!                           │ aggregate()  │
//!                           └──────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use parsum::parallel::{split, ExecutionStrategy};
//!
//! let ranges = split(100, 4).unwrap();
//! let total = ExecutionStrategy::Threads
//!     .run(
//!         &ranges,
//!         |r| Ok::<u64, std::convert::Infallible>((r.start..r.end).sum()),
//!         None::<fn(usize, usize, usize)>,
//!     )
//!     .unwrap();
//! assert_eq!(total, 4950);
//! ```

pub mod core;
pub mod error;
pub mod partition;
pub mod progress;

// Re-export main types for easier access
pub use self::core::{
    ExecutionStrategy, ExecutorPhase, ParallelExecutor, PoolExecutor, SequentialExecutor,
    aggregate, detected_concurrency,
};
pub use error::{BoxError, ExecutorError};
pub use partition::{Range, split};
pub use progress::CompletionProgress;
