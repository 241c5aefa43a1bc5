//! Parallel summation of `[0, total)`
//!
//! The orchestrator ([`ParallelSum`]) and the worker task ([`range_sum`]) are
//! separate roles: the orchestrator picks a parallelism degree, partitions
//! the domain, and hands each range to the executor; the worker only ever
//! sees its own range.

pub mod report;
pub mod worker;

pub use report::{JsonReporter, SumReport, SumReporter, TextReporter, TracingReporter};
pub use worker::{SumError, range_sum};

use crate::config::ParallelSettings;
use crate::parallel::core::workers_for;
use crate::parallel::{
    CompletionProgress, ExecutionStrategy, ExecutorError, Range, detected_concurrency, split,
};
use std::time::Instant;

/// Configurable summation orchestrator
#[derive(Debug, Clone)]
pub struct ParallelSum {
    settings: ParallelSettings,
    detected: usize,
    progress: bool,
}

impl ParallelSum {
    pub fn new(settings: ParallelSettings) -> Self {
        Self {
            settings,
            detected: detected_concurrency(),
            progress: false,
        }
    }

    /// Show an indicatif bar while workers complete
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Parallelism degree this orchestrator will request
    ///
    /// An explicit `workers` setting wins; otherwise the degree comes from
    /// detected cores, `thread_percentage` and `max_threads`.
    pub fn degree(&self) -> usize {
        match self.settings.workers {
            Some(workers) => workers,
            None => workers_for(
                self.detected,
                self.settings.max_threads,
                self.settings.thread_percentage,
            ),
        }
    }

    pub fn detected_concurrency(&self) -> usize {
        self.detected
    }

    /// Strategy and ranges a run over `[0, total)` will use
    ///
    /// Sequential runs, whether configured or picked because `total` is
    /// below `min_parallel_total`, get a single range.
    pub fn ranges(&self, total: u64) -> Result<(ExecutionStrategy, Vec<Range>), ExecutorError> {
        let degree = self.degree();

        // Validate the degree even when there is nothing to do
        if degree == 0 {
            return Err(ExecutorError::InvalidInput(
                "worker count must be at least 1".to_string(),
            ));
        }

        let strategy =
            ExecutionStrategy::auto(total, self.settings.min_parallel_total, self.settings.strategy);
        let workers = match strategy {
            ExecutionStrategy::Sequential => 1,
            _ => degree,
        };

        Ok((strategy, split(total, workers)?))
    }

    /// Sum `[0, total)` and describe how it was done
    ///
    /// # Errors
    /// Fails with the first worker error (its cause preserved), a spawn
    /// failure, an invalid worker count, or aggregate overflow. No partial
    /// result is returned on failure.
    pub fn run(&self, total: u64) -> Result<SumReport, ExecutorError> {
        let started = Instant::now();
        let (strategy, ranges) = self.ranges(total)?;
        tracing::info!(
            total,
            workers = ranges.len(),
            detected = self.detected,
            %strategy,
            "Starting parallel sum"
        );

        let progress = if self.progress && !ranges.is_empty() {
            CompletionProgress::new(ranges.len(), total)
        } else {
            CompletionProgress::hidden(ranges.len())
        };
        let outcome = strategy.run(
            &ranges,
            range_sum,
            Some(|completed: usize, count: usize, index: usize| {
                progress.worker_done(completed, count, index)
            }),
        );
        progress.finish();

        let result = outcome?;
        Ok(SumReport {
            total,
            workers_used: ranges.len(),
            detected_concurrency: self.detected,
            strategy,
            result,
            elapsed_ms: started.elapsed().as_millis(),
        })
    }
}

/// Sum `[0, total)` using the host's detected hardware concurrency
///
/// ```rust
/// assert_eq!(parsum::sum::run_parallel_sum(100).unwrap(), 4950);
/// ```
pub fn run_parallel_sum(total: u64) -> Result<u64, ExecutorError> {
    ParallelSum::new(ParallelSettings::default())
        .run(total)
        .map(|report| report.result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangular(n: u64) -> u64 {
        if n == 0 { 0 } else { n * (n - 1) / 2 }
    }

    fn with_workers(workers: usize, strategy: ExecutionStrategy) -> ParallelSum {
        ParallelSum::new(ParallelSettings {
            workers: Some(workers),
            strategy,
            ..ParallelSettings::default()
        })
    }

    #[test]
    fn test_run_parallel_sum_known_values() {
        for (n, expected) in [(0u64, 0u64), (1, 0), (10, 45), (100, 4950)] {
            assert_eq!(run_parallel_sum(n).unwrap(), expected, "n = {n}");
        }
    }

    #[test]
    fn test_sum_matches_closed_form() {
        for n in [2u64, 3, 17, 999, 4_096, 65_537] {
            assert_eq!(run_parallel_sum(n).unwrap(), triangular(n), "n = {n}");
        }
    }

    #[test]
    fn test_result_independent_of_degree_and_strategy() {
        for strategy in [
            ExecutionStrategy::Sequential,
            ExecutionStrategy::Threads,
            ExecutionStrategy::Pool,
        ] {
            for workers in [1usize, 4, 16] {
                let report = with_workers(workers, strategy).run(1_000_000).unwrap();
                assert_eq!(report.result, 499_999_500_000, "{strategy} x {workers}");
            }
        }
    }

    #[test]
    fn test_report_describes_run() {
        let report = with_workers(8, ExecutionStrategy::Threads).run(100).unwrap();
        assert_eq!(report.total, 100);
        assert_eq!(report.workers_used, 8);
        assert_eq!(report.strategy, ExecutionStrategy::Threads);
        assert!(report.detected_concurrency >= 1);
    }

    #[test]
    fn test_fewer_ranges_than_workers_for_tiny_totals() {
        let report = with_workers(16, ExecutionStrategy::Threads).run(3).unwrap();
        assert_eq!(report.workers_used, 3);
        assert_eq!(report.result, 3);
    }

    #[test]
    fn test_below_threshold_runs_sequentially() {
        let sum = ParallelSum::new(ParallelSettings {
            workers: Some(8),
            min_parallel_total: 1_000,
            ..ParallelSettings::default()
        });
        let report = sum.run(500).unwrap();
        assert_eq!(report.strategy, ExecutionStrategy::Sequential);
        assert_eq!(report.workers_used, 1);
        assert_eq!(report.result, triangular(500));
    }

    #[test]
    fn test_ranges_match_what_run_uses() {
        let sequential = with_workers(4, ExecutionStrategy::Sequential);
        let (strategy, ranges) = sequential.ranges(100).unwrap();
        assert_eq!(strategy, ExecutionStrategy::Sequential);
        assert_eq!(ranges, vec![Range::new(0, 100)]);
        assert_eq!(sequential.run(100).unwrap().workers_used, ranges.len());

        let threads = with_workers(4, ExecutionStrategy::Threads);
        let (strategy, ranges) = threads.ranges(100).unwrap();
        assert_eq!(strategy, ExecutionStrategy::Threads);
        assert_eq!(ranges.len(), 4);
        assert_eq!(threads.run(100).unwrap().workers_used, ranges.len());
    }

    #[test]
    fn test_zero_workers_is_invalid_input() {
        for total in [0u64, 10] {
            let err = with_workers(0, ExecutionStrategy::Threads).run(total).unwrap_err();
            assert!(matches!(err, ExecutorError::InvalidInput(_)), "total = {total}");
        }
    }

    #[test]
    fn test_default_degree_follows_detected_cores() {
        let sum = ParallelSum::new(ParallelSettings::default());
        assert_eq!(sum.degree(), sum.detected_concurrency());
    }

    #[test]
    fn test_worker_overflow_propagates_with_cause() {
        use std::error::Error as _;

        let ranges = [
            crate::parallel::Range::new(0, 10),
            crate::parallel::Range::new(u64::MAX - 2, u64::MAX),
        ];
        let err = ExecutionStrategy::Threads
            .run(&ranges, range_sum, None::<fn(usize, usize, usize)>)
            .unwrap_err();

        assert_eq!(err.worker_index(), Some(1));
        let cause = err.source().unwrap().downcast_ref::<SumError>().unwrap();
        assert_eq!(cause, &SumError::Overflow { range: ranges[1] });
    }

    #[test]
    fn test_aggregate_overflow_is_reported() {
        let ranges = [
            crate::parallel::Range::new(u64::MAX - 1, u64::MAX),
            crate::parallel::Range::new(u64::MAX - 3, u64::MAX - 2),
        ];
        let err = ExecutionStrategy::Threads
            .run(&ranges, range_sum, None::<fn(usize, usize, usize)>)
            .unwrap_err();
        assert!(matches!(err, ExecutorError::Overflow { partials: 2 }));
    }
}
