use super::error::{BoxError, ExecutorError, panic_message};
use super::partition::Range;
use crossbeam::channel::{Receiver, Sender, bounded};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Name prefix for spawned worker threads (`parsum-worker-<index>`)
pub const WORKER_THREAD_PREFIX: &str = "parsum-worker";

/// Lifecycle of one executor run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorPhase {
    Idle,
    Dispatching,
    AwaitingAll,
    Aggregated,
    Aborted,
}

impl fmt::Display for ExecutorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutorPhase::Idle => "idle",
            ExecutorPhase::Dispatching => "dispatching",
            ExecutorPhase::AwaitingAll => "awaiting-all",
            ExecutorPhase::Aggregated => "aggregated",
            ExecutorPhase::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

fn enter(phase: ExecutorPhase, workers: usize) {
    tracing::debug!(%phase, workers, "Executor phase");
}

/// What a single worker reports back before terminating
enum WorkerOutcome<R> {
    Completed(R),
    Failed(BoxError),
    Panicked(String),
}

/// Run the worker function on one range, catching panics at the worker boundary
fn run_worker<R, E, F>(worker: &F, range: Range) -> WorkerOutcome<R>
where
    E: Into<BoxError>,
    F: Fn(Range) -> Result<R, E>,
{
    match catch_unwind(AssertUnwindSafe(|| worker(range))) {
        Ok(Ok(value)) => WorkerOutcome::Completed(value),
        Ok(Err(e)) => WorkerOutcome::Failed(e.into()),
        Err(payload) => WorkerOutcome::Panicked(panic_message(payload.as_ref())),
    }
}

impl<R> WorkerOutcome<R> {
    fn into_result(self, index: usize, range: Range) -> Result<R, ExecutorError> {
        match self {
            WorkerOutcome::Completed(value) => {
                tracing::trace!(index, %range, "Worker completed");
                Ok(value)
            }
            WorkerOutcome::Failed(source) => {
                tracing::warn!(index, %range, error = %source, "Worker failed");
                Err(ExecutorError::Worker { index, range, source })
            }
            WorkerOutcome::Panicked(message) => {
                tracing::warn!(index, %range, %message, "Worker panicked");
                Err(ExecutorError::Panicked { index, range, message })
            }
        }
    }
}

/// Reduce partial results to a single total
///
/// Summation is exact, so the result does not depend on the order the
/// partials arrived in.
pub fn aggregate(partials: &[u64]) -> Result<u64, ExecutorError> {
    partials
        .iter()
        .try_fold(0u64, |acc, &partial| acc.checked_add(partial))
        .ok_or(ExecutorError::Overflow {
            partials: partials.len(),
        })
}

/// Fan-out/fan-in executor: one scoped OS thread per range
///
/// Each worker receives its [`Range`] by value and reports exactly one
/// outcome over a channel, tagged with its index. The collector fills the
/// slot owned by that index, so results come back in range order however
/// the workers are scheduled. All threads are joined before `execute`
/// returns, on success and on failure.
#[derive(Debug, Default)]
pub struct ParallelExecutor {
    stack_size: Option<usize>,
}

impl ParallelExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack size in bytes for each worker thread (platform default otherwise)
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Execute `worker` on every range in parallel and collect results in range order
    ///
    /// The first failure aborts collection: already collected results are
    /// dropped and the error is returned once every spawned thread has
    /// been joined.
    pub fn execute<R, E, F, P>(
        &self,
        ranges: &[Range],
        worker: F,
        progress_reporter: Option<P>,
    ) -> Result<Vec<R>, ExecutorError>
    where
        R: Send,
        E: Into<BoxError>,
        F: Fn(Range) -> Result<R, E> + Sync,
        P: Fn(usize, usize, usize) + Sync, // (completed, total, worker_index)
    {
        let total = ranges.len();
        enter(ExecutorPhase::Idle, total);
        if total == 0 {
            return Ok(Vec::new());
        }

        let worker = &worker;
        let outcome = crossbeam::thread::scope(|s| -> Result<Vec<R>, ExecutorError> {
            let (result_tx, result_rx): (
                Sender<(usize, WorkerOutcome<R>)>,
                Receiver<(usize, WorkerOutcome<R>)>,
            ) = bounded(total);

            enter(ExecutorPhase::Dispatching, total);
            for (index, range) in ranges.iter().copied().enumerate() {
                let result_tx = result_tx.clone();
                let mut builder = s.builder().name(format!("{WORKER_THREAD_PREFIX}-{index}"));
                if let Some(bytes) = self.stack_size {
                    builder = builder.stack_size(bytes);
                }
                let spawned = builder.spawn(move |_| {
                    tracing::trace!(index, %range, "Worker running");
                    let outcome = run_worker(worker, range);
                    // The collector may already have aborted; a late result is discarded
                    let _ = result_tx.send((index, outcome));
                });

                if let Err(source) = spawned {
                    // Threads spawned so far are joined when the scope ends
                    enter(ExecutorPhase::Aborted, total);
                    return Err(ExecutorError::Spawn { index, source });
                }
            }

            // Drop our sender so the channel disconnects once every worker is done
            drop(result_tx);

            enter(ExecutorPhase::AwaitingAll, total);
            let collected = collect_results(result_rx, ranges, progress_reporter.as_ref());
            let phase = if collected.is_ok() {
                ExecutorPhase::Aggregated
            } else {
                ExecutorPhase::Aborted
            };
            enter(phase, total);
            collected
        });

        // Panics are caught inside each worker, so an Err here means a
        // thread died outside the worker function
        outcome.map_err(|_| ExecutorError::WorkerLost { missing: total })?
    }

    /// Execute `worker` on every range in parallel and sum the partial results
    pub fn run<E, F>(&self, ranges: &[Range], worker: F) -> Result<u64, ExecutorError>
    where
        E: Into<BoxError>,
        F: Fn(Range) -> Result<u64, E> + Sync,
    {
        let partials = self.execute(ranges, worker, None::<fn(usize, usize, usize)>)?;
        aggregate(&partials)
    }
}

/// Collect exactly one outcome per range, stopping at the first failure
fn collect_results<R, P>(
    result_rx: Receiver<(usize, WorkerOutcome<R>)>,
    ranges: &[Range],
    progress_reporter: Option<&P>,
) -> Result<Vec<R>, ExecutorError>
where
    P: Fn(usize, usize, usize),
{
    let total = ranges.len();
    let mut slots: Vec<Option<R>> = (0..total).map(|_| None).collect();
    let mut completed = 0;

    while completed < total {
        let Ok((index, outcome)) = result_rx.recv() else {
            break; // every sender is gone
        };

        let value = outcome.into_result(index, ranges[index])?;
        slots[index] = Some(value);
        completed += 1;

        if let Some(reporter) = progress_reporter {
            reporter(completed, total, index);
        }
    }

    let missing = slots.iter().filter(|slot| slot.is_none()).count();
    if missing > 0 {
        return Err(ExecutorError::WorkerLost { missing });
    }
    Ok(slots.into_iter().flatten().collect())
}

/// Runs every range in order on the calling thread
///
/// Same contract as [`ParallelExecutor`]: results in range order, first
/// failure aborts.
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn execute<R, E, F, P>(
        ranges: &[Range],
        worker: F,
        progress_reporter: Option<P>,
    ) -> Result<Vec<R>, ExecutorError>
    where
        E: Into<BoxError>,
        F: Fn(Range) -> Result<R, E>,
        P: Fn(usize, usize, usize), // (completed, total, worker_index)
    {
        let total = ranges.len();
        enter(ExecutorPhase::Idle, total);
        let mut results = Vec::with_capacity(total);

        enter(ExecutorPhase::Dispatching, total);
        // Workers run inline, so dispatching and awaiting coincide
        enter(ExecutorPhase::AwaitingAll, total);
        for (index, range) in ranges.iter().copied().enumerate() {
            let value = match run_worker(&worker, range).into_result(index, range) {
                Ok(value) => value,
                Err(e) => {
                    enter(ExecutorPhase::Aborted, total);
                    return Err(e);
                }
            };
            results.push(value);

            if let Some(reporter) = &progress_reporter {
                reporter(index + 1, total, index);
            }
        }

        enter(ExecutorPhase::Aggregated, total);
        Ok(results)
    }
}

/// Runs every range on a dedicated rayon pool sized to the number of ranges
#[derive(Debug, Default)]
pub struct PoolExecutor;

impl PoolExecutor {
    pub fn new() -> Self {
        Self
    }

    pub fn execute<R, E, F, P>(
        &self,
        ranges: &[Range],
        worker: F,
        progress_reporter: Option<P>,
    ) -> Result<Vec<R>, ExecutorError>
    where
        R: Send,
        E: Into<BoxError>,
        F: Fn(Range) -> Result<R, E> + Sync,
        P: Fn(usize, usize, usize) + Sync,
    {
        let total = ranges.len();
        enter(ExecutorPhase::Idle, total);
        if total == 0 {
            return Ok(Vec::new());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(total)
            .thread_name(|i| format!("{WORKER_THREAD_PREFIX}-{i}"))
            .build()?;

        enter(ExecutorPhase::Dispatching, total);
        // install blocks until every pool task has finished or short-circuited
        enter(ExecutorPhase::AwaitingAll, total);
        let completed = AtomicUsize::new(0);
        let collected = pool.install(|| {
            ranges
                .par_iter()
                .copied()
                .enumerate()
                .map(|(index, range)| {
                    let value = run_worker(&worker, range).into_result(index, range)?;
                    let current = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(reporter) = &progress_reporter {
                        reporter(current, total, index);
                    }
                    Ok(value)
                })
                // Short-circuits on the first error rayon observes
                .collect::<Result<Vec<R>, ExecutorError>>()
        });

        let phase = if collected.is_ok() {
            ExecutorPhase::Aggregated
        } else {
            ExecutorPhase::Aborted
        };
        enter(phase, total);
        collected
    }
}

/// Execution strategy for choosing how ranges are fanned out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStrategy {
    /// Run every range on the calling thread
    Sequential,
    /// One scoped OS thread per range
    Threads,
    /// One rayon pool thread per range
    Pool,
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionStrategy::Sequential => "sequential",
            ExecutionStrategy::Threads => "threads",
            ExecutionStrategy::Pool => "pool",
        };
        f.write_str(name)
    }
}

impl ExecutionStrategy {
    pub fn execute<R, E, F, P>(
        &self,
        ranges: &[Range],
        worker: F,
        progress_reporter: Option<P>,
    ) -> Result<Vec<R>, ExecutorError>
    where
        R: Send,
        E: Into<BoxError>,
        F: Fn(Range) -> Result<R, E> + Sync,
        P: Fn(usize, usize, usize) + Sync,
    {
        match self {
            ExecutionStrategy::Sequential => {
                SequentialExecutor::execute(ranges, worker, progress_reporter)
            }
            ExecutionStrategy::Threads => {
                ParallelExecutor::new().execute(ranges, worker, progress_reporter)
            }
            ExecutionStrategy::Pool => PoolExecutor::new().execute(ranges, worker, progress_reporter),
        }
    }

    /// Execute and sum the partial results
    pub fn run<E, F, P>(
        &self,
        ranges: &[Range],
        worker: F,
        progress_reporter: Option<P>,
    ) -> Result<u64, ExecutorError>
    where
        E: Into<BoxError>,
        F: Fn(Range) -> Result<u64, E> + Sync,
        P: Fn(usize, usize, usize) + Sync,
    {
        let partials = self.execute(ranges, worker, progress_reporter)?;
        aggregate(&partials)
    }

    /// Threshold-based strategy selection
    ///
    /// Workloads smaller than `min_parallel_total` skip the fan-out and run
    /// sequentially; everything else uses `preferred`.
    ///
    /// ```rust
    /// use parsum::parallel::ExecutionStrategy;
    ///
    /// let strategy = ExecutionStrategy::auto(36, 50, ExecutionStrategy::Threads);
    /// assert_eq!(strategy, ExecutionStrategy::Sequential);
    ///
    /// let strategy = ExecutionStrategy::auto(100, 50, ExecutionStrategy::Threads);
    /// assert_eq!(strategy, ExecutionStrategy::Threads);
    /// ```
    pub fn auto(total: u64, min_parallel_total: u64, preferred: ExecutionStrategy) -> Self {
        if total >= min_parallel_total {
            preferred
        } else {
            ExecutionStrategy::Sequential
        }
    }

    /// Calculate the parallelism degree from detected cores and configuration limits
    ///
    /// # Algorithm
    /// ```text
    /// 1. Detect available CPU cores: num_cpus::get()
    /// 2. Apply percentage: cores * thread_percentage / 100
    /// 3. Apply config limit: min(max_threads_config, percentage_result) if max_threads_config > 0
    /// 4. Ensure minimum: max(1, final_result)
    /// ```
    ///
    /// ```rust
    /// use parsum::parallel::ExecutionStrategy;
    ///
    /// let workers = ExecutionStrategy::calculate_optimal_workers(0, 100);
    /// assert!(workers >= 1);
    ///
    /// let workers = ExecutionStrategy::calculate_optimal_workers(2, 100);
    /// assert!(workers <= 2);
    /// ```
    pub fn calculate_optimal_workers(max_threads_config: usize, thread_percentage: u8) -> usize {
        workers_for(detected_concurrency(), max_threads_config, thread_percentage)
    }
}

/// Hardware concurrency of the host, never less than 1
pub fn detected_concurrency() -> usize {
    num_cpus::get().max(1)
}

pub(crate) fn workers_for(available_cores: usize, max_threads_config: usize, thread_percentage: u8) -> usize {
    let workers_by_percentage =
        std::cmp::max(1, (available_cores * thread_percentage as usize) / 100);

    // 0 means no configured limit
    if max_threads_config > 0 {
        std::cmp::min(max_threads_config, workers_by_percentage)
    } else {
        workers_by_percentage
    }
}
