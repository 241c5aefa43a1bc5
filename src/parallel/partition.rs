use super::error::ExecutorError;
use serde::Serialize;
use std::fmt;

/// Half-open interval `[start, end)` assigned to exactly one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub start: u64,
    pub end: u64,
}

impl Range {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of integers covered by this range
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Split `[0, total)` into contiguous ranges for `workers` parallel workers
///
/// The chunk size is `ceil(total / workers)`; the final range is clamped to
/// `total` and may be shorter. Fewer than `workers` ranges come back when
/// the workload is small, e.g. `split(3, 8)` yields three single-element
/// ranges.
///
/// # Errors
/// Returns [`ExecutorError::InvalidInput`] when `workers` is zero.
///
/// # Example
/// ```rust
/// use parsum::parallel::split;
///
/// let ranges = split(10, 3).unwrap();
/// assert_eq!(ranges.len(), 3);
/// assert_eq!(ranges[0].end, 4);
/// assert_eq!(ranges[2].end, 10);
/// ```
pub fn split(total: u64, workers: usize) -> Result<Vec<Range>, ExecutorError> {
    if workers == 0 {
        return Err(ExecutorError::InvalidInput(
            "worker count must be at least 1".to_string(),
        ));
    }
    if total == 0 {
        return Ok(Vec::new());
    }

    let chunk_size = total.div_ceil(workers as u64);
    let mut ranges = Vec::with_capacity(workers.min(total as usize));
    let mut start = 0u64;
    while start < total {
        let end = start.saturating_add(chunk_size).min(total);
        ranges.push(Range::new(start, end));
        start = end;
    }

    tracing::debug!(total, workers, chunk_size, ranges = ranges.len(), "Partitioned workload");
    Ok(ranges)
}
