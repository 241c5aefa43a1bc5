use super::partition::Range;
use thiserror::Error;

/// Boxed cause carried by a failed worker
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by partitioning and parallel execution
///
/// Any variant aborts the whole run; partial results are never returned
/// alongside an error.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Caller contract violation, e.g. zero workers requested
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The platform refused to create a worker thread
    #[error("Failed to spawn worker {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    /// The worker function returned an error
    #[error("Worker {index} failed on {range}: {source}")]
    Worker {
        index: usize,
        range: Range,
        #[source]
        source: BoxError,
    },

    /// The worker function panicked
    #[error("Worker {index} panicked on {range}: {message}")]
    Panicked {
        index: usize,
        range: Range,
        message: String,
    },

    /// Worker threads exited without reporting an outcome
    ///
    /// Workers catch their own panics and always report, so this only
    /// surfaces if a thread dies outside the worker function.
    #[error("{missing} worker(s) exited without reporting a result")]
    WorkerLost { missing: usize },

    /// The reduced total does not fit in the result type
    #[error("Aggregate of {partials} partial results overflowed")]
    Overflow { partials: usize },

    /// The thread pool backing the pool strategy could not be built
    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl ExecutorError {
    /// Index of the worker that caused the failure, if any
    pub fn worker_index(&self) -> Option<usize> {
        match self {
            ExecutorError::Spawn { index, .. }
            | ExecutorError::Worker { index, .. }
            | ExecutorError::Panicked { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Render a caught panic payload as text
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_worker_error_preserves_cause() {
        let cause = std::io::Error::other("disk on fire");
        let err = ExecutorError::Worker {
            index: 3,
            range: Range::new(10, 20),
            source: Box::new(cause),
        };

        assert_eq!(err.worker_index(), Some(3));
        assert!(err.to_string().contains("[10, 20)"));
        assert_eq!(err.source().unwrap().to_string(), "disk on fire");
    }

    #[test]
    fn test_panic_message_variants() {
        let static_str: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(static_str.as_ref()), "boom");

        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(owned.as_ref()), "owned boom");

        let other: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }

    #[test]
    fn test_invalid_input_has_no_worker() {
        let err = ExecutorError::InvalidInput("workers must be at least 1".into());
        assert_eq!(err.worker_index(), None);
    }
}
