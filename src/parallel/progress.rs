use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Worker completion bar driven by the executor's progress callback
///
/// Only the executor side touches the bar; workers stay unaware of it.
#[derive(Clone)]
pub struct CompletionProgress {
    bar: ProgressBar,
}

impl CompletionProgress {
    /// Visible bar counting finished workers
    pub fn new(worker_count: usize, total: u64) -> Self {
        let style = ProgressStyle::with_template(
            "⚡ [{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}/{len:3} workers {spinner} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        let bar = ProgressBar::new(worker_count as u64);
        bar.set_style(style);
        bar.set_message(format!("summing 0..{total}"));
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Bar that never draws, for quiet or machine-readable runs
    pub fn hidden(worker_count: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(worker_count as u64);
        Self { bar }
    }

    /// Executor callback: `(completed, total, worker_index)`
    pub fn worker_done(&self, completed: usize, total: usize, worker_index: usize) {
        self.bar.set_position(completed as u64);
        if completed == total {
            self.bar.set_message("all workers reported");
        } else {
            self.bar.set_message(format!("worker {worker_index} done"));
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Number of workers the bar expects
    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_tracks_completions() {
        let progress = CompletionProgress::hidden(4);
        progress.worker_done(1, 4, 2);
        progress.worker_done(2, 4, 0);
        assert_eq!(progress.position(), 2);
        assert_eq!(progress.length(), Some(4));
        progress.finish();
    }

    #[test]
    fn test_visible_progress_finishes() {
        let progress = CompletionProgress::new(2, 100);
        progress.worker_done(1, 2, 1);
        progress.worker_done(2, 2, 0);
        assert_eq!(progress.position(), 2);
        progress.finish();
    }
}
