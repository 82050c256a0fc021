//! Progress reporting for long-running synchronization jobs.

use tracing::info;

/// Snapshot of job progress, published after each completed batch.
#[derive(Debug, Clone, Default)]
pub struct SyncProgress {
    /// Batches completed so far
    pub batches_done: usize,
    /// Total batches in the plan
    pub batches_total: usize,
    /// Records indexed so far
    pub indexed: usize,
    /// Records skipped so far
    pub skipped: usize,
    /// Records failed so far
    pub failed: usize,
}

/// Receiver for progress updates.
pub trait ProgressCallback: Send + Sync {
    /// Called after each batch completes.
    fn on_progress(&self, progress: &SyncProgress);
}

/// A no-op callback for when progress reporting isn't needed.
pub struct NoOpProgressCallback;

impl ProgressCallback for NoOpProgressCallback {
    fn on_progress(&self, _progress: &SyncProgress) {}
}

/// A callback that logs progress at info level every `every` batches.
pub struct LoggingProgressCallback {
    every: usize,
}

impl LoggingProgressCallback {
    /// Create a callback that logs every `every` batches.
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl ProgressCallback for LoggingProgressCallback {
    fn on_progress(&self, progress: &SyncProgress) {
        if progress.batches_done % self.every == 0 || progress.batches_done == progress.batches_total
        {
            info!(
                done = progress.batches_done,
                total = progress.batches_total,
                indexed = progress.indexed,
                skipped = progress.skipped,
                failed = progress.failed,
                "Sync progress"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_op_callback() {
        let callback = NoOpProgressCallback;
        callback.on_progress(&SyncProgress::default());
    }

    #[test]
    fn test_logging_callback_clamps_interval() {
        let callback = LoggingProgressCallback::new(0);
        assert_eq!(callback.every, 1);
    }
}
