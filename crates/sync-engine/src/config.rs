//! Synchronization job configuration.

use serde::{Deserialize, Serialize};

/// Default maximum number of keys per batch.
const DEFAULT_BATCH_SIZE: usize = 1000;

/// Options for an update or rebuild job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Delete stale index entries after indexing.
    pub remove: bool,
    /// Number of parallel workers; 1 runs sequentially.
    pub workers: usize,
    /// Maximum number of keys per batch.
    pub batch_size: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            remove: false,
            workers: 1,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SyncOptions {
    /// Enable or disable the stale-key removal pass.
    pub fn with_remove(mut self, remove: bool) -> Self {
        self.remove = remove;
        self
    }

    /// Set the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}
