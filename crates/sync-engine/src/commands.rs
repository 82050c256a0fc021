//! Command surface consumed by external tooling.
//!
//! Three operations mirror the classic index-management commands of search
//! frameworks: `clear_index`, `update_index`, `rebuild_index`. Each returns
//! a success flag plus a count of documents processed. Confirmation prompts
//! belong to the caller; these entry points are always non-interactive.

use sync_types::RecordSource;

use crate::config::SyncOptions;
use crate::coordinator::{Coordinator, SyncReport};
use crate::error::SyncError;

/// Outcome of a management command.
#[derive(Debug)]
pub struct CommandStatus {
    /// Whether the job reached `Done`
    pub success: bool,
    /// Documents processed (upserts plus removals)
    pub processed: usize,
    /// Full job report
    pub report: SyncReport,
}

impl From<SyncReport> for CommandStatus {
    fn from(report: SyncReport) -> Self {
        Self {
            success: report.is_success(),
            processed: report.processed(),
            report,
        }
    }
}

/// Drop every document from the index.
pub fn clear_index<S: RecordSource>(
    coordinator: &Coordinator<S>,
) -> Result<CommandStatus, SyncError> {
    Ok(coordinator.clear()?.into())
}

/// Incrementally synchronize the index with the record store.
pub fn update_index<S: RecordSource>(
    coordinator: &Coordinator<S>,
    remove: bool,
    workers: usize,
    batch_size: usize,
) -> Result<CommandStatus, SyncError> {
    let opts = SyncOptions::default()
        .with_remove(remove)
        .with_workers(workers)
        .with_batch_size(batch_size);
    Ok(coordinator.update(&opts)?.into())
}

/// Clear the index and reindex the full record store.
pub fn rebuild_index<S: RecordSource>(
    coordinator: &Coordinator<S>,
) -> Result<CommandStatus, SyncError> {
    Ok(coordinator.rebuild(&SyncOptions::default())?.into())
}
