//! Worker unit: applies one batch of records to the index.
//!
//! Records are fetched from the source and applied in fetch order. Keys
//! that vanished between planning and execution are counted as skipped,
//! never as errors; the removal diff pass owns deletions. A conversion
//! failure on one record is recorded and the rest of the batch proceeds.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use sync_index::{IndexError, IndexWriterSession};
use sync_types::{Pk, RecordSource};

use crate::error::SyncError;
use crate::planner::Batch;

/// A single record that failed to index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// Primary key of the failed record
    pub pk: Pk,
    /// Human-readable failure reason
    pub reason: String,
}

/// Result of processing one or more batches.
#[derive(Debug, Default, Clone)]
pub struct BatchOutcome {
    /// Records successfully indexed
    pub indexed: usize,
    /// Records skipped because they vanished from the source
    pub skipped: usize,
    /// Records that failed conversion
    pub failed: usize,
    /// Per-record failure details
    pub failures: Vec<RecordFailure>,
}

impl BatchOutcome {
    /// Create a new empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful upsert.
    pub fn record_indexed(&mut self) {
        self.indexed += 1;
    }

    /// Record a vanished key.
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Record a per-record failure.
    pub fn record_failure(&mut self, pk: Pk, reason: impl Into<String>) {
        self.failed += 1;
        self.failures.push(RecordFailure {
            pk,
            reason: reason.into(),
        });
    }

    /// Merge another outcome into this one.
    pub fn merge(&mut self, other: BatchOutcome) {
        self.indexed += other.indexed;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.failures.extend(other.failures);
    }

    /// Total number of keys handled.
    pub fn total(&self) -> usize {
        self.indexed + self.skipped + self.failed
    }
}

/// Apply one batch: fetch its records and upsert each into the index.
///
/// Per-record conversion failures are absorbed into the outcome. Adapter
/// failures (anything other than conversion) abort the batch and escalate.
pub fn run_batch<S: RecordSource + ?Sized>(
    source: &S,
    session: &IndexWriterSession,
    batch: &Batch,
) -> Result<BatchOutcome, SyncError> {
    let mut outcome = BatchOutcome::new();

    let records = source.fetch_batch(&batch.keys)?;

    let fetched: BTreeSet<Pk> = records.iter().map(|r| r.pk).collect();
    for &pk in &batch.keys {
        if !fetched.contains(&pk) {
            // deleted between planning and execution; removal pass owns it
            outcome.record_skip();
        }
    }

    for record in &records {
        match session.add_or_replace(record) {
            Ok(()) => outcome.record_indexed(),
            Err(IndexError::Conversion(reason)) => {
                warn!(pk = record.pk, reason = %reason, "Record failed conversion");
                outcome.record_failure(record.pk, reason);
            }
            Err(e) => return Err(e.into()),
        }
    }

    debug!(
        batch = batch.index,
        indexed = outcome.indexed,
        skipped = outcome.skipped,
        failed = outcome.failed,
        "Batch applied"
    );

    Ok(outcome)
}
