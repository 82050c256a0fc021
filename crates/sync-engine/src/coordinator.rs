//! Reindex coordinator.
//!
//! Orchestrates full rebuild, incremental update, and stale-key removal
//! over a fixed pool of worker threads. One job moves through the phases
//! `Idle -> Planning -> Indexing -> (Removing) -> Done | Failed`.
//!
//! The writer session is opened once per job; workers pull batches from a
//! shared cursor and serialize their writes through it, so the index lock
//! is acquired exactly once no matter how many workers run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use sync_index::IndexStore;
use sync_types::{Pk, RecordSource};

use crate::config::SyncOptions;
use crate::error::SyncError;
use crate::planner::{plan, Batch};
use crate::progress::{NoOpProgressCallback, ProgressCallback, SyncProgress};
use crate::worker::{run_batch, BatchOutcome, RecordFailure};

/// Phase a synchronization job is in, or finished with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// No job running
    Idle,
    /// Enumerating keys and building batches
    Planning,
    /// Workers applying batches
    Indexing,
    /// Deleting stale keys
    Removing,
    /// Job completed without fatal errors
    Done,
    /// Job completed with fatal errors
    Failed,
}

impl std::fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SyncPhase::Idle => "idle",
            SyncPhase::Planning => "planning",
            SyncPhase::Indexing => "indexing",
            SyncPhase::Removing => "removing",
            SyncPhase::Done => "done",
            SyncPhase::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Final report of a synchronization job.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Terminal phase: `Done` or `Failed`
    pub phase: SyncPhase,
    /// Records upserted into the index
    pub indexed: usize,
    /// Records skipped because they vanished from the source
    pub skipped: usize,
    /// Records that failed conversion (non-fatal)
    pub failed: usize,
    /// Stale documents deleted by the removal pass
    pub removed: usize,
    /// Live document count after the job
    pub document_count: u64,
    /// Per-record failure details
    pub failures: Vec<RecordFailure>,
    /// Fatal errors that ended the job in `Failed`
    pub fatal: Vec<String>,
}

impl SyncReport {
    fn empty(phase: SyncPhase) -> Self {
        Self {
            phase,
            indexed: 0,
            skipped: 0,
            failed: 0,
            removed: 0,
            document_count: 0,
            failures: Vec::new(),
            fatal: Vec::new(),
        }
    }

    /// Whether the job reached `Done`.
    pub fn is_success(&self) -> bool {
        self.phase == SyncPhase::Done
    }

    /// Documents processed: upserts plus removals.
    pub fn processed(&self) -> usize {
        self.indexed + self.removed
    }
}

/// Orchestrates synchronization jobs between a record source and an index.
pub struct Coordinator<S: RecordSource> {
    source: S,
    store: IndexStore,
}

impl<S: RecordSource> Coordinator<S> {
    /// Create a coordinator over a source and an index store.
    pub fn new(source: S, store: IndexStore) -> Self {
        Self { source, store }
    }

    /// The record source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The index store.
    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Drop every document from the index.
    pub fn clear(&self) -> Result<SyncReport, SyncError> {
        let prior = self.store.document_count()?;
        self.store.clear()?;

        info!(dropped = prior, "Index cleared");

        let mut report = SyncReport::empty(SyncPhase::Done);
        report.removed = prior as usize;
        Ok(report)
    }

    /// Full rebuild: clear, then index the entire source.
    ///
    /// Removal is disabled because nothing stale can survive the clear.
    pub fn rebuild(&self, opts: &SyncOptions) -> Result<SyncReport, SyncError> {
        self.store.clear()?;
        let opts = opts.clone().with_remove(false);
        self.update(&opts)
    }

    /// Incremental update; see [`update_with_progress`](Self::update_with_progress).
    pub fn update(&self, opts: &SyncOptions) -> Result<SyncReport, SyncError> {
        self.update_with_progress(opts, &NoOpProgressCallback)
    }

    /// Incremental update with progress reporting.
    ///
    /// Plans batches over the full key set, dispatches them to `opts.workers`
    /// workers, then (when `opts.remove` is set) deletes every key present in
    /// the index but absent from the source. Per-record failures are
    /// aggregated and never abort sibling batches; a fatal worker error
    /// finishes the job in `Failed` with the successful portion committed.
    pub fn update_with_progress<P: ProgressCallback>(
        &self,
        opts: &SyncOptions,
        progress: &P,
    ) -> Result<SyncReport, SyncError> {
        if opts.workers == 0 {
            return Err(SyncError::InvalidConfig(
                "worker count must be positive".to_string(),
            ));
        }

        info!(
            workers = opts.workers,
            batch_size = opts.batch_size,
            remove = opts.remove,
            "Update starting"
        );

        // Planning
        let keys = self.source.all_keys()?;
        let batches = plan(&keys, opts.batch_size)?;

        // Indexing
        let session = self.store.writer_session()?;

        let mut outcome = BatchOutcome::new();
        let mut fatal: Vec<String> = Vec::new();

        if !batches.is_empty() {
            let results = dispatch_batches(
                &self.source,
                &session,
                &batches,
                opts.workers.min(batches.len()),
                progress,
            );

            for (worker_outcome, worker_error) in results {
                outcome.merge(worker_outcome);
                if let Some(error) = worker_error {
                    fatal.push(error);
                }
            }
        }

        // Partial application is acceptable; commit what succeeded even
        // when a worker failed, so the index stays structurally valid.
        session.commit()?;

        // Removing
        let mut removed = 0;
        if opts.remove && fatal.is_empty() {
            let stale = self.stale_keys()?;
            info!(stale = stale.len(), "Removing stale documents");

            for &pk in &stale {
                session.delete(pk)?;
            }
            session.commit()?;
            removed = stale.len();
        }

        drop(session);

        let phase = if fatal.is_empty() {
            SyncPhase::Done
        } else {
            warn!(errors = fatal.len(), "Update finished with fatal errors");
            SyncPhase::Failed
        };

        let report = SyncReport {
            phase,
            indexed: outcome.indexed,
            skipped: outcome.skipped,
            failed: outcome.failed,
            removed,
            document_count: self.store.document_count()?,
            failures: outcome.failures,
            fatal,
        };

        info!(
            phase = %report.phase,
            indexed = report.indexed,
            skipped = report.skipped,
            failed = report.failed,
            removed = report.removed,
            documents = report.document_count,
            "Update finished"
        );

        Ok(report)
    }

    /// Keys present in the index but no longer in the source.
    fn stale_keys(&self) -> Result<Vec<Pk>, SyncError> {
        let source_keys = self.source.all_keys()?;
        let indexed_keys = self.store.indexed_keys()?;
        Ok(indexed_keys.difference(&source_keys).copied().collect())
    }
}

/// Run the worker pool over the planned batches.
///
/// Workers pull the next batch index from a shared atomic cursor until the
/// plan is exhausted. A worker that hits a fatal error stops pulling but
/// keeps the counts of the batches it already applied; the others keep
/// draining the plan.
fn dispatch_batches<S: RecordSource + ?Sized, P: ProgressCallback>(
    source: &S,
    session: &sync_index::IndexWriterSession,
    batches: &[Batch],
    workers: usize,
    progress: &P,
) -> Vec<(BatchOutcome, Option<String>)> {
    let cursor = AtomicUsize::new(0);
    let shared_progress = Mutex::new(SyncProgress {
        batches_total: batches.len(),
        ..Default::default()
    });

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);

        for _ in 0..workers {
            handles.push(scope.spawn(|| {
                let mut local = BatchOutcome::new();

                loop {
                    let next = cursor.fetch_add(1, Ordering::SeqCst);
                    if next >= batches.len() {
                        break;
                    }

                    let batch_outcome = match run_batch(source, session, &batches[next]) {
                        Ok(batch_outcome) => batch_outcome,
                        Err(e) => {
                            warn!(batch = next, error = %e, "Worker stopping on fatal error");
                            return (local, Some(e.to_string()));
                        }
                    };

                    {
                        let mut p = shared_progress.lock().unwrap_or_else(|e| e.into_inner());
                        p.batches_done += 1;
                        p.indexed += batch_outcome.indexed;
                        p.skipped += batch_outcome.skipped;
                        p.failed += batch_outcome.failed;
                        progress.on_progress(&p);
                    }

                    local.merge(batch_outcome);
                }

                (local, None)
            }));
        }

        handles
            .into_iter()
            .map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    (
                        BatchOutcome::new(),
                        Some(SyncError::Worker("worker thread panicked".into()).to_string()),
                    )
                })
            })
            .collect()
    })
}
