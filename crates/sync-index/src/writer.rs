//! Writer session over the single-writer index lock.
//!
//! Acquiring a Tantivy `IndexWriter` takes a filesystem lock; only one
//! writer may exist per index at a time. The session wraps the writer in
//! `Arc<Mutex<..>>` so every in-process worker funnels through one logical
//! writer, and acquisition itself retries with exponential backoff so
//! cross-process contention is absorbed instead of surfaced.
//!
//! Dropping the session releases the lock on every exit path; uncommitted
//! work is discarded, never left half-applied on disk.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use backoff::{backoff::Backoff, ExponentialBackoff};
use tantivy::{IndexWriter, TantivyError, Term};
use tracing::{debug, info, warn};

use sync_types::{Pk, Record};

use crate::document::record_to_doc;
use crate::error::IndexError;
use crate::schema::SyncSchema;
use crate::store::IndexStore;

/// Bounded retry policy for writer-lock acquisition.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum acquisition attempts before surfacing `LockContention`
    pub max_attempts: u32,
    /// Upper bound on total time spent backing off
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            max_elapsed: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Policy that fails on the first contention, for callers that want
    /// to observe the lock state directly.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            max_elapsed: Duration::ZERO,
        }
    }

    /// Set the maximum number of acquisition attempts.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the total backoff time budget.
    pub fn with_max_elapsed(mut self, elapsed: Duration) -> Self {
        self.max_elapsed = elapsed;
        self
    }
}

/// A write session against the index.
///
/// Cheap to share across worker threads; all writes serialize through the
/// inner mutex. Documents become visible only after [`commit`](Self::commit).
pub struct IndexWriterSession {
    writer: Arc<Mutex<IndexWriter>>,
    schema: SyncSchema,
}

impl std::fmt::Debug for IndexWriterSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexWriterSession")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl IndexWriterSession {
    /// Acquire the writer lock with a single attempt.
    pub fn open(store: &IndexStore) -> Result<Self, IndexError> {
        let memory_budget = store.writer_memory_mb() * 1024 * 1024;
        let writer = match store.index().writer(memory_budget) {
            Ok(writer) => writer,
            Err(TantivyError::LockFailure(err, hint)) => {
                return Err(IndexError::LockContention {
                    attempts: 1,
                    message: match hint {
                        Some(hint) => format!("{} ({})", err, hint),
                        None => err.to_string(),
                    },
                });
            }
            Err(e) => return Err(e.into()),
        };

        debug!(memory_mb = store.writer_memory_mb(), "Acquired index writer");

        Ok(Self {
            writer: Arc::new(Mutex::new(writer)),
            schema: store.schema().clone(),
        })
    }

    /// Acquire the writer lock, retrying contention with exponential backoff.
    ///
    /// Contention is expected when another process holds the writer; it only
    /// escalates to the caller once the policy's attempts are exhausted.
    pub fn open_with_retry(store: &IndexStore, policy: &RetryPolicy) -> Result<Self, IndexError> {
        let mut backoff = ExponentialBackoff {
            max_elapsed_time: Some(policy.max_elapsed),
            ..Default::default()
        };

        let mut attempts = 0;

        loop {
            attempts += 1;

            match Self::open(store) {
                Ok(session) => {
                    if attempts > 1 {
                        info!(attempts, "Acquired index writer after retries");
                    }
                    return Ok(session);
                }
                Err(IndexError::LockContention { message, .. }) => {
                    if attempts >= policy.max_attempts {
                        return Err(IndexError::LockContention { attempts, message });
                    }

                    match backoff.next_backoff() {
                        Some(duration) => {
                            warn!(
                                attempt = attempts,
                                retry_in_ms = duration.as_millis() as u64,
                                "Index writer locked, retrying"
                            );
                            std::thread::sleep(duration);
                        }
                        None => {
                            return Err(IndexError::LockContention { attempts, message });
                        }
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Get a clone of the shared writer handle.
    pub fn writer_handle(&self) -> Arc<Mutex<IndexWriter>> {
        self.writer.clone()
    }

    fn lock(&self) -> Result<MutexGuard<'_, IndexWriter>, IndexError> {
        self.writer
            .lock()
            .map_err(|e| IndexError::WriterPoisoned(e.to_string()))
    }

    /// Idempotent upsert: replacing an existing pk never duplicates a docid.
    pub fn add_or_replace(&self, record: &Record) -> Result<(), IndexError> {
        let doc = record_to_doc(&self.schema, record)?;

        let writer = self.lock()?;

        let term = Term::from_field_u64(self.schema.pk, record.pk);
        writer.delete_term(term);
        writer.add_document(doc)?;

        debug!(pk = record.pk, "Upserted document");
        Ok(())
    }

    /// Delete the document for a pk; a no-op when absent.
    pub fn delete(&self, pk: Pk) -> Result<(), IndexError> {
        let writer = self.lock()?;

        let term = Term::from_field_u64(self.schema.pk, pk);
        writer.delete_term(term);

        debug!(pk, "Deleted document");
        Ok(())
    }

    /// Queue deletion of every document in the index.
    pub fn delete_all(&self) -> Result<(), IndexError> {
        let writer = self.lock()?;
        writer.delete_all_documents()?;
        debug!("Queued delete of all documents");
        Ok(())
    }

    /// Commit pending changes, making them visible to readers.
    pub fn commit(&self) -> Result<u64, IndexError> {
        let mut writer = self.lock()?;
        let opstamp = writer.commit()?;
        info!(opstamp, "Committed index changes");
        Ok(opstamp)
    }

    /// Discard uncommitted changes.
    pub fn rollback(&self) -> Result<u64, IndexError> {
        let mut writer = self.lock()?;
        let opstamp = writer.rollback()?;
        warn!(opstamp, "Rolled back index changes");
        Ok(opstamp)
    }
}
