//! Index store management.
//!
//! Handles index creation, opening, counts, key enumeration, and clearing.
//! The index directory is owned exclusively by this adapter; no other
//! component touches it directly.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tantivy::{Index, IndexReader, ReloadPolicy};
use tracing::{debug, info};

use sync_types::Pk;

use crate::error::IndexError;
use crate::schema::{build_sync_schema, SyncSchema};
use crate::writer::{IndexWriterSession, RetryPolicy};

/// Default memory budget for the IndexWriter (50MB)
const DEFAULT_WRITER_MEMORY_MB: usize = 50;

/// Index store configuration
#[derive(Debug, Clone)]
pub struct IndexStoreConfig {
    /// Path to the index directory
    pub index_path: PathBuf,
    /// Memory budget for the writer in MB
    pub writer_memory_mb: usize,
    /// Retry policy for writer-lock acquisition
    pub retry: RetryPolicy,
}

impl IndexStoreConfig {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            writer_memory_mb: DEFAULT_WRITER_MEMORY_MB,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_memory_mb(mut self, mb: usize) -> Self {
        self.writer_memory_mb = mb;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Handle to the on-disk index with schema access.
pub struct IndexStore {
    index: Index,
    schema: SyncSchema,
    config: IndexStoreConfig,
}

impl IndexStore {
    /// Open an existing index or create a new one.
    pub fn open_or_create(config: IndexStoreConfig) -> Result<Self, IndexError> {
        let index = open_or_create_index(&config.index_path)?;
        let schema = SyncSchema::from_schema(index.schema())?;

        info!(path = ?config.index_path, "Opened index store");

        Ok(Self {
            index,
            schema,
            config,
        })
    }

    /// Get the sync schema
    pub fn schema(&self) -> &SyncSchema {
        &self.schema
    }

    /// Get the underlying Tantivy index
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Get the index path
    pub fn path(&self) -> &Path {
        &self.config.index_path
    }

    /// Configured writer memory budget in MB
    pub fn writer_memory_mb(&self) -> usize {
        self.config.writer_memory_mb
    }

    /// Check if an index exists at the configured path
    pub fn exists(&self) -> bool {
        self.config.index_path.join("meta.json").exists()
    }

    /// Open a write session using the configured retry policy.
    pub fn writer_session(&self) -> Result<IndexWriterSession, IndexError> {
        IndexWriterSession::open_with_retry(self, &self.config.retry)
    }

    /// Create an IndexReader over the latest committed state.
    pub fn reader(&self) -> Result<IndexReader, IndexError> {
        let reader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()?;
        debug!("Created index reader");
        Ok(reader)
    }

    /// Number of live documents in the index.
    pub fn document_count(&self) -> Result<u64, IndexError> {
        let reader = self.reader()?;
        Ok(reader.searcher().num_docs())
    }

    /// Enumerate the primary keys of all live documents.
    ///
    /// Scans the pk fast-field column per segment, skipping deleted docs.
    pub fn indexed_keys(&self) -> Result<BTreeSet<Pk>, IndexError> {
        let reader = self.reader()?;
        let searcher = reader.searcher();

        let mut keys = BTreeSet::new();
        for segment_reader in searcher.segment_readers() {
            let column = segment_reader.fast_fields().u64("pk")?;
            for doc_id in segment_reader.doc_ids_alive() {
                if let Some(pk) = column.first(doc_id) {
                    keys.insert(pk);
                }
            }
        }

        debug!(count = keys.len(), "Enumerated indexed keys");
        Ok(keys)
    }

    /// Drop every document, leaving an empty committed index.
    pub fn clear(&self) -> Result<(), IndexError> {
        let session = self.writer_session()?;
        session.delete_all()?;
        session.commit()?;

        info!(path = ?self.config.index_path, "Cleared index");
        Ok(())
    }
}

/// Open an existing index or create a new one.
///
/// Uses MmapDirectory for persistence.
pub fn open_or_create_index(path: &Path) -> Result<Index, IndexError> {
    if path.join("meta.json").exists() {
        debug!(path = ?path, "Opening existing index");
        let index = Index::open_in_dir(path)?;
        Ok(index)
    } else {
        info!(path = ?path, "Creating new index");
        std::fs::create_dir_all(path)?;
        let schema = build_sync_schema();
        let index = Index::create_in_dir(path, schema.schema().clone())?;
        Ok(index)
    }
}
