//! Record source interface.
//!
//! Abstracts the backing record store. The engine only ever reads from a
//! source: full key enumeration for planning, and batched fetches while
//! indexing. Records deleted between those two calls are omitted from
//! fetch results, never reported as errors.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use crate::error::SourceError;
use crate::record::{Pk, Record};

/// Read-only interface to the source-of-truth record store.
pub trait RecordSource: Send + Sync {
    /// Enumerate every primary key currently in the store.
    fn all_keys(&self) -> Result<BTreeSet<Pk>, SourceError>;

    /// Fetch a single record, `None` if it no longer exists.
    fn fetch(&self, pk: Pk) -> Result<Option<Record>, SourceError>;

    /// Fetch a batch of records in the order of the given keys.
    ///
    /// Keys that vanished since planning are omitted from the result.
    fn fetch_batch(&self, keys: &[Pk]) -> Result<Vec<Record>, SourceError> {
        let mut records = Vec::with_capacity(keys.len());
        for &pk in keys {
            if let Some(record) = self.fetch(pk)? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

/// In-memory record source backed by a `BTreeMap`.
///
/// Used by tests and the CLI's JSON-file loader. Interior mutability lets
/// tests delete records while a coordinator holds a shared reference.
#[derive(Debug, Default)]
pub struct MemoryRecordSource {
    records: RwLock<BTreeMap<Pk, Record>>,
}

impl MemoryRecordSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from an iterator of records.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let map = records.into_iter().map(|r| (r.pk, r)).collect();
        Self {
            records: RwLock::new(map),
        }
    }

    /// Insert or replace a record.
    pub fn insert(&self, record: Record) {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(record.pk, record);
    }

    /// Delete a record, returning whether it existed.
    pub fn delete(&self, pk: Pk) -> bool {
        self.records
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&pk)
            .is_some()
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordSource for MemoryRecordSource {
    fn all_keys(&self) -> Result<BTreeSet<Pk>, SourceError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.keys().copied().collect())
    }

    fn fetch(&self, pk: Pk) -> Result<Option<Record>, SourceError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(records.get(&pk).cloned())
    }

    fn fetch_batch(&self, keys: &[Pk]) -> Result<Vec<Record>, SourceError> {
        let records = self.records.read().unwrap_or_else(|e| e.into_inner());
        Ok(keys
            .iter()
            .filter_map(|pk| records.get(pk).cloned())
            .collect())
    }
}
