//! # sync-index
//!
//! Tantivy-backed index store adapter for the index-sync engine.
//!
//! Owns the on-disk index directory exclusively. Exposes:
//! - [`IndexStore`]: open/create, document counts, key enumeration, clear
//! - [`IndexWriterSession`]: upsert/delete/commit behind a single shared
//!   logical writer, with bounded retry on writer-lock contention
//!
//! The underlying index allows only one writer at a time. In-process callers
//! share one [`IndexWriterSession`]; cross-process contention is absorbed by
//! exponential-backoff retries during acquisition, so lock errors never reach
//! the caller on a healthy run.

pub mod document;
pub mod error;
pub mod schema;
pub mod store;
pub mod writer;

pub use document::record_to_doc;
pub use error::IndexError;
pub use schema::{build_sync_schema, SyncSchema};
pub use store::{IndexStore, IndexStoreConfig};
pub use writer::{IndexWriterSession, RetryPolicy};
