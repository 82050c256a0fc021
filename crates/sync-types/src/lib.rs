//! # sync-types
//!
//! Shared domain types for the index-sync engine.
//!
//! This crate defines the data model the synchronization engine operates on:
//! - [`Record`]: a source-of-truth row with a stable primary key and typed fields
//! - [`FieldValue`]: the typed field values a record can carry
//! - [`RecordSource`]: the interface to the backing record store
//! - [`MemoryRecordSource`]: an in-memory source for tests and tooling

pub mod error;
pub mod record;
pub mod source;

pub use error::SourceError;
pub use record::{FieldValue, Pk, Record};
pub use source::{MemoryRecordSource, RecordSource};
