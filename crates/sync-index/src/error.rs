//! Index adapter error types.

use thiserror::Error;

/// Errors that can occur in the index store adapter.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Tantivy index error
    #[error("index engine error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema mismatch between the opened index and the expected layout
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Writer lock held elsewhere; retryable, fatal only once retries are exhausted
    #[error("index writer lock contention after {attempts} attempt(s): {message}")]
    LockContention { attempts: u32, message: String },

    /// Shared writer mutex was poisoned by a panicking holder
    #[error("index writer unavailable: {0}")]
    WriterPoisoned(String),

    /// A single record could not be converted to a document
    #[error("record conversion failed: {0}")]
    Conversion(String),
}

impl IndexError {
    /// Whether the error is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, IndexError::LockContention { .. })
    }
}
