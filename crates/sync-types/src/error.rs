//! Error types for record sources.

use thiserror::Error;

/// Errors raised by a record source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing store failed to answer a query
    #[error("record store error: {0}")]
    Backend(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
