//! Error types for the synchronization engine.

use sync_index::IndexError;
use sync_types::SourceError;
use thiserror::Error;

/// Errors that can occur while running a synchronization job.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Index adapter error, including exhausted lock retries
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Record source error
    #[error("record source error: {0}")]
    Source(#[from] SourceError),

    /// Caller error: invalid job configuration
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A worker thread terminated abnormally
    #[error("worker failure: {0}")]
    Worker(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = SyncError::InvalidConfig("batch size must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "invalid config: batch size must be positive"
        );
    }

    #[test]
    fn test_from_index_error() {
        let err: SyncError = IndexError::Conversion("bad".to_string()).into();
        assert!(matches!(err, SyncError::Index(_)));
    }
}
