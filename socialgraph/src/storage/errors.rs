//! Error types for storage operations

use thiserror::Error;

/// Failure reported by an [`OrderedSetStore`](super::OrderedSetStore).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    /// A write batch failed; none of its operations were applied
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Rejected input, such as an empty collection key
    /// A batch precondition did not hold; nothing was applied
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// Retry-safe failure not covered by the other variants
    #[error("Temporary error: {0}")]
    Temporary(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Whether repeating the identical call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StorageError::Connection(_)
                | StorageError::Timeout(_)
                | StorageError::Temporary(_)
                | StorageError::Transaction(_)
                | StorageError::Conflict(_)
        )
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

#[cfg(any(feature = "surrealdb-embedded", feature = "surrealdb-remote"))]
impl From<surrealdb::Error> for StorageError {
    fn from(err: surrealdb::Error) -> Self {
        StorageError::Query(err.to_string())
    }
}
