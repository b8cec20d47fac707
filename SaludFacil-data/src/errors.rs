use std::sync::PoisonError;
use thiserror::Error;

/// Error type for storage backend operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error while reading or writing a key
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),
}

impl<T> From<PoisonError<T>> for StorageError {
    fn from(error: PoisonError<T>) -> Self {
        StorageError::Lock(error.to_string())
    }
}

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Underlying storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored document exists but is not valid JSON for its model
    #[error("Corrupted stored data under key '{key}': {source}")]
    Corrupted {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization of a collection failed before writing
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
