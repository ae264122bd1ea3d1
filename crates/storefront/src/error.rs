use std::path::PathBuf;

/// Failure reported by a storage backend.
///
/// Backends are fallible; the [`StorageAdapter`](crate::storage::StorageAdapter)
/// absorbs these into explicit outcomes so containers never see them.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,

    #[error("storage quota exceeded writing {key} ({needed} bytes, {limit} allowed)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("storage IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Unified error type for the fallible outer surface of the crate
/// (configuration, opening state, the snapshot binary).
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using [`StorefrontError`].
pub type StorefrontResult<T> = Result<T, StorefrontError>;

/// Result type alias using [`StorageError`].
pub type StorageResult<T> = Result<T, StorageError>;
