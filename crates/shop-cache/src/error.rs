//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store at {path}: {source}")]
    OpenError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Failed to perform a store operation.
    #[error("Store operation on '{key}' failed: {source}")]
    StoreError {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored value could not be parsed as the expected type.
    #[error("Corrupt value under '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Key is not usable as a storage name.
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}
