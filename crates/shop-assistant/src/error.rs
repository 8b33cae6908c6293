//! Assistant error types.

use shop_cache::CacheError;
use shop_commerce::{ChatId, CommerceError};
use thiserror::Error;

/// Errors returned by the chat, favorites, and state APIs.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// Chat not found.
    #[error("Chat not found: {0}")]
    ChatNotFound(ChatId),

    /// Message text was empty after trimming.
    #[error("Message is empty")]
    EmptyMessage,

    /// The response worker has shut down.
    #[error("Response worker is not running")]
    WorkerStopped,

    /// Seed document could not be read.
    #[error("Failed to read seed data from {path}: {source}")]
    SeedIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Seed document is not valid.
    #[error("Invalid seed data: {0}")]
    InvalidSeed(#[source] serde_json::Error),

    /// A required form field is missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistence error.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Catalog error.
    #[error(transparent)]
    Commerce(#[from] CommerceError),
}
