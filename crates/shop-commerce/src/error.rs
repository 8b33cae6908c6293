//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in catalog operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Duplicate product id in the catalog.
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Unknown currency code.
    #[error("Unknown currency code: {0}")]
    InvalidCurrency(String),

    /// Compare selection is full.
    #[error("Cannot compare more than {0} products")]
    CompareLimitReached(usize),

    /// Not enough products selected to compare.
    #[error("Select at least {required} products to compare (have {selected})")]
    CompareTooFew { required: usize, selected: usize },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
