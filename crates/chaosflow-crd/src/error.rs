//! Error types for resource operations

use thiserror::Error;

/// Errors that can occur when working with chaos resources
#[derive(Debug, Error)]
pub enum CrdError {
    /// Size string is neither a byte quantity nor a percentage
    #[error("malformed quantity '{0}'")]
    MalformedQuantity(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Invalid field value
    #[error("Invalid value for field '{field}': {message}")]
    InvalidFieldValue { field: String, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for resource operations
pub type Result<T> = std::result::Result<T, CrdError>;
