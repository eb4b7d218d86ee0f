//! Error types for `Quartermaster` core library.

use thiserror::Error;

/// Result type alias using `Quartermaster` Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for `Quartermaster` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Role string outside the closed role set
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn missing(field: &str) -> Self {
        Self::Validation(format!("Missing required field: {field}"))
    }
}
