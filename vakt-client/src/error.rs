//! Error types for vakt-client

use thiserror::Error;

/// Convenience Result type using vakt-client Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vakt-client
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server rejected the request
    #[error("Server returned {0}")]
    Status(u16),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Alert dispatch failure (caught and logged by the evaluator)
    #[error("Alert error: {0}")]
    Alert(String),
}
