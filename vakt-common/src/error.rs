//! Common error types for Vakt

use thiserror::Error;

/// Common result type for Vakt operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Vakt crates
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream seismic API error (network, non-2xx, malformed payload)
    #[error("Upstream API error: {0}")]
    Upstream(String),

    /// Key-value store error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dataset name outside the fixed enumeration
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
