//! Error types for vakt-server
//!
//! Defines the service error type using thiserror and its mapping to
//! HTTP responses. No error here is fatal to the process; every failure
//! path ends in a status code and a JSON message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main error type for vakt-server
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream seismic API failure (network, non-2xx, malformed payload)
    #[error("Upstream API error: {0}")]
    Upstream(String),

    /// Key-value store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Dataset name outside the fixed enumeration
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// Invalid request parameter or body
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Admin token missing or wrong
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using vakt-server Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<vakt_common::Error> for Error {
    fn from(err: vakt_common::Error) -> Self {
        match err {
            vakt_common::Error::Upstream(msg) => Error::Upstream(msg),
            vakt_common::Error::Store(msg) => Error::Store(msg),
            vakt_common::Error::UnknownDataset(name) => Error::UnknownDataset(name),
            vakt_common::Error::InvalidInput(msg) => Error::InvalidInput(msg),
            vakt_common::Error::Config(msg) => Error::Config(msg),
            other => Error::Internal(other.to_string()),
        }
    }
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::Upstream(_) | Error::Store(_) => StatusCode::BAD_GATEWAY,
            Error::UnknownDataset(_) | Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Config(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::UnknownDataset("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::InvalidInput("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::Upstream("x".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(Error::Store("x".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(Error::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(Error::Internal("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
