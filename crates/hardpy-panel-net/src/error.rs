//! Error types for the networking crate.

use thiserror::Error;

/// Network-specific errors.
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    /// HTTP request failed.
    #[error("HTTP request error: {0}")]
    Request(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// Connection refused or failed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid response body.
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// HTTP error status (4xx or 5xx).
    #[error("HTTP {status}{}", status_suffix(.message))]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// Optional error message from the response body.
        message: Option<String>,
    },

    /// Redirect limit exceeded.
    #[error("Too many redirects")]
    TooManyRedirects,
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else if err.is_decode() {
            Self::InvalidBody(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

fn status_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|msg| format!(": {msg}"))
        .unwrap_or_default()
}

/// A specialized Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
