//! Error types for the dialog engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while constructing a dialog or its configuration.
///
/// Operator input problems are not errors of this kind; see
/// [`ValidationError`](crate::dialog_box::ValidationError).
#[derive(Error, Debug)]
pub enum DialogError {
    /// The dialog request document could not be parsed.
    #[error("invalid dialog request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`DialogConfig`](crate::config::DialogConfig).
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    /// A configuration value is outside its allowed range.
    #[error("config value `{field}` is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },

    /// The backend client could not be created.
    #[error("backend unavailable: {0}")]
    Backend(#[from] hardpy_panel_net::NetworkError),

    /// The controller was built outside a tokio runtime.
    #[error("no async runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// A specialized Result type for dialog construction.
pub type Result<T> = std::result::Result<T, DialogError>;
