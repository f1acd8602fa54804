//! Client for the test-runner backend endpoints the operator dialog talks to.
//!
//! The backend exposes the dialog answer as a path parameter:
//!
//! - `POST {base}/api/confirm_dialog_box/{encoded}` delivers the operator's
//!   encoded answer to the waiting test.
//! - `GET {base}/api/stop` aborts the running tests.
//!
//! Both return `{"status": "<run status>"}`.
//!
//! ```ignore
//! use hardpy_panel_net::{PanelApiClient, PanelApiConfig};
//!
//! let api = PanelApiClient::new(PanelApiConfig::default())?;
//! let status = api.confirm_dialog_box("a%20b").await?;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::http::HttpClient;
use hardpy_panel_core::logging::targets;

/// Path prefix of the confirm endpoint; the encoded answer is appended.
pub const CONFIRM_DIALOG_BOX_PATH: &str = "/api/confirm_dialog_box/";

/// Path of the stop endpoint.
pub const STOP_PATH: &str = "/api/stop";

/// Run status reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Started,
    Busy,
    Stopped,
    Ready,
    Collected,
    Error,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: RunStatus,
}

/// Configuration for [`PanelApiClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelApiConfig {
    /// Scheme, host and port of the panel backend.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for PanelApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl PanelApiConfig {
    /// Create a config pointing at `base_url` with the default timeout.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// The request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// HTTP client for the panel backend.
#[derive(Debug, Clone)]
pub struct PanelApiClient {
    client: HttpClient,
    base_url: String,
}

impl PanelApiClient {
    /// Create a client for the configured backend.
    ///
    /// Fails if the base URL does not parse or the HTTP client cannot be built.
    pub fn new(config: PanelApiConfig) -> Result<Self> {
        let parsed = url::Url::parse(&config.base_url)?;
        if parsed.cannot_be_a_base() {
            return Err(NetworkError::InvalidUrl(config.base_url));
        }
        let client = HttpClient::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Create a client reusing an existing [`HttpClient`].
    pub fn with_client(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The backend base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The full URL of the confirm endpoint for an already encoded answer.
    ///
    /// The answer is inserted verbatim; callers pass the dialog's encoded
    /// response, which is already safe for a path segment.
    pub fn confirm_url(&self, encoded: &str) -> String {
        format!("{}{}{}", self.base_url, CONFIRM_DIALOG_BOX_PATH, encoded)
    }

    /// The full URL of the stop endpoint.
    pub fn stop_url(&self) -> String {
        format!("{}{}", self.base_url, STOP_PATH)
    }

    /// Deliver the operator's encoded answer to the waiting test.
    pub async fn confirm_dialog_box(&self, encoded: &str) -> Result<RunStatus> {
        let response = self
            .client
            .post(self.confirm_url(encoded))
            .send()
            .await?
            .error_for_status()
            .await?;
        let body: StatusResponse = response.json().await?;
        tracing::debug!(target: targets::NET, status = ?body.status, "dialog box confirmed");
        Ok(body.status)
    }

    /// Ask the backend to stop the running tests.
    pub async fn stop(&self) -> Result<RunStatus> {
        let response = self
            .client
            .get(self.stop_url())
            .send()
            .await?
            .error_for_status()
            .await?;
        let body: StatusResponse = response.json().await?;
        tracing::debug!(target: targets::NET, status = ?body.status, "stop requested");
        Ok(body.status)
    }
}
