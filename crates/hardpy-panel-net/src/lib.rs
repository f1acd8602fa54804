//! Networking for the HardPy operator panel.
//!
//! This crate provides:
//!
//! - **HTTP Client**: a thin wrapper over `reqwest` with timeouts and
//!   status-to-error mapping
//! - **Panel API**: [`PanelApiClient`] for the test-runner endpoints the
//!   operator dialog calls (`confirm_dialog_box`, `stop`)
//!
//! # HTTP Client
//!
//! ```ignore
//! use hardpy_panel_net::http::HttpClient;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(5))
//!     .build()?;
//!
//! let response = client.get("http://localhost:8000/api/stop").send().await?;
//! ```
//!
//! # Panel API
//!
//! ```ignore
//! use hardpy_panel_net::{PanelApiClient, PanelApiConfig};
//!
//! let api = PanelApiClient::new(PanelApiConfig::with_base_url("http://localhost:8000"))?;
//! api.confirm_dialog_box("ok").await?;
//! ```

pub mod error;
pub mod http;
pub mod panel_api;

pub use error::{NetworkError, Result};
pub use http::{HttpClient, HttpClientBuilder, HttpClientConfig, HttpMethod, HttpResponse};
pub use panel_api::{PanelApiClient, PanelApiConfig, RunStatus};
