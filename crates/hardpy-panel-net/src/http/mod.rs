//! HTTP client for the operator panel.
//!
//! # Example
//!
//! ```ignore
//! use hardpy_panel_net::http::HttpClient;
//!
//! let client = HttpClient::new()?;
//! let response = client
//!     .post("http://localhost:8000/api/confirm_dialog_box/ok")
//!     .send()
//!     .await?
//!     .error_for_status()
//!     .await?;
//! println!("Status: {}", response.status());
//! ```

mod client;
mod request;
mod response;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig};
pub use request::{HttpMethod, HttpRequestBuilder};
pub use response::HttpResponse;
