//! HTTP response types.

use serde::de::DeserializeOwned;

use crate::error::{NetworkError, Result};

/// An HTTP response from a request.
pub struct HttpResponse {
    inner: reqwest::Response,
}

impl HttpResponse {
    pub(crate) fn from_reqwest(response: reqwest::Response) -> Self {
        Self { inner: response }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Get the final URL after redirects.
    pub fn url(&self) -> &str {
        self.inner.url().as_str()
    }

    /// Parse the response body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.inner.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Turn a 4xx/5xx response into [`NetworkError::HttpStatus`].
    ///
    /// The response body, if readable, becomes the error message.
    pub async fn error_for_status(self) -> Result<Self> {
        if self.inner.status().is_client_error() || self.inner.status().is_server_error() {
            let status = self.status();
            let message = self.inner.text().await.ok().filter(|body| !body.is_empty());
            return Err(NetworkError::HttpStatus { status, message });
        }
        Ok(self)
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status())
            .field("url", &self.url())
            .finish()
    }
}
