//! HTTP request builder.

use super::client::HttpClient;
use super::response::HttpResponse;
use crate::error::Result;
use hardpy_panel_core::logging::targets;

/// HTTP request methods used by the panel backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method.
    Get,
    /// HTTP POST method.
    Post,
}

impl HttpMethod {
    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A request waiting to be sent.
pub struct HttpRequestBuilder {
    client: HttpClient,
    method: HttpMethod,
    url: String,
}

impl HttpRequestBuilder {
    pub(crate) fn new(client: HttpClient, method: HttpMethod, url: String) -> Self {
        Self {
            client,
            method,
            url,
        }
    }

    /// The request method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The request URL as given.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the request and wait for the response.
    ///
    /// The URL is parsed as given; path segments that are already
    /// percent-encoded are sent unchanged.
    pub async fn send(self) -> Result<HttpResponse> {
        let url = url::Url::parse(&self.url)?;
        tracing::debug!(target: targets::NET, method = %self.method, %url, "sending request");

        let response = self
            .client
            .reqwest_client()
            .request(self.method.to_reqwest(), url)
            .send()
            .await?;
        Ok(HttpResponse::from_reqwest(response))
    }
}
