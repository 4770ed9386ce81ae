//! HTTP transport used to reach the remote collection endpoint.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Status code and body, uninterpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub code: u16,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as JSON. Any HTTP status is a response, not an error.
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport with the client's default timeouts
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<TransportResponse, TransportError> {
        let response = self.client.post(url).json(body).send().await?;
        let code = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { code, body })
    }
}
