//! Client for the observed target process.

use std::time::Duration;

use reqwest::Client;

use super::{build_http, normalize_base, ClientError};

/// Talks to the observed target: liveness checks and fault commands.
#[derive(Debug, Clone)]
pub struct TargetClient {
    client: Client,
    base_url: String,
}

impl TargetClient {
    /// Create a client for the target rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_http(timeout)?,
            base_url: normalize_base(base_url),
        })
    }

    /// Returns the base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /health`. Any 2xx response counts as healthy.
    pub async fn health(&self) -> Result<(), ClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    /// `GET <path>` and decode whatever JSON comes back.
    ///
    /// The target may terminate while handling the request, so callers must
    /// be ready for a transport error in place of a response.
    pub async fn invoke(&self, path: &str) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
