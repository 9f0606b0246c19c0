//! Client for the reporting API.

use std::time::Duration;

use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{build_http, normalize_base, ClientError};
use crate::telemetry::{HeartbeatPoint, LogEntry, StatusSnapshot};

/// Body of `POST /api/event`.
#[derive(Debug, Clone, Serialize)]
pub struct EventNotice<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub label: &'a str,
}

/// Reads telemetry from the reporting API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ReportingClient {
    client: Client,
    base_url: String,
}

impl ReportingClient {
    /// Create a client for the API rooted at `base_url`.
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

    /// `GET /api/status`
    pub async fn status(&self) -> Result<StatusSnapshot, ClientError> {
        self.get_json("/api/status").await
    }

    /// `GET /api/heartbeat`
    pub async fn heartbeat(&self) -> Result<Vec<HeartbeatPoint>, ClientError> {
        self.get_json("/api/heartbeat").await
    }

    /// `GET /api/logs`
    pub async fn logs(&self) -> Result<Vec<LogEntry>, ClientError> {
        self.get_json("/api/logs").await
    }

    /// `POST /api/event`. The acknowledgment body is ignored.
    pub async fn notify_event(&self, notice: &EventNotice<'_>) -> Result<(), ClientError> {
        let url = format!("{}/api/event", self.base_url);
        let response = self.client.post(&url).json(notice).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }

        // Read the body first so a truncated transfer stays a transport error
        // and only malformed JSON is reported as a decode error.
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
