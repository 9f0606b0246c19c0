//! HTTP clients for the two external collaborators.
//!
//! - [`ReportingClient`] talks to the reporting API (status, heartbeat,
//!   logs, event notifications).
//! - [`TargetClient`] talks to the observed target (health check and
//!   fault-injection commands).
//!
//! Both wrap a shared [`reqwest::Client`] and map every failure into a
//! [`ClientError`], distinguishing "no response at all" from "a response we
//! did not like". That distinction drives the connection state machine.

mod error;
mod reporting;
mod target;

pub use error::ClientError;
pub use reporting::{EventNotice, ReportingClient};
pub use target::TargetClient;

use std::time::Duration;

use reqwest::Client;

/// Build the shared HTTP client.
///
/// No deadline is imposed unless `timeout` is given; a hung endpoint then
/// stalls only the request that hit it.
fn build_http(timeout: Option<Duration>) -> Result<Client, ClientError> {
    let mut builder = Client::builder().no_proxy();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| ClientError::Build(e.to_string()))
}

/// Normalise a base URL: trim whitespace and trailing slashes.
fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
