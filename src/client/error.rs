//! Error types for the HTTP clients.

use thiserror::Error;

/// Errors that can occur when talking to the reporting API or the target.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was produced (connection refused, reset, timed out...).
    #[error("{0}")]
    Transport(String),

    /// A response arrived with a non-success status code.
    #[error("HTTP {0}")]
    Status(u16),

    /// A response arrived but its body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The HTTP client itself could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl ClientError {
    /// Returns true if the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status(status.as_u16())
        } else if err.is_builder() {
            ClientError::Build(err.to_string())
        } else {
            ClientError::Transport(describe(&err))
        }
    }
}

/// Flatten a reqwest error and its sources into one line.
///
/// reqwest's own message only says "error sending request for url (...)";
/// the interesting part (connection refused, reset by peer) is in the chain.
fn describe(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transport() {
        assert!(ClientError::Transport("connection refused".into()).is_transport());
        assert!(!ClientError::Status(500).is_transport());
        assert!(!ClientError::Decode("expected value".into()).is_transport());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ClientError::Status(500).to_string(), "HTTP 500");
    }
}
