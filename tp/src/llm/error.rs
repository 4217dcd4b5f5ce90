//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while calling the generation API
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network, DNS or TLS failure before a status was received
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The API answered with a non-success status
    #[error("Upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Success status, but the reply text was not where it should be
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl LlmError {
    /// Classify a reqwest error, separating timeouts from other transport failures
    ///
    /// The request URL is stripped: it carries the API key as a query parameter.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout)
        } else {
            LlmError::Transport(err.without_url())
        }
    }

    /// HTTP status returned by the API, if it got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures that happened before any response arrived
    pub fn is_transport(&self) -> bool {
        matches!(self, LlmError::Transport(_) | LlmError::Timeout(_))
    }
}
