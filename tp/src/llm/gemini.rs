//! Gemini generateContent client
//!
//! Implements [`ModelClient`] over a single blocking-style POST per call:
//! no retries, no streaming. The API key travels as the `key` query
//! parameter.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{GenerateRequest, GenerateResponse};
use super::{LlmError, ModelClient};
use crate::config::LlmConfig;

/// Upper bound on how much of an error body is carried into the error message
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Gemini API client
pub struct GeminiClient {
    endpoint: Url,
    api_key: String,
    http: Client,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiClient {
    /// Create a client for an explicit endpoint and key
    pub fn new(endpoint: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        debug!(%endpoint, ?timeout, "GeminiClient::new: called");
        let endpoint =
            Url::parse(endpoint).map_err(|e| LlmError::Config(format!("invalid base URL '{}': {}", endpoint, e)))?;

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            api_key,
            http,
            timeout,
        })
    }

    /// Create a client from configuration
    ///
    /// Resolves the API key from the environment variable or inline value.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(provider = %config.provider, base_url = %config.base_url, "from_config: called");
        let api_key = config.get_api_key().map_err(|e| LlmError::Config(e.to_string()))?;
        Self::new(&config.base_url, api_key, config.timeout())
    }

    /// Build the outbound request for a prompt
    fn build_request(&self, prompt: &str) -> Result<reqwest::Request, LlmError> {
        debug!(prompt_len = prompt.len(), "build_request: called");
        self.http
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&GenerateRequest::user_text(prompt))
            .build()
            .map_err(|e| LlmError::Config(format!("failed to build request: {}", e)))
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        debug!(endpoint = %self.endpoint, "generate: called");
        let request = self.build_request(prompt)?;

        // The response is owned by this scope; every return below drops it
        // after its body has been read (or abandoned on error).
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.timeout))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "generate: upstream returned error status");
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                message: truncate(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::MalformedResponse(format!("response body is not valid JSON: {}", e)))?;

        let text = parsed.into_text().map_err(LlmError::MalformedResponse)?;
        debug!(reply_len = text.len(), "generate: success");
        Ok(text)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    let trimmed = s.trim();
    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        let mut out: String = trimmed.chars().take(max_chars).collect();
        out.push_str("...");
        out
    }
}
