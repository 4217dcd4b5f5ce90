//! ModelClient trait definition

use async_trait::async_trait;

use super::LlmError;

/// Stateless text-generation client - each call is independent
///
/// One call sends one prompt as a single-turn request and returns the raw
/// reply text. Implementations must not retry or cache.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the prompt and return the model's raw reply text
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}
