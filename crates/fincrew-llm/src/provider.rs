//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for chat-completion providers
///
/// Implementations of this trait provide access to different model
/// services (e.g., OpenAI, Gemini via its OpenAI-compatible endpoint,
/// local deployments).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from the model
    ///
    /// # Arguments
    ///
    /// * `request` - The completion request with messages and parameters
    ///
    /// # Returns
    ///
    /// The completion response with the assistant's message and metadata
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "openai-compat")
    fn name(&self) -> &str;
}
