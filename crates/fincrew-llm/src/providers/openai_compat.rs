//! OpenAI-compatible chat-completions provider
//!
//! This module implements the [`LlmProvider`] trait against the
//! `/chat/completions` wire format. The base URL is configurable, so the
//! same provider works for OpenAI itself, Gemini's OpenAI-compatibility
//! endpoint, and local deployments (llama.cpp, vLLM, ...).
//!
//! # Examples
//!
//! ```no_run
//! use fincrew_llm::{CompletionRequest, Message, LlmProvider};
//! use fincrew_llm::providers::{OpenAiCompatProvider, OpenAiCompatConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OpenAiCompatConfig::new("sk-...")
//!         .with_api_base("https://generativelanguage.googleapis.com/v1beta/openai")
//!         .with_timeout(60);
//!     let provider = OpenAiCompatProvider::with_config(config)?;
//!
//!     let request = CompletionRequest::builder("gemini-2.0-flash")
//!         .add_message(Message::user("Hello!"))
//!         .max_tokens(100)
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LlmProvider, Message, Result, Role, StopReason,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the OpenAI-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatConfig {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the chat-completions API (default: "https://api.openai.com/v1")
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl OpenAiCompatConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set custom API base URL
    ///
    /// Useful for:
    /// - Gemini: "https://generativelanguage.googleapis.com/v1beta/openai"
    /// - Local deployments: "http://localhost:8000/v1"
    /// - Other OpenAI-compatible APIs
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// OpenAI-compatible chat-completions provider
pub struct OpenAiCompatProvider {
    client: Client,
    config: OpenAiCompatConfig,
}

impl OpenAiCompatProvider {
    /// Create a new provider with custom configuration
    pub fn with_config(config: OpenAiCompatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a new provider with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAiCompatConfig::new(api_key))
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAiCompatConfig {
        &self.config
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    #[instrument(skip(self, request), fields(model = %request.model, api_base = %self.config.api_base))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to {}", self.config.api_base);

        // System prompt goes into the messages array in this wire format
        let wire_messages = build_wire_messages(request.system.clone(), &request.messages);

        let wire_request = WireRequest {
            model: request.model.clone(),
            messages: wire_messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stop: request.stop_sequences,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;

            return Err(match status.as_u16() {
                401 => crate::LlmError::AuthenticationFailed,
                429 => crate::LlmError::RateLimitExceeded(error_text),
                400 => crate::LlmError::InvalidRequest(error_text),
                404 => crate::LlmError::ModelNotFound(request.model),
                _ => crate::LlmError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        let wire_response: WireResponse = response.json().await.map_err(|e| {
            crate::LlmError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        // The API can return multiple choices but we use the first
        let choice = wire_response.choices.into_iter().next().ok_or_else(|| {
            crate::LlmError::UnexpectedResponse("No choices in response".to_string())
        })?;

        let usage = wire_response.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        debug!(
            "Received response - finish_reason: {}, tokens: {:?}",
            choice.finish_reason,
            usage.map(|u| u.total())
        );

        Ok(CompletionResponse {
            message: Message::assistant(choice.message.content.unwrap_or_default()),
            stop_reason: map_stop_reason(&choice.finish_reason),
            usage,
        })
    }

    fn name(&self) -> &'static str {
        "openai-compat"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    finish_reason: String,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    #[allow(dead_code)]
    role: String,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

// ============================================================================
// Conversion functions
// ============================================================================

fn build_wire_messages(system: Option<String>, messages: &[Message]) -> Vec<WireMessage> {
    let mut result = Vec::with_capacity(messages.len() + 1);

    if let Some(sys) = system {
        result.push(WireMessage {
            role: "system".to_string(),
            content: sys,
        });
    }

    for msg in messages {
        let role = match msg.role {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        };
        result.push(WireMessage {
            role: role.to_string(),
            content: msg.content.clone(),
        });
    }

    result
}

fn map_stop_reason(finish_reason: &str) -> StopReason {
    match finish_reason {
        "length" => StopReason::MaxTokens,
        "stop_sequence" => StopReason::StopSequence,
        _ => StopReason::EndTurn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OpenAiCompatConfig::new("test-key");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_custom_base() {
        let config = OpenAiCompatConfig::new("test-key")
            .with_api_base("http://localhost:8000/v1")
            .with_timeout(30);
        assert_eq!(config.api_base, "http://localhost:8000/v1");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_build_wire_messages_with_system() {
        let messages = vec![Message::user("hi"), Message::assistant("hello")];
        let wire = build_wire_messages(Some("be terse".to_string()), &messages);

        assert_eq!(wire.len(), 3);
        assert_eq!(wire[0].role, "system");
        assert_eq!(wire[0].content, "be terse");
        assert_eq!(wire[1].role, "user");
        assert_eq!(wire[2].role, "assistant");
    }

    #[test]
    fn test_map_stop_reason() {
        assert_eq!(map_stop_reason("stop"), StopReason::EndTurn);
        assert_eq!(map_stop_reason("length"), StopReason::MaxTokens);
        assert_eq!(map_stop_reason("stop_sequence"), StopReason::StopSequence);
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "42"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3}
        }"#;
        let parsed: WireResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("42"));
        assert_eq!(parsed.usage.as_ref().map(|u| u.prompt_tokens), Some(12));
    }

    #[test]
    fn test_response_parsing_without_usage() {
        // Some compatible endpoints omit usage entirely
        let raw = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": null}, "finish_reason": "stop"}
            ]
        }"#;
        let parsed: WireResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.usage.is_none());
        assert!(parsed.choices[0].message.content.is_none());
    }
}
