//! LLM provider abstraction layer for fincrew
//!
//! This crate provides provider-agnostic abstractions for interacting with
//! chat-completion services. It includes:
//!
//! - Message types for model communication
//! - Completion request/response types with token-usage accounting
//! - Provider trait for model implementations
//! - An OpenAI-compatible provider usable against any chat-completions
//!   endpoint, including Gemini's compatibility surface

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LlmError, Result};
pub use messages::{Message, Role};
pub use provider::LlmProvider;
pub use providers::{OpenAiCompatConfig, OpenAiCompatProvider};
