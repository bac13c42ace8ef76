//! Conversation participants
//!
//! A participant is a named role in the conversation. Most participants
//! wrap a chat-completion call; the user proxy replies with a fixed text
//! so headless runs still reach their termination marker.

use crate::error::{Result, TeamError};
use crate::events::Turn;
use async_trait::async_trait;
use fincrew_llm::{CompletionRequest, LlmProvider, Message};
use std::sync::Arc;

/// A named role in a team conversation
#[async_trait]
pub trait Participant: Send + Sync {
    /// The participant's name, used as the turn source
    fn name(&self) -> &str;

    /// Produce this participant's next turn
    ///
    /// `task` is the prompt the run was started with; `history` is every
    /// turn emitted so far, in order.
    async fn reply(&self, task: &str, history: &[Turn]) -> Result<Turn>;
}

/// Per-participant completion parameters
#[derive(Debug, Clone)]
pub struct ChatParams {
    /// Model to use
    pub model: String,

    /// System prompt establishing the participant's role
    pub system_prompt: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature for sampling
    pub temperature: f32,
}

impl ChatParams {
    /// Create parameters for a model with default generation settings
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: "You are a helpful assistant.".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
        }
    }

    /// Set the system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the max tokens
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A participant backed by a chat-completion call
///
/// The task and the running transcript are rendered into a single user
/// message; each prior turn is attributed to its source so the model sees
/// who said what.
pub struct LlmParticipant {
    name: String,
    provider: Arc<dyn LlmProvider>,
    params: ChatParams,
}

impl LlmParticipant {
    /// Create a new model-backed participant
    pub fn new(
        name: impl Into<String>,
        provider: Arc<dyn LlmProvider>,
        params: ChatParams,
    ) -> Self {
        Self {
            name: name.into(),
            provider,
            params,
        }
    }

    fn render_input(task: &str, history: &[Turn]) -> String {
        let mut input = String::from(task);
        for turn in history {
            input.push_str(&format!("\n[{}]: {}", turn.source, turn.content));
        }
        input
    }
}

#[async_trait]
impl Participant for LlmParticipant {
    fn name(&self) -> &str {
        &self.name
    }

    async fn reply(&self, task: &str, history: &[Turn]) -> Result<Turn> {
        let request = CompletionRequest::builder(&self.params.model)
            .messages(vec![Message::user(Self::render_input(task, history))])
            .system(self.params.system_prompt.clone())
            .max_tokens(self.params.max_tokens)
            .temperature(self.params.temperature)
            .build();

        let response =
            self.provider
                .complete(request)
                .await
                .map_err(|source| TeamError::ParticipantFailed {
                    participant: self.name.clone(),
                    source,
                })?;

        Ok(Turn::from_completion(&self.name, &response))
    }
}

/// A participant that replies with a fixed text
///
/// In interactive flows this seat belongs to a human; in headless batch
/// runs it emits the termination marker so the text-mention condition
/// can end the conversation.
pub struct UserProxy {
    name: String,
    reply_text: String,
}

impl UserProxy {
    /// Create a user proxy with the given fixed reply
    pub fn new(name: impl Into<String>, reply_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reply_text: reply_text.into(),
        }
    }
}

#[async_trait]
impl Participant for UserProxy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn reply(&self, _task: &str, _history: &[Turn]) -> Result<Turn> {
        Ok(Turn::new(&self.name, &self.reply_text))
    }
}
