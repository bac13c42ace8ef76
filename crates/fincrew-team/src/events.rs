//! Chat events and turns
//!
//! The runtime emits an explicit tagged union of event kinds. Consumers
//! match on [`ChatEvent`] variants instead of probing attributes, and all
//! decoding from provider responses happens in one place
//! ([`Turn::from_completion`]).

use fincrew_llm::{CompletionResponse, TokenUsage};
use serde::{Deserialize, Serialize};

/// One message emitted by one participant during a team run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Name of the participant that produced this turn
    pub source: String,

    /// Text content of the turn
    pub content: String,

    /// Token usage for the underlying completion, when the service
    /// reported it
    pub usage: Option<TokenUsage>,
}

impl Turn {
    /// Create a turn with no usage information (e.g., a user-proxy reply)
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
            usage: None,
        }
    }

    /// Decode a completion response into a turn
    ///
    /// This is the single adapter between the provider boundary and the
    /// event stream: an empty completion becomes a turn with empty
    /// content, and absent usage stays `None` rather than zero.
    pub fn from_completion(source: impl Into<String>, response: &CompletionResponse) -> Self {
        Self {
            source: source.into(),
            content: response.text().to_string(),
            usage: response.usage,
        }
    }
}

/// Why a team run stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopCause {
    /// A termination condition matched the conversation
    TerminationMet,

    /// Every participant spoke in every configured round
    RoundsExhausted,
}

/// Tagged union of events emitted by a team run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChatEvent {
    /// The task prompt the run was started with
    Task {
        /// Task text
        content: String,
    },

    /// A participant produced a text turn
    Text(Turn),

    /// The run ended normally
    Stopped {
        /// Why the run ended
        cause: StopCause,
    },

    /// The run aborted because a participant failed
    Failed {
        /// Name of the failing participant
        participant: String,
        /// Rendered error message
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincrew_llm::{CompletionResponse, Message, StopReason};

    #[test]
    fn test_from_completion_with_usage() {
        let response = CompletionResponse {
            message: Message::assistant("analysis text"),
            stop_reason: StopReason::EndTurn,
            usage: Some(TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            }),
        };

        let turn = Turn::from_completion("data_agent", &response);
        assert_eq!(turn.source, "data_agent");
        assert_eq!(turn.content, "analysis text");
        assert_eq!(turn.usage.map(|u| u.total()), Some(30));
    }

    #[test]
    fn test_from_completion_without_usage() {
        let response = CompletionResponse {
            message: Message::assistant(""),
            stop_reason: StopReason::EndTurn,
            usage: None,
        };

        let turn = Turn::from_completion("assistant", &response);
        assert_eq!(turn.content, "");
        assert!(turn.usage.is_none());
    }

    #[test]
    fn test_event_serialization() {
        let event = ChatEvent::Text(Turn::new("user_proxy", "exit"));
        let json = serde_json::to_string(&event).unwrap();
        let back: ChatEvent = serde_json::from_str(&json).unwrap();
        match back {
            ChatEvent::Text(turn) => assert_eq!(turn.source, "user_proxy"),
            _ => panic!("expected Text event"),
        }
    }
}
