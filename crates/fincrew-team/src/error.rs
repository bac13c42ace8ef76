//! Error types for the group-chat runtime

use thiserror::Error;

/// Result type alias for team operations
pub type Result<T> = std::result::Result<T, TeamError>;

/// Errors that can occur while running a team conversation
#[derive(Error, Debug)]
pub enum TeamError {
    /// A participant's completion call failed
    #[error("participant '{participant}' failed: {source}")]
    ParticipantFailed {
        participant: String,
        #[source]
        source: fincrew_llm::LlmError,
    },

    /// A team was built without participants
    #[error("team has no participants")]
    NoParticipants,
}
