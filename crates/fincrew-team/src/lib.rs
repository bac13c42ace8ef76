//! Multi-participant group-chat runtime for fincrew
//!
//! This crate implements the turn-taking conversation engine the analysis
//! pipelines hand their prompts to. A [`RoundRobinTeam`] cycles through an
//! ordered list of named participants, each backed by a chat-completion
//! call (or a fixed user-proxy reply), until a termination condition fires
//! or the configured number of rounds is exhausted.
//!
//! Events crossing the boundary are an explicit tagged union
//! ([`ChatEvent`]) decoded by a single adapter from completion responses,
//! rather than duck-typed message objects.
//!
//! # Example
//!
//! ```no_run
//! use fincrew_team::{
//!     ChatParams, LlmParticipant, Participant, RoundRobinTeam, Termination, UserProxy,
//! };
//! use std::sync::Arc;
//!
//! # async fn example(provider: Arc<dyn fincrew_llm::LlmProvider>) -> fincrew_team::Result<()> {
//! let params = ChatParams::new("gemini-2.0-flash");
//! let participants: Vec<Arc<dyn Participant>> = vec![
//!     Arc::new(LlmParticipant::new("data_agent", Arc::clone(&provider), params.clone())),
//!     Arc::new(UserProxy::new("user_proxy", "exit")),
//! ];
//! let team = RoundRobinTeam::new(participants)
//!     .with_termination(Termination::TextMention("exit".to_string()));
//!
//! let turns = team.run("Analyze this batch of prices.").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod events;
pub mod participant;
pub mod team;
pub mod termination;

pub use error::{Result, TeamError};
pub use events::{ChatEvent, StopCause, Turn};
pub use participant::{ChatParams, LlmParticipant, Participant, UserProxy};
pub use team::RoundRobinTeam;
pub use termination::Termination;
