//! Round-robin team runner
//!
//! Participants speak in list order; the list is cycled for a configured
//! number of rounds. After every turn each termination condition is
//! checked, so a marker emitted mid-round stops the run immediately.

use crate::error::{Result, TeamError};
use crate::events::{ChatEvent, StopCause, Turn};
use crate::participant::Participant;
use crate::termination::Termination;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// A team of participants that exchange turns in round-robin order
pub struct RoundRobinTeam {
    participants: Vec<Arc<dyn Participant>>,
    terminations: Vec<Termination>,
    rounds: usize,
}

impl RoundRobinTeam {
    /// Create a team that runs a single pass through the participant list
    pub fn new(participants: Vec<Arc<dyn Participant>>) -> Self {
        Self {
            participants,
            terminations: Vec::new(),
            rounds: 1,
        }
    }

    /// Add a termination condition
    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.terminations.push(termination);
        self
    }

    /// Set how many passes through the participant list to run before
    /// stopping (when no termination condition fires earlier)
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Participant names in speaking order
    pub fn participant_names(&self) -> Vec<&str> {
        self.participants.iter().map(|p| p.name()).collect()
    }

    /// Run the conversation to completion and collect the turns
    pub async fn run(&self, task: impl Into<String>) -> Result<Vec<Turn>> {
        let task = task.into();
        drive(
            &self.participants,
            &self.terminations,
            self.rounds,
            &task,
            |_| {},
        )
        .await
    }

    /// Run the conversation, streaming events as they are produced
    ///
    /// The returned receiver yields a `Task` event, then `Text` events in
    /// turn order, then a final `Stopped` (or `Failed`) event. The team
    /// itself holds no run state, so it can be run again afterwards; each
    /// call returns a fresh, independently ordered event sequence.
    pub fn run_stream(&self, task: impl Into<String>) -> mpsc::UnboundedReceiver<ChatEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let participants = self.participants.clone();
        let terminations = self.terminations.clone();
        let rounds = self.rounds;
        let task = task.into();

        tokio::spawn(async move {
            let result = drive(&participants, &terminations, rounds, &task, |event| {
                // Receiver may have been dropped mid-run; nothing to do then
                let _ = tx.send(event);
            })
            .await;

            if let Err(err) = result {
                debug!("team run ended with error: {err}");
            }
        });

        rx
    }
}

/// Shared run loop for collected and streaming consumption
async fn drive(
    participants: &[Arc<dyn Participant>],
    terminations: &[Termination],
    rounds: usize,
    task: &str,
    mut emit: impl FnMut(ChatEvent),
) -> Result<Vec<Turn>> {
    if participants.is_empty() {
        return Err(TeamError::NoParticipants);
    }

    emit(ChatEvent::Task {
        content: task.to_string(),
    });

    let mut turns: Vec<Turn> = Vec::new();

    for round in 0..rounds {
        for participant in participants {
            debug!(round, participant = participant.name(), "requesting turn");

            let turn = match participant.reply(task, &turns).await {
                Ok(turn) => turn,
                Err(err) => {
                    emit(ChatEvent::Failed {
                        participant: participant.name().to_string(),
                        error: err.to_string(),
                    });
                    return Err(err);
                }
            };

            emit(ChatEvent::Text(turn.clone()));
            turns.push(turn);

            if terminations.iter().any(|t| t.is_met(&turns)) {
                emit(ChatEvent::Stopped {
                    cause: StopCause::TerminationMet,
                });
                return Ok(turns);
            }
        }
    }

    emit(ChatEvent::Stopped {
        cause: StopCause::RoundsExhausted,
    });
    Ok(turns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Test participant that always replies with the same text
    struct FixedReply {
        name: String,
        text: String,
    }

    impl FixedReply {
        fn new(name: &str, text: &str) -> Arc<dyn Participant> {
            Arc::new(Self {
                name: name.to_string(),
                text: text.to_string(),
            })
        }
    }

    #[async_trait]
    impl Participant for FixedReply {
        fn name(&self) -> &str {
            &self.name
        }

        async fn reply(&self, _task: &str, _history: &[Turn]) -> Result<Turn> {
            Ok(Turn::new(&self.name, &self.text))
        }
    }

    /// Test participant whose completion call always fails
    struct AlwaysFails {
        name: String,
    }

    #[async_trait]
    impl Participant for AlwaysFails {
        fn name(&self) -> &str {
            &self.name
        }

        async fn reply(&self, _task: &str, _history: &[Turn]) -> Result<Turn> {
            Err(TeamError::ParticipantFailed {
                participant: self.name.clone(),
                source: fincrew_llm::LlmError::RequestFailed("503".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_round_robin_order() {
        let team = RoundRobinTeam::new(vec![
            FixedReply::new("a", "first"),
            FixedReply::new("b", "second"),
            FixedReply::new("c", "third"),
        ])
        .with_rounds(2);

        let turns = team.run("task").await.unwrap();
        let sources: Vec<&str> = turns.iter().map(|t| t.source.as_str()).collect();
        assert_eq!(sources, ["a", "b", "c", "a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_text_mention_stops_mid_round() {
        let team = RoundRobinTeam::new(vec![
            FixedReply::new("a", "working"),
            FixedReply::new("user_proxy", "exit"),
            FixedReply::new("c", "never reached"),
        ])
        .with_termination(Termination::TextMention("exit".to_string()))
        .with_rounds(10);

        let turns = team.run("task").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns.last().unwrap().source, "user_proxy");
    }

    #[tokio::test]
    async fn test_max_turns_termination() {
        let team = RoundRobinTeam::new(vec![FixedReply::new("a", "more")])
            .with_termination(Termination::MaxTurns(3))
            .with_rounds(100);

        let turns = team.run("task").await.unwrap();
        assert_eq!(turns.len(), 3);
    }

    #[tokio::test]
    async fn test_participant_failure_propagates() {
        let team = RoundRobinTeam::new(vec![
            FixedReply::new("a", "fine"),
            Arc::new(AlwaysFails {
                name: "b".to_string(),
            }),
        ]);

        let err = team.run("task").await.unwrap_err();
        assert!(matches!(err, TeamError::ParticipantFailed { .. }));
    }

    #[tokio::test]
    async fn test_empty_team_is_an_error() {
        let team = RoundRobinTeam::new(vec![]);
        assert!(matches!(
            team.run("task").await,
            Err(TeamError::NoParticipants)
        ));
    }

    #[tokio::test]
    async fn test_stream_event_sequence() {
        let team = RoundRobinTeam::new(vec![
            FixedReply::new("a", "hello"),
            FixedReply::new("user_proxy", "exit"),
        ])
        .with_termination(Termination::TextMention("exit".to_string()));

        let mut rx = team.run_stream("task");
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert!(matches!(events.first(), Some(ChatEvent::Task { .. })));
        assert!(matches!(
            events.last(),
            Some(ChatEvent::Stopped {
                cause: StopCause::TerminationMet
            })
        ));
        let texts = events
            .iter()
            .filter(|e| matches!(e, ChatEvent::Text(_)))
            .count();
        assert_eq!(texts, 2);
    }

    #[tokio::test]
    async fn test_stream_can_be_rerun() {
        let team = RoundRobinTeam::new(vec![FixedReply::new("a", "hi")]);

        for _ in 0..2 {
            let mut rx = team.run_stream("task");
            let mut texts = 0;
            while let Some(event) = rx.recv().await {
                if matches!(event, ChatEvent::Text(_)) {
                    texts += 1;
                }
            }
            assert_eq!(texts, 1);
        }
    }
}
