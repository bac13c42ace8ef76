//! Termination conditions for team runs

use crate::events::Turn;

/// A rule that ends a team conversation
#[derive(Debug, Clone)]
pub enum Termination {
    /// Stop once a turn's text contains the marker substring
    TextMention(String),

    /// Stop once this many turns have been emitted
    MaxTurns(usize),
}

impl Termination {
    /// Check whether the condition is met by the conversation so far
    pub fn is_met(&self, turns: &[Turn]) -> bool {
        match self {
            Self::TextMention(marker) => turns
                .last()
                .is_some_and(|turn| turn.content.contains(marker)),
            Self::MaxTurns(limit) => turns.len() >= *limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_mention() {
        let cond = Termination::TextMention("exit".to_string());
        assert!(!cond.is_met(&[]));
        assert!(!cond.is_met(&[Turn::new("a", "keep going")]));
        assert!(cond.is_met(&[Turn::new("a", "ok, exit now")]));
    }

    #[test]
    fn test_text_mention_checks_last_turn_only() {
        let cond = Termination::TextMention("exit".to_string());
        let turns = vec![Turn::new("a", "exit"), Turn::new("b", "continuing")];
        assert!(!cond.is_met(&turns));
    }

    #[test]
    fn test_max_turns() {
        let cond = Termination::MaxTurns(2);
        assert!(!cond.is_met(&[Turn::new("a", "one")]));
        assert!(cond.is_met(&[Turn::new("a", "one"), Turn::new("b", "two")]));
    }
}
