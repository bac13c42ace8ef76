//! Analyst team construction
//!
//! Each pipeline assembles a round-robin team of named roles. Teams are
//! built fresh per run (and per batch), so no conversation state leaks
//! between units of work.

use crate::config::AppConfig;
use fincrew_llm::LlmProvider;
use fincrew_team::{LlmParticipant, Participant, RoundRobinTeam, Termination, UserProxy};
use std::sync::Arc;

const DATA_AGENT_PROMPT: &str = "You are a data analysis expert, skilled at identifying \
trends and key changes from historical financial data.";

const WEB_SURFER_PROMPT: &str = "You are a market intelligence expert, specializing in \
searching external sources to supplement the analysis with real-time market information.";

const STRATEGIST_PROMPT: &str = "You are an asset allocation strategist, skilled at \
synthesizing various inputs to provide actionable investment advice.";

const SENTIMENT_PROMPT: &str = "You are a market sentiment analyst, focused on evaluating \
the psychological and emotional factors driving market movements.";

const FINANCIAL_ANALYST_PROMPT: &str = "You are a financial analyst. Interpret the \
provided financial indicators and explain the company's financial condition, covering \
ratios, revenue changes, cost structure, and profitability.";

const NEWS_ANALYST_PROMPT: &str = "You are a market news analyst. Gather and summarize \
company background, industry context, and significant recent news relevant to the \
analysis.";

const STRATEGY_ADVISOR_PROMPT: &str = "You are a strategy advisor. Combine the financial \
and news analysis into a clear investment view with an explicit recommendation.";

/// Human-readable display names for live progress output
pub fn display_name(source: &str) -> &str {
    match source {
        "data_agent" => "Data Analyst",
        "web_surfer" => "Market Intelligence",
        "assistant" => "Strategy Consultant",
        "sentiment_analyzer" => "Sentiment Analyst",
        "financial_analyst" => "Financial Analyst",
        "news_analyst" => "News Analyst",
        "strategy_advisor" => "Strategy Advisor",
        "user_proxy" => "User",
        other => other,
    }
}

fn terminations(config: &AppConfig) -> Vec<Termination> {
    vec![
        Termination::TextMention(config.termination_marker.clone()),
        Termination::MaxTurns(config.max_team_turns),
    ]
}

/// Team used by the market batch pipeline
///
/// Role set from the batch-analysis flow: data analyst, market
/// intelligence, strategist, sentiment analyst, and a trailing user proxy
/// that emits the termination marker in headless runs.
pub fn market_team(provider: Arc<dyn LlmProvider>, config: &AppConfig) -> RoundRobinTeam {
    let participants: Vec<Arc<dyn Participant>> = vec![
        Arc::new(LlmParticipant::new(
            "data_agent",
            Arc::clone(&provider),
            config.chat_params(DATA_AGENT_PROMPT),
        )),
        Arc::new(LlmParticipant::new(
            "web_surfer",
            Arc::clone(&provider),
            config.chat_params(WEB_SURFER_PROMPT),
        )),
        Arc::new(LlmParticipant::new(
            "assistant",
            Arc::clone(&provider),
            config.chat_params(STRATEGIST_PROMPT),
        )),
        Arc::new(LlmParticipant::new(
            "sentiment_analyzer",
            Arc::clone(&provider),
            config.chat_params(SENTIMENT_PROMPT),
        )),
        Arc::new(UserProxy::new("user_proxy", &config.termination_marker)),
    ];

    let mut team = RoundRobinTeam::new(participants).with_rounds(config.team_rounds);
    for termination in terminations(config) {
        team = team.with_termination(termination);
    }
    team
}

/// Team used by the research-report pipeline
pub fn report_team(provider: Arc<dyn LlmProvider>, config: &AppConfig) -> RoundRobinTeam {
    let participants: Vec<Arc<dyn Participant>> = vec![
        Arc::new(LlmParticipant::new(
            "financial_analyst",
            Arc::clone(&provider),
            config.chat_params(FINANCIAL_ANALYST_PROMPT),
        )),
        Arc::new(LlmParticipant::new(
            "news_analyst",
            Arc::clone(&provider),
            config.chat_params(NEWS_ANALYST_PROMPT),
        )),
        Arc::new(LlmParticipant::new(
            "strategy_advisor",
            Arc::clone(&provider),
            config.chat_params(STRATEGY_ADVISOR_PROMPT),
        )),
        Arc::new(UserProxy::new("user_proxy", &config.termination_marker)),
    ];

    let mut team = RoundRobinTeam::new(participants).with_rounds(config.team_rounds);
    for termination in terminations(config) {
        team = team.with_termination(termination);
    }
    team
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fincrew_llm::{CompletionRequest, CompletionResponse, LlmError, Message, StopReason};

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                message: Message::assistant(format!("echo: {}", request.model)),
                stop_reason: StopReason::EndTurn,
                usage: None,
            })
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[test]
    fn test_market_team_roster() {
        let config = AppConfig::new("test-key");
        let team = market_team(Arc::new(EchoProvider), &config);
        assert_eq!(
            team.participant_names(),
            [
                "data_agent",
                "web_surfer",
                "assistant",
                "sentiment_analyzer",
                "user_proxy"
            ]
        );
    }

    #[test]
    fn test_report_team_roster() {
        let config = AppConfig::new("test-key");
        let team = report_team(Arc::new(EchoProvider), &config);
        assert_eq!(
            team.participant_names(),
            [
                "financial_analyst",
                "news_analyst",
                "strategy_advisor",
                "user_proxy"
            ]
        );
    }

    #[tokio::test]
    async fn test_market_team_run_ends_at_user_proxy() {
        let config = AppConfig::new("test-key");
        let team = market_team(Arc::new(EchoProvider), &config);

        let turns = team.run("analyze").await.unwrap();
        assert_eq!(turns.len(), 5);
        assert_eq!(turns.last().unwrap().content, config.termination_marker);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_name("data_agent"), "Data Analyst");
        assert_eq!(display_name("user_proxy"), "User");
        assert_eq!(display_name("unknown_role"), "unknown_role");
    }
}
