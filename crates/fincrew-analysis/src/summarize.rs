//! Turn summarization
//!
//! Collected team turns are verbose and partially redundant. A one-shot
//! cleanup completion reorganizes them into the five tagged report
//! sections, which are then parsed into bullet lists.

use crate::config::AppConfig;
use crate::error::Result;
use crate::prompts::PromptSet;
use crate::report::sections::ReportSections;
use fincrew_llm::{CompletionRequest, LlmProvider, Message};
use fincrew_team::Turn;
use std::sync::Arc;
use tracing::debug;

/// Reorganize raw turns into parsed report sections
///
/// Unlike the batch pipelines, a failure here propagates: without the
/// summary there is no report to render.
pub async fn summarize_turns(
    config: &AppConfig,
    provider: &Arc<dyn LlmProvider>,
    prompts: &PromptSet,
    turns: &[Turn],
) -> Result<ReportSections> {
    let full_text = turns
        .iter()
        .map(|turn| turn.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = prompts.summary_cleanup(&full_text)?;
    let request = CompletionRequest::builder(&config.model)
        .messages(vec![Message::user(prompt)])
        .max_tokens(config.max_tokens)
        .build();

    let response = provider.complete(request).await?;
    debug!(chars = response.text().len(), "summary cleanup returned");

    Ok(ReportSections::parse(response.text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fincrew_llm::{CompletionResponse, LlmError, StopReason};

    struct SectionedProvider;

    #[async_trait]
    impl LlmProvider for SectionedProvider {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, LlmError> {
            // The cleanup prompt must carry the raw turn text
            assert!(request.messages[0].content.contains("turn one"));

            Ok(CompletionResponse {
                message: Message::assistant(
                    "[Company Profile]\n- A test company\n[Recommendation]\n- Buy",
                ),
                stop_reason: StopReason::EndTurn,
                usage: None,
            })
        }

        fn name(&self) -> &str {
            "sectioned"
        }
    }

    #[tokio::test]
    async fn test_summarize_parses_sections() {
        let config = AppConfig::new("test-key");
        let provider: Arc<dyn LlmProvider> = Arc::new(SectionedProvider);
        let prompts = PromptSet::new().unwrap();
        let turns = vec![Turn::new("data_agent", "turn one"), Turn::new("assistant", "turn two")];

        let sections = summarize_turns(&config, &provider, &prompts, &turns)
            .await
            .unwrap();

        assert_eq!(sections.company, ["A test company"]);
        assert_eq!(sections.recommendation, ["Buy"]);
        assert!(sections.news.is_empty());
    }
}
