//! Concurrent batch fan-out
//!
//! Every batch gets a fresh team and runs as an independent future; all
//! batches are awaited together. Each unit of work carries its batch
//! sequence index, and results are sorted by that index before
//! concatenation, so output order never depends on completion order.
//!
//! A model-service failure inside one batch does not propagate: the batch
//! is substituted with an empty result, a warning is logged, and the
//! remaining batches proceed.

use crate::batch::collector::TranscriptRow;
use crate::batch::splitter::Batch;
use crate::config::AppConfig;
use crate::error::Result;
use crate::prompts::PromptSet;
use crate::records::{RecordTable, render_field_values};
use crate::teams;
use fincrew_llm::LlmProvider;
use fincrew_team::RoundRobinTeam;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds a fresh team for one batch run
pub type TeamBuilder = Box<dyn Fn() -> RoundRobinTeam + Send + Sync>;

/// Runs the chunked market-analysis pipeline over a record table
pub struct BatchRunner {
    config: Arc<AppConfig>,
    prompts: PromptSet,
    team_builder: TeamBuilder,
}

impl BatchRunner {
    /// Create a runner with a custom team builder
    pub fn new(config: Arc<AppConfig>, team_builder: TeamBuilder) -> Result<Self> {
        Ok(Self {
            config,
            prompts: PromptSet::new()?,
            team_builder,
        })
    }

    /// Create a runner that builds the standard market team per batch
    pub fn for_provider(config: Arc<AppConfig>, provider: Arc<dyn LlmProvider>) -> Result<Self> {
        let builder_config = Arc::clone(&config);
        let team_builder: TeamBuilder = Box::new(move || {
            teams::market_team(Arc::clone(&provider), &builder_config)
        });
        Self::new(config, team_builder)
    }

    /// Split the table, run every batch concurrently, and collect one
    /// ordered transcript
    pub async fn run(&self, table: &RecordTable) -> Result<Vec<TranscriptRow>> {
        let total = table.len();

        // Render prompts up front so template errors surface before any
        // network traffic
        let mut units = Vec::new();
        for batch in table.batches(self.config.chunk_size)? {
            let data = render_field_values(table.headers(), batch.rows);
            let prompt = self
                .prompts
                .batch_analysis(batch.start, batch.end(), total, &data)?;
            units.push((batch, prompt));
        }

        info!(batches = units.len(), records = total, "starting batch fan-out");

        let tasks = units
            .into_iter()
            .map(|(batch, prompt)| self.run_batch(batch, prompt));
        let results = join_all(tasks).await;

        Ok(flatten_in_order(results))
    }

    /// Run one batch to completion, substituting an empty result on failure
    async fn run_batch(
        &self,
        batch: Batch<'_>,
        prompt: String,
    ) -> (usize, Vec<TranscriptRow>) {
        let team = (self.team_builder)();

        match team.run(prompt).await {
            Ok(turns) => {
                let rows = turns
                    .iter()
                    .map(|turn| TranscriptRow::from_turn(batch.start, batch.end(), turn))
                    .collect();
                (batch.index, rows)
            }
            Err(err) => {
                warn!(
                    batch = batch.index,
                    start = batch.start,
                    end = batch.end(),
                    error = %err,
                    "model call failed, substituting empty result"
                );
                (batch.index, Vec::new())
            }
        }
    }
}

/// Sort per-batch results by sequence index and concatenate
pub(crate) fn flatten_in_order(
    mut results: Vec<(usize, Vec<TranscriptRow>)>,
) -> Vec<TranscriptRow> {
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().flat_map(|(_, rows)| rows).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fincrew_llm::{CompletionRequest, CompletionResponse, LlmError, Message, StopReason};
    use fincrew_team::Turn;

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                message: Message::assistant("analysis"),
                stop_reason: StopReason::EndTurn,
                usage: None,
            })
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, LlmError> {
            Err(LlmError::RequestFailed("HTTP 503: overloaded".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn sample_table(rows: usize) -> RecordTable {
        RecordTable::new(
            vec!["Date".to_string(), "Close".to_string()],
            (0..rows)
                .map(|i| vec![format!("2024-01-{:02}", i + 1), format!("{}", 4700 + i)])
                .collect(),
        )
    }

    fn runner_with(provider: Arc<dyn LlmProvider>, chunk_size: usize) -> BatchRunner {
        let config = Arc::new(AppConfig::new("test-key").with_chunk_size(chunk_size));
        BatchRunner::for_provider(config, provider).unwrap()
    }

    #[tokio::test]
    async fn test_run_collects_every_batch_in_order() {
        let runner = runner_with(Arc::new(EchoProvider), 10);
        let table = sample_table(25);

        let rows = runner.run(&table).await.unwrap();

        // 3 batches x 5 participants (proxy included)
        assert_eq!(rows.len(), 15);

        // Rows appear in batch order with correct index tags
        let starts: Vec<usize> = rows.iter().map(|r| r.batch_start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
        assert_eq!(rows[0].batch_start, 0);
        assert_eq!(rows[0].batch_end, 9);
        assert_eq!(rows.last().unwrap().batch_start, 20);
        assert_eq!(rows.last().unwrap().batch_end, 24);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_and_continues() {
        let runner = runner_with(Arc::new(FailingProvider), 10);
        let table = sample_table(25);

        // All three batches fail, none propagates
        let rows = runner.run(&table).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_empty_table_runs_no_batches() {
        let runner = runner_with(Arc::new(EchoProvider), 10);
        let table = sample_table(0);

        let rows = runner.run(&table).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_zero_chunk_size_fails_fast() {
        // Bypass config validation to hit the splitter guard directly
        let config = Arc::new(AppConfig::new("test-key").with_chunk_size(0));
        let runner = BatchRunner::for_provider(config, Arc::new(EchoProvider)).unwrap();
        assert!(runner.run(&sample_table(5)).await.is_err());
    }

    #[test]
    fn test_flatten_sorts_by_sequence_index() {
        let row = |start: usize| TranscriptRow::from_turn(start, start + 9, &Turn::new("a", "x"));
        let shuffled = vec![
            (2, vec![row(20)]),
            (0, vec![row(0)]),
            (1, vec![row(10)]),
        ];

        let flat = flatten_in_order(shuffled);
        let starts: Vec<usize> = flat.iter().map(|r| r.batch_start).collect();
        assert_eq!(starts, [0, 10, 20]);
    }
}
