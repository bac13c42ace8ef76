//! Dialogue scoring pipeline
//!
//! Scores discussion transcripts against a fixed coding rubric. Batches of
//! rows are merged into one delimited prompt; the reply is split on the
//! delimiter and each part parsed as a JSON score object. Parsing is
//! forgiving by contract: a missing item becomes an empty value, an
//! unparseable part becomes an all-empty score set with a diagnostic, and
//! a failed model call degrades the whole batch to placeholders.

use crate::batch::collector::{append_rows, write_rows_with_bom};
use crate::config::AppConfig;
use crate::error::Result;
use crate::prompts::PromptSet;
use crate::records::RecordTable;
use fincrew_llm::{CompletionRequest, LlmProvider, Message};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Coding items scored for every transcript, in output-column order
pub const SCORE_ITEMS: [&str; 10] = [
    "clear_thesis",
    "logical_clarity",
    "interactivity",
    "topic_depth_breadth",
    "follow_up_questions",
    "uncertainty",
    "critical_thinking",
    "cited_works",
    "open_questions",
    "summary",
];

/// Delimiter separating per-transcript results in the batch reply
pub const RESULT_DELIMITER: &str = "-----";

/// Column names tried, in order, when locating the transcript column
const PREFERRED_DIALOGUE_COLUMNS: [&str; 5] = ["text", "utterance", "content", "dialogue", "Dialogue"];

/// Scores for one transcript: one value per rubric item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSet {
    values: HashMap<String, String>,
}

impl ScoreSet {
    /// A score set with every item empty
    pub fn empty() -> Self {
        Self {
            values: SCORE_ITEMS
                .iter()
                .map(|item| ((*item).to_string(), String::new()))
                .collect(),
        }
    }

    /// Value for a rubric item; unknown items read as empty
    pub fn get(&self, item: &str) -> &str {
        self.values.get(item).map_or("", String::as_str)
    }

    /// Values in rubric order, for one output row
    pub fn to_row(&self) -> Vec<String> {
        SCORE_ITEMS
            .iter()
            .map(|item| self.get(item).to_string())
            .collect()
    }
}

/// Remove a wrapping markdown code fence, if present
pub fn strip_code_fence(text: &str) -> String {
    let cleaned = text.trim();
    if !cleaned.starts_with("```") {
        return cleaned.to_string();
    }

    let mut lines: Vec<&str> = cleaned.lines().collect();
    if lines.first().is_some_and(|line| line.starts_with("```")) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|line| line.trim() == "```") {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}

/// Parse one transcript's reply into a score set
///
/// Every rubric item is present in the result: missing items become empty
/// values, and an unparseable reply yields all items empty.
pub fn parse_score_reply(text: &str) -> ScoreSet {
    let cleaned = strip_code_fence(text);

    let parsed: serde_json::Value = match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(err) => {
            warn!(%err, reply = %text, "failed to parse score reply as JSON");
            return ScoreSet::empty();
        }
    };

    let mut set = ScoreSet::empty();
    for item in SCORE_ITEMS {
        let value = match parsed.get(item) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        set.values.insert(item.to_string(), value);
    }
    set
}

/// Split a batch reply on the delimiter and parse each part
///
/// The result always has exactly `expected` entries: surplus parts are
/// dropped, missing ones are padded with empty score sets.
pub fn split_batch_reply(text: &str, expected: usize) -> Vec<ScoreSet> {
    let mut results: Vec<ScoreSet> = text
        .split(RESULT_DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_score_reply)
        .collect();

    results.truncate(expected);
    while results.len() < expected {
        results.push(ScoreSet::empty());
    }
    results
}

/// Pick the column holding the transcripts
///
/// Tries the common column names first and falls back to the first column.
pub fn select_dialogue_column(table: &RecordTable) -> usize {
    for name in PREFERRED_DIALOGUE_COLUMNS {
        if let Some(index) = table.column_index(name) {
            return index;
        }
    }
    info!(columns = ?table.headers(), "no dialogue column matched, using the first column");
    0
}

/// Runs the dialogue-scoring pipeline
pub struct DialogueScorer {
    config: Arc<AppConfig>,
    provider: Arc<dyn LlmProvider>,
    prompts: PromptSet,
}

impl DialogueScorer {
    /// Create a scorer backed by the given provider
    pub fn new(config: Arc<AppConfig>, provider: Arc<dyn LlmProvider>) -> Result<Self> {
        Ok(Self {
            config,
            provider,
            prompts: PromptSet::new()?,
        })
    }

    /// Score every row of the table, appending results to `output_path`
    ///
    /// Batches run sequentially with a fixed pause between them. Returns
    /// the number of rows written.
    pub async fn run(&self, table: &RecordTable, output_path: &Path) -> Result<usize> {
        if output_path.exists() {
            std::fs::remove_file(output_path)?;
        }

        let column = select_dialogue_column(table);
        let mut headers: Vec<&str> = table.headers().iter().map(String::as_str).collect();
        headers.extend(SCORE_ITEMS);

        let total = table.len();
        let batches: Vec<_> = table.batches(self.config.score_batch_size)?.collect();
        let batch_count = batches.len();

        if batch_count == 0 {
            write_rows_with_bom(output_path, &headers, std::iter::empty())?;
            return Ok(0);
        }

        for batch in batches {
            let sets = self.score_batch(batch.rows, column).await?;

            let rows = batch.rows.iter().zip(&sets).map(|(row, set)| {
                let mut out = row.clone();
                out.extend(set.to_row());
                out
            });

            if batch.index == 0 {
                write_rows_with_bom(output_path, &headers, rows)?;
            } else {
                append_rows(output_path, rows)?;
            }

            info!("processed {} / {total}", batch.end() + 1);

            if batch.index + 1 < batch_count {
                tokio::time::sleep(self.config.score_pause).await;
            }
        }

        Ok(total)
    }

    /// Score one batch, degrading to placeholders on a failed model call
    async fn score_batch(&self, rows: &[Vec<String>], column: usize) -> Result<Vec<ScoreSet>> {
        let dialogues: Vec<String> = rows
            .iter()
            .map(|row| row.get(column).map_or("", String::as_str).trim().to_string())
            .collect();
        let transcripts = dialogues.join(&format!("\n{RESULT_DELIMITER}\n"));
        let prompt = self
            .prompts
            .dialogue_scoring(&SCORE_ITEMS, RESULT_DELIMITER, &transcripts)?;

        let request = CompletionRequest::builder(&self.config.model)
            .messages(vec![Message::user(prompt)])
            .max_tokens(self.config.max_tokens)
            .build();

        match self.provider.complete(request).await {
            Ok(response) => Ok(split_batch_reply(response.text(), rows.len())),
            Err(err) => {
                warn!(%err, "score call failed, substituting empty results");
                Ok(vec![ScoreSet::empty(); rows.len()])
            }
        }
    }
}
