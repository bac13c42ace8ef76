//! Investment-analysis pipelines for fincrew
//!
//! This crate holds the domain logic around the group-chat runtime:
//!
//! - Chunked batch processing: split tabular input into fixed-size
//!   batches, render each into a prompt, fan the batches out as
//!   concurrent team runs, and collect one ordered CSV transcript
//! - Dialogue scoring against a fixed rubric with forgiving JSON parsing
//! - Market data retrieval (Yahoo Finance), indicator computation, sector
//!   history downloads, and price-chart rendering
//! - Report assembly: turn summarization into tagged sections and PDF
//!   generation
//! - To-do-list tracking via a WebDriver-driven browser session
//!
//! # Example
//!
//! ```rust,ignore
//! use fincrew_analysis::{AppConfig, BatchRunner, RecordTable, write_transcript};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(AppConfig::from_env()?);
//!     let provider = Arc::new(config.provider()?);
//!
//!     let table = RecordTable::from_csv_path("sp500.csv")?;
//!     let runner = BatchRunner::for_provider(Arc::clone(&config), provider)?;
//!     let rows = runner.run(&table).await?;
//!     write_transcript("all_conversation_log.csv", &rows)?;
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod market;
pub mod prompts;
pub mod records;
pub mod report;
pub mod score;
pub mod summarize;
pub mod tasks;
pub mod teams;

// Re-export main types for convenience
pub use batch::{BatchRunner, TranscriptRow, write_transcript};
pub use config::{AppConfig, TrackerConfig};
pub use error::{AnalysisError, Result};
pub use market::{HistoryClient, IndicatorBlock, compute_indicators, render_price_chart};
pub use prompts::PromptSet;
pub use records::RecordTable;
pub use report::{ReportContext, ReportSections, render_pdf};
pub use score::DialogueScorer;
pub use summarize::summarize_turns;
