//! Command-line interface for fincrew
//!
//! One subcommand per pipeline: sector data download, chunked market
//! batch analysis, dialogue scoring, full research report, and watchlist
//! tracking.

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use fincrew_analysis::market::{download_sector_histories, render_price_chart};
use fincrew_analysis::report::{ReportContext, render_pdf};
use fincrew_analysis::teams::{display_name, report_team};
use fincrew_analysis::{
    AppConfig, BatchRunner, DialogueScorer, HistoryClient, PromptSet, RecordTable, TrackerConfig,
    compute_indicators, summarize_turns, tasks, write_transcript,
};
use fincrew_llm::LlmProvider;
use fincrew_team::{ChatEvent, Turn};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Extra history fetched before the display window so the long moving
/// average is filled from the first visible day
const MA_WARMUP_DAYS: i64 = 300;

/// Live console output is truncated past this many characters
const MAX_LIVE_CHARS: usize = 1500;

#[derive(Parser, Debug)]
#[command(name = "fincrew")]
#[command(about = "Multi-agent investment analysis pipelines", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download S&P 500 and sector ETF histories to per-sector CSV files
    Fetch {
        /// Start date (YYYY-MM-DD)
        #[arg(long, default_value = "2021-12-31")]
        start: String,

        /// End date (YYYY-MM-DD)
        #[arg(long, default_value = "2024-12-31")]
        end: String,

        /// Directory the CSV files are written to
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,
    },

    /// Run the chunked multi-agent analysis over a CSV table
    Batch {
        /// Input CSV file
        input: PathBuf,

        /// Output transcript CSV
        #[arg(long, default_value = "all_conversation_log.csv")]
        output: PathBuf,

        /// Records per batch
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Score dialogue transcripts against the coding rubric
    Score {
        /// Input CSV file with one transcript per row
        input: PathBuf,

        /// Output CSV with original columns plus one column per item
        #[arg(long, default_value = "score_results.csv")]
        output: PathBuf,

        /// Records per batch
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Produce a full research report (indicators, chart, team analysis, PDF)
    Analyze {
        /// Ticker symbol (e.g. AAPL)
        ticker: String,

        /// Days of price history to chart (90-365)
        #[arg(long, default_value_t = 180, value_parser = clap::value_parser!(i64).range(90..=365))]
        days: i64,

        /// Also add the ticker to the watchlist after the report
        #[arg(long)]
        track: bool,
    },

    /// Add a task to the watchlist in the to-do web app
    Track {
        /// Task name
        task: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fincrew_utils::init_tracing();

    let args = Args::parse();
    match args.command {
        Command::Fetch { start, end, out_dir } => fetch(&start, &end, out_dir).await,
        Command::Batch {
            input,
            output,
            chunk_size,
        } => batch(input, output, chunk_size).await,
        Command::Score {
            input,
            output,
            batch_size,
        } => score(input, output, batch_size).await,
        Command::Analyze { ticker, days, track } => analyze(&ticker, days, track).await,
        Command::Track { task } => track(&task).await,
    }
}

fn parse_date(text: &str) -> anyhow::Result<chrono::DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{text}', expected YYYY-MM-DD"))?;
    Ok(date
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc())
}

async fn fetch(start: &str, end: &str, out_dir: PathBuf) -> anyhow::Result<()> {
    let client = HistoryClient::new();
    let paths =
        download_sector_histories(&client, parse_date(start)?, parse_date(end)?, &out_dir).await?;

    println!("Downloaded {} sector files to {}", paths.len(), out_dir.display());
    Ok(())
}

async fn batch(input: PathBuf, output: PathBuf, chunk_size: Option<usize>) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env().context("check GEMINI_API_KEY in the environment")?;
    if let Some(chunk_size) = chunk_size {
        config = config.with_chunk_size(chunk_size);
        config.validate()?;
    }
    let config = Arc::new(config);
    let provider: Arc<dyn LlmProvider> = Arc::new(config.provider()?);

    let table =
        RecordTable::from_csv_path(&input).with_context(|| format!("reading {}", input.display()))?;
    info!(records = table.len(), "loaded input table");

    let runner = BatchRunner::for_provider(Arc::clone(&config), provider)?;
    let rows = runner.run(&table).await?;

    write_transcript(&output, &rows)?;
    println!("Conversation log written to {}", output.display());
    Ok(())
}

async fn score(input: PathBuf, output: PathBuf, batch_size: Option<usize>) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env().context("check GEMINI_API_KEY in the environment")?;
    if let Some(batch_size) = batch_size {
        config = config.with_score_batch_size(batch_size);
        config.validate()?;
    }
    let config = Arc::new(config);
    let provider: Arc<dyn LlmProvider> = Arc::new(config.provider()?);

    let table =
        RecordTable::from_csv_path(&input).with_context(|| format!("reading {}", input.display()))?;

    let scorer = DialogueScorer::new(Arc::clone(&config), provider)?;
    let written = scorer.run(&table, &output).await?;

    println!("Scored {written} rows into {}", output.display());
    Ok(())
}

async fn analyze(ticker: &str, days: i64, track_after: bool) -> anyhow::Result<()> {
    let ticker = ticker.to_uppercase();
    let config = Arc::new(
        AppConfig::from_env()
            .context("check GEMINI_API_KEY in the environment")?
            .with_history_days(days),
    );
    let provider: Arc<dyn LlmProvider> = Arc::new(config.provider()?);
    let prompts = PromptSet::new()?;

    std::fs::create_dir_all(&config.output_dir)?;

    // Price history, with warmup so the long MA spans the visible range
    let client = HistoryClient::new();
    let quotes = client
        .get_recent_history(&ticker, days + MA_WARMUP_DAYS)
        .await?;
    let indicators = compute_indicators(
        &ticker,
        &quotes,
        Utc::now(),
        config.ma_short_window,
        config.ma_long_window,
    )?;

    println!("Financial summary for {ticker}:");
    println!("{}", indicators.to_bullet_lines());

    let chart_path = config.output_dir.join(format!("{ticker}_chart.png"));
    render_price_chart(
        &ticker,
        &quotes,
        config.ma_short_window,
        config.ma_long_window,
        days as usize,
        &chart_path,
    )?;
    println!("Chart written to {}", chart_path.display());

    // Team analysis, streamed to the console as it happens
    let task = prompts.report_task(&ticker, &indicators.to_bullet_lines())?;
    let team = report_team(Arc::clone(&provider), &config);
    let mut events = team.run_stream(task);

    let mut turns: Vec<Turn> = Vec::new();
    while let Some(event) = events.recv().await {
        match event {
            ChatEvent::Text(turn) => {
                let mut line = format!("[{}] => {}", display_name(&turn.source), turn.content);
                if line.len() > MAX_LIVE_CHARS {
                    line.truncate(MAX_LIVE_CHARS);
                    line.push_str("... (content too long)");
                }
                println!("{line}\n");
                turns.push(turn);
            }
            ChatEvent::Failed { participant, error } => {
                anyhow::bail!("analysis failed at participant '{participant}': {error}");
            }
            ChatEvent::Task { .. } | ChatEvent::Stopped { .. } => {}
        }
    }

    let sections = summarize_turns(&config, &provider, &prompts, &turns).await?;

    let report_path = config.output_dir.join(format!(
        "report_{}.pdf",
        Utc::now().format("%Y%m%d_%H%M%S")
    ));
    let context = ReportContext {
        ticker: &ticker,
        indicators: &indicators,
        chart_path: Some(&chart_path),
        sections: &sections,
    };
    render_pdf(&context, &report_path)?;
    println!("Report written to {}", report_path.display());

    for (title, items) in sections.titled() {
        if items.is_empty() {
            continue;
        }
        println!("\n{title}");
        for item in items {
            println!("- {item}");
        }
    }

    if track_after {
        track(&ticker).await?;
    }

    Ok(())
}

async fn track(task: &str) -> anyhow::Result<()> {
    let config = TrackerConfig::from_env()
        .context("check TODOIST_EMAIL and TODOIST_PASSWORD in the environment")?;

    tasks::add_tracked_task(&config, task).await?;
    println!("Added '{task}' to the watchlist");
    Ok(())
}
