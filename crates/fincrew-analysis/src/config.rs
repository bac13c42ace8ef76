//! Configuration for analysis runs
//!
//! All configuration is built once at process start and passed by
//! reference to everything that needs it; no client or predicate is
//! constructed at module scope.

use crate::error::{AnalysisError, Result};
use fincrew_llm::{OpenAiCompatConfig, OpenAiCompatProvider};
use fincrew_team::ChatParams;
use fincrew_utils::{optional_env, require_env};
use std::path::PathBuf;
use std::time::Duration;

/// Gemini's OpenAI-compatible chat-completions endpoint
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TERMINATION_MARKER: &str = "exit";

/// Configuration shared by the analysis pipelines
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Model-service API key
    pub api_key: String,

    /// Chat-completions base URL
    pub api_base: String,

    /// Model identifier
    pub model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// Records per batch for the market batch pipeline
    pub chunk_size: usize,

    /// Marker substring that terminates a team conversation
    pub termination_marker: String,

    /// Passes through the participant list per team run
    pub team_rounds: usize,

    /// Hard cap on turns per team run
    pub max_team_turns: usize,

    /// Records per batch for the dialogue scorer
    pub score_batch_size: usize,

    /// Pause between sequential score batches
    pub score_pause: Duration,

    /// Directory for generated charts, transcripts and reports
    pub output_dir: PathBuf,

    /// Short moving-average window (trading days)
    pub ma_short_window: usize,

    /// Long moving-average window (trading days)
    pub ma_long_window: usize,

    /// Price-history window for charts and indicators (calendar days)
    pub history_days: i64,
}

impl AppConfig {
    /// Create a configuration with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: GEMINI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            chunk_size: 10_000,
            termination_marker: DEFAULT_TERMINATION_MARKER.to_string(),
            team_rounds: 1,
            max_team_turns: 20,
            score_batch_size: 10,
            score_pause: Duration::from_secs(1),
            output_dir: PathBuf::from("output"),
            ma_short_window: 20,
            ma_long_window: 60,
            history_days: 180,
        }
    }

    /// Build configuration from the environment
    ///
    /// Requires `GEMINI_API_KEY`; honors `GEMINI_API_BASE` and
    /// `FINCREW_MODEL` overrides when present.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(require_env("GEMINI_API_KEY")?);
        if let Some(base) = optional_env("GEMINI_API_BASE") {
            config.api_base = base;
        }
        if let Some(model) = optional_env("FINCREW_MODEL") {
            config.model = model;
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the batch chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the scorer batch size
    pub fn with_score_batch_size(mut self, score_batch_size: usize) -> Self {
        self.score_batch_size = score_batch_size;
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Set the history window in calendar days
    pub fn with_history_days(mut self, history_days: i64) -> Self {
        self.history_days = history_days;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AnalysisError::Config("API key is empty".to_string()));
        }
        if self.chunk_size == 0 || self.score_batch_size == 0 {
            return Err(AnalysisError::InvalidChunkSize);
        }
        if self.ma_short_window == 0 || self.ma_long_window <= self.ma_short_window {
            return Err(AnalysisError::Config(
                "moving-average windows must satisfy 0 < short < long".to_string(),
            ));
        }
        Ok(())
    }

    /// Construct the completion provider this configuration describes
    pub fn provider(&self) -> Result<OpenAiCompatProvider> {
        let provider_config = OpenAiCompatConfig::new(self.api_key.clone())
            .with_api_base(self.api_base.clone());
        Ok(OpenAiCompatProvider::with_config(provider_config)?)
    }

    /// Chat parameters for a participant with the given system prompt
    pub fn chat_params(&self, system_prompt: &str) -> ChatParams {
        ChatParams::new(self.model.clone())
            .with_system_prompt(system_prompt)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }
}

/// Configuration for the to-do-list tracker
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Login email for the to-do web app
    pub email: String,

    /// Login password for the to-do web app
    pub password: String,

    /// WebDriver endpoint to drive the browser through
    pub webdriver_url: String,

    /// Name of the list tracked tasks are added to
    pub list_name: String,
}

impl TrackerConfig {
    /// Build tracker configuration from the environment
    ///
    /// Requires `TODOIST_EMAIL` and `TODOIST_PASSWORD`; honors
    /// `WEBDRIVER_URL` when present (default: local chromedriver).
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            email: require_env("TODOIST_EMAIL")?,
            password: require_env("TODOIST_PASSWORD")?,
            webdriver_url: optional_env("WEBDRIVER_URL")
                .unwrap_or_else(|| "http://localhost:4444".to_string()),
            list_name: optional_env("TODOIST_LIST").unwrap_or_else(|| "Watchlist".to_string()),
        })
    }
}
