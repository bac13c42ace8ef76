//! Error types for analysis operations

use thiserror::Error;

/// Analysis-specific errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required environment variable missing
    #[error(transparent)]
    Env(#[from] fincrew_utils::EnvError),

    /// Batch chunk size must be positive
    #[error("chunk size must be greater than 0")]
    InvalidChunkSize,

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Completion call failed
    #[error("Completion error: {0}")]
    Completion(#[from] fincrew_llm::LlmError),

    /// Team run failed
    #[error("Team error: {0}")]
    Team(#[from] fincrew_team::TeamError),

    /// Prompt template rendering failed
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Market data fetch failed
    #[error("Market data error: {0}")]
    MarketData(String),

    /// Chart rendering failed
    #[error("Chart error: {0}")]
    Chart(String),

    /// PDF report generation failed
    #[error("Report error: {0}")]
    Report(String),

    /// Browser automation failed
    #[error("Browser error: {0}")]
    Browser(String),
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
