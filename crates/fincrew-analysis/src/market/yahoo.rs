//! Yahoo Finance history client

use crate::error::{AnalysisError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// One trading day's price data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

/// Yahoo Finance price-history client
#[derive(Debug, Clone, Default)]
pub struct HistoryClient {}

impl HistoryClient {
    /// Create a new client
    pub fn new() -> Self {
        Self {}
    }

    /// Get daily quotes for a symbol between two instants
    pub async fn get_historical_quotes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| AnalysisError::MarketData(e.to_string()))?;

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| AnalysisError::MarketData(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| AnalysisError::MarketData(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| AnalysisError::MarketData(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| AnalysisError::MarketData(e.to_string()))?;

        Ok(quotes
            .iter()
            .map(|q| Quote {
                symbol: symbol.to_string(),
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
                adjclose: q.adjclose,
            })
            .collect())
    }

    /// Get daily quotes for the trailing `days` calendar days
    pub async fn get_recent_history(&self, symbol: &str, days: i64) -> Result<Vec<Quote>> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(days);
        self.get_historical_quotes(symbol, start, end).await
    }
}
