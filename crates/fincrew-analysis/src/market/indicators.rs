//! Indicator block computed from price history
//!
//! The derived set mirrors what the report surfaces: latest close, 52-week
//! extremes, short/long moving averages, year-to-date change, annualized
//! volatility of daily returns, and a trend label from the MA crossover.

use crate::error::{AnalysisError, Result};
use crate::market::yahoo::Quote;
use chrono::{DateTime, Datelike, Utc};
use ta::Next;
use ta::indicators::SimpleMovingAverage;

/// Trend label derived from the moving-average crossover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Upward,
    Downward,
    Neutral,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Upward => "Upward",
            Self::Downward => "Downward",
            Self::Neutral => "Neutral",
        };
        write!(f, "{label}")
    }
}

/// Key indicators for one symbol
#[derive(Debug, Clone)]
pub struct IndicatorBlock {
    pub symbol: String,
    pub latest_close: f64,
    pub week52_high: f64,
    pub week52_low: f64,
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub ytd_change: Option<f64>,
    pub ytd_change_pct: Option<f64>,
    pub annualized_volatility: Option<f64>,
    pub trend: Trend,
}

impl IndicatorBlock {
    /// Label/value pairs in report order; absent values render as "N/A"
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let fmt_opt = |value: Option<f64>, unit: &str| {
            value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}{unit}"))
        };

        vec![
            ("Latest Close", format!("${:.2}", self.latest_close)),
            ("52 Week High", format!("${:.2}", self.week52_high)),
            ("52 Week Low", format!("${:.2}", self.week52_low)),
            ("Short MA", fmt_opt(self.ma_short, "")),
            ("Long MA", fmt_opt(self.ma_long, "")),
            ("YTD Change", fmt_opt(self.ytd_change, "")),
            ("YTD Change %", fmt_opt(self.ytd_change_pct, "%")),
            ("Volatility", fmt_opt(self.annualized_volatility.map(|v| v * 100.0), "%")),
            ("Trend", self.trend.to_string()),
        ]
    }

    /// Bullet-list rendering used in prompts and console output
    pub fn to_bullet_lines(&self) -> String {
        self.pairs()
            .into_iter()
            .map(|(label, value)| format!("- {label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Simple-moving-average series over the closes
///
/// Entries before the window has filled are `None`.
pub fn sma_series(closes: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut sma = SimpleMovingAverage::new(window)
        .map_err(|e| AnalysisError::MarketData(format!("invalid MA window {window}: {e}")))?;

    Ok(closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let value = sma.next(close);
            (i + 1 >= window).then_some(value)
        })
        .collect())
}

/// Sample standard deviation of daily returns, annualized over 252
/// trading days
fn annualized_volatility(closes: &[f64]) -> Option<f64> {
    if closes.len() < 3 {
        return None;
    }

    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();
    if returns.len() < 2 {
        return None;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>()
        / (returns.len() - 1) as f64;

    Some(variance.sqrt() * 252_f64.sqrt())
}

/// Compute the indicator block from daily quotes
///
/// Quotes must be in ascending time order. `as_of` anchors the 52-week
/// and year-to-date windows.
pub fn compute_indicators(
    symbol: &str,
    quotes: &[Quote],
    as_of: DateTime<Utc>,
    short_window: usize,
    long_window: usize,
) -> Result<IndicatorBlock> {
    let last = quotes.last().ok_or_else(|| {
        AnalysisError::MarketData(format!("no price data available for {symbol}"))
    })?;

    let closes: Vec<f64> = quotes.iter().map(|q| q.close).collect();

    let year_ago = as_of - chrono::Duration::days(365);
    let mut last_year: Vec<&Quote> = quotes.iter().filter(|q| q.timestamp >= year_ago).collect();
    if last_year.is_empty() {
        // Stale history: fall back to the whole series
        last_year = quotes.iter().collect();
    }
    let week52_high = last_year
        .iter()
        .map(|q| q.high)
        .fold(f64::MIN, f64::max);
    let week52_low = last_year.iter().map(|q| q.low).fold(f64::MAX, f64::min);

    let ma_short = sma_series(&closes, short_window)?.last().copied().flatten();
    let ma_long = sma_series(&closes, long_window)?.last().copied().flatten();

    let ytd: Vec<&Quote> = quotes
        .iter()
        .filter(|q| q.timestamp.year() == as_of.year())
        .collect();
    let (ytd_change, ytd_change_pct) = match (ytd.first(), ytd.last()) {
        (Some(first), Some(last)) if first.close != 0.0 => {
            let change = last.close - first.close;
            (Some(change), Some(change / first.close * 100.0))
        }
        _ => (None, None),
    };

    let trend = match (ma_short, ma_long) {
        (Some(short), Some(long)) if short > long => Trend::Upward,
        (Some(short), Some(long)) if short < long => Trend::Downward,
        _ => Trend::Neutral,
    };

    Ok(IndicatorBlock {
        symbol: symbol.to_string(),
        latest_close: last.close,
        week52_high,
        week52_low,
        ma_short,
        ma_long,
        ytd_change,
        ytd_change_pct,
        annualized_volatility: annualized_volatility(&closes),
        trend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn quote(day: i64, close: f64) -> Quote {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::days(day);
        Quote {
            symbol: "TEST".to_string(),
            timestamp,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
            adjclose: close,
        }
    }

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_sma_series_window_fill() {
        let closes = [1.0, 2.0, 3.0, 4.0];
        let series = sma_series(&closes, 3).unwrap();

        assert_eq!(series[0], None);
        assert_eq!(series[1], None);
        assert_eq!(series[2], Some(2.0));
        assert_eq!(series[3], Some(3.0));
    }

    #[test]
    fn test_sma_window_zero_is_error() {
        assert!(sma_series(&[1.0], 0).is_err());
    }

    #[test]
    fn test_empty_quotes_is_error() {
        assert!(compute_indicators("TEST", &[], as_of(), 2, 3).is_err());
    }

    #[test]
    fn test_upward_trend() {
        // Steadily rising closes: short MA above long MA
        let quotes: Vec<Quote> = (0..30).map(|i| quote(i, 100.0 + i as f64)).collect();
        let block = compute_indicators("TEST", &quotes, as_of(), 5, 20).unwrap();

        assert_eq!(block.trend, Trend::Upward);
        assert_eq!(block.latest_close, 129.0);
        assert!(block.ma_short.unwrap() > block.ma_long.unwrap());
    }

    #[test]
    fn test_downward_trend() {
        let quotes: Vec<Quote> = (0..30).map(|i| quote(i, 200.0 - i as f64)).collect();
        let block = compute_indicators("TEST", &quotes, as_of(), 5, 20).unwrap();
        assert_eq!(block.trend, Trend::Downward);
    }

    #[test]
    fn test_short_history_leaves_ma_and_trend_neutral() {
        let quotes: Vec<Quote> = (0..3).map(|i| quote(i, 100.0)).collect();
        let block = compute_indicators("TEST", &quotes, as_of(), 5, 20).unwrap();

        assert!(block.ma_short.is_none());
        assert!(block.ma_long.is_none());
        assert_eq!(block.trend, Trend::Neutral);
    }

    #[test]
    fn test_week52_extremes() {
        let quotes: Vec<Quote> = (0..10).map(|i| quote(i, 100.0 + i as f64)).collect();
        let block = compute_indicators("TEST", &quotes, as_of(), 2, 3).unwrap();

        // high = max close + 1, low = min close - 1 from the quote builder
        assert_eq!(block.week52_high, 110.0);
        assert_eq!(block.week52_low, 99.0);
    }

    #[test]
    fn test_ytd_change() {
        let quotes: Vec<Quote> = vec![quote(0, 100.0), quote(30, 110.0), quote(60, 120.0)];
        let block = compute_indicators("TEST", &quotes, as_of(), 1, 2).unwrap();

        assert_eq!(block.ytd_change, Some(20.0));
        assert_eq!(block.ytd_change_pct, Some(20.0));
    }

    #[test]
    fn test_flat_series_has_zero_volatility() {
        let quotes: Vec<Quote> = (0..20).map(|i| quote(i, 100.0)).collect();
        let block = compute_indicators("TEST", &quotes, as_of(), 2, 3).unwrap();
        assert_eq!(block.annualized_volatility, Some(0.0));
    }

    #[test]
    fn test_pairs_render_missing_as_na() {
        let quotes: Vec<Quote> = (0..3).map(|i| quote(i, 100.0)).collect();
        let block = compute_indicators("TEST", &quotes, as_of(), 5, 20).unwrap();

        let rendered = block.to_bullet_lines();
        assert!(rendered.contains("- Short MA: N/A"));
        assert!(rendered.contains("- Trend: Neutral"));
        assert!(rendered.contains("- Latest Close: $100.00"));
    }
}
