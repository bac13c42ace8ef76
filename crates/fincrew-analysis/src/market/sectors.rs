//! Sector history downloads
//!
//! Downloads daily history for the S&P 500 index and its sector ETFs and
//! saves one CSV per sector, named `{sector}_data.csv`.

use crate::error::Result;
use crate::market::yahoo::HistoryClient;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// S&P 500 index and sector ETF tickers
pub const SECTOR_ETFS: [(&str, &str); 12] = [
    ("S&P500", "^GSPC"),
    ("Technology", "XLK"),
    ("Financials", "XLF"),
    ("Healthcare", "XLV"),
    ("Consumer Discretionary", "XLY"),
    ("Energy", "XLE"),
    ("Utilities", "XLU"),
    ("Materials", "XLB"),
    ("Real Estate", "XLRE"),
    ("Communication Services", "XLC"),
    ("Industrials", "XLI"),
    ("Infrastructure", "XLI"),
];

const HISTORY_HEADERS: [&str; 7] = [
    "Date", "Open", "High", "Low", "Close", "AdjClose", "Volume",
];

/// Download history for every sector and write one CSV per sector
///
/// Returns the paths written, in [`SECTOR_ETFS`] order.
pub async fn download_sector_histories(
    client: &HistoryClient,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;

    let mut paths = Vec::with_capacity(SECTOR_ETFS.len());
    for (sector, ticker) in SECTOR_ETFS {
        info!("downloading data for {sector} ({ticker})");
        let quotes = client.get_historical_quotes(ticker, start, end).await?;

        let path = out_dir.join(format!("{sector}_data.csv"));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(HISTORY_HEADERS)?;
        for quote in &quotes {
            writer.write_record([
                quote.timestamp.format("%Y-%m-%d").to_string(),
                format!("{:.6}", quote.open),
                format!("{:.6}", quote.high),
                format!("{:.6}", quote.low),
                format!("{:.6}", quote.close),
                format!("{:.6}", quote.adjclose),
                quote.volume.to_string(),
            ])?;
        }
        writer.flush()?;

        info!("{sector} data saved to {}", path.display());
        paths.push(path);
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_table_shape() {
        assert_eq!(SECTOR_ETFS.len(), 12);
        assert_eq!(SECTOR_ETFS[0], ("S&P500", "^GSPC"));
        // Every sector name is unique even though tickers may repeat
        let mut names: Vec<&str> = SECTOR_ETFS.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 12);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_download_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let client = HistoryClient::new();
        let end = Utc::now();
        let start = end - chrono::Duration::days(30);

        let paths = download_sector_histories(&client, start, end, dir.path())
            .await
            .unwrap();
        assert_eq!(paths.len(), 12);
        assert!(paths[0].exists());
    }
}
