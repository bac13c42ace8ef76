//! Market data retrieval and derived indicators

pub mod chart;
pub mod indicators;
pub mod sectors;
pub mod yahoo;

pub use chart::render_price_chart;
pub use indicators::{IndicatorBlock, Trend, compute_indicators, sma_series};
pub use sectors::{SECTOR_ETFS, download_sector_histories};
pub use yahoo::{HistoryClient, Quote};
