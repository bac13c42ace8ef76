//! Price chart rendering
//!
//! Renders the close series plus short/long moving averages to a PNG for
//! embedding in the PDF report. Moving averages are computed over the full
//! history handed in, then the plot is restricted to the trailing display
//! window, so the MA lines are complete across the visible range.

use crate::error::{AnalysisError, Result};
use crate::market::indicators::sma_series;
use crate::market::yahoo::Quote;
use plotters::prelude::*;
use std::path::Path;

const CHART_SIZE: (u32, u32) = (1024, 640);
const CLOSE_COLOR: RGBColor = RGBColor(31, 119, 180);
const MA_SHORT_COLOR: RGBColor = RGBColor(255, 127, 14);
const MA_LONG_COLOR: RGBColor = RGBColor(44, 160, 44);

/// Render the price chart for a symbol
///
/// `display_days` limits the plot to the trailing portion of the series;
/// the whole series still feeds the moving averages.
pub fn render_price_chart(
    symbol: &str,
    quotes: &[Quote],
    short_window: usize,
    long_window: usize,
    display_days: usize,
    output_path: &Path,
) -> Result<()> {
    if quotes.is_empty() {
        return Err(AnalysisError::Chart(format!(
            "no price data to chart for {symbol}"
        )));
    }

    let closes: Vec<f64> = quotes.iter().map(|q| q.close).collect();
    let short_ma = sma_series(&closes, short_window)?;
    let long_ma = sma_series(&closes, long_window)?;

    let display_start = quotes.len().saturating_sub(display_days.max(1));
    let visible = &quotes[display_start..];

    let mut y_min = f64::MAX;
    let mut y_max = f64::MIN;
    for (i, quote) in visible.iter().enumerate() {
        let idx = display_start + i;
        for value in [Some(quote.close), short_ma[idx], long_ma[idx]]
            .into_iter()
            .flatten()
        {
            y_min = y_min.min(value);
            y_max = y_max.max(value);
        }
    }
    let pad = ((y_max - y_min) * 0.05).max(1.0);

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| AnalysisError::Chart(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{symbol} Price History"),
            ("sans-serif", 28).into_font(),
        )
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(58)
        .build_cartesian_2d(0..visible.len(), (y_min - pad)..(y_max + pad))
        .map_err(|e| AnalysisError::Chart(e.to_string()))?;

    let dates: Vec<String> = visible
        .iter()
        .map(|q| q.timestamp.format("%Y-%m-%d").to_string())
        .collect();

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|idx: &usize| {
            dates.get(*idx).cloned().unwrap_or_default()
        })
        .y_desc("Price ($)")
        .draw()
        .map_err(|e| AnalysisError::Chart(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(
            visible.iter().enumerate().map(|(i, q)| (i, q.close)),
            &CLOSE_COLOR,
        ))
        .map_err(|e| AnalysisError::Chart(e.to_string()))?
        .label("Close")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], CLOSE_COLOR));

    let ma_points = |series: &[Option<f64>]| -> Vec<(usize, f64)> {
        series[display_start..]
            .iter()
            .enumerate()
            .filter_map(|(i, value)| value.map(|v| (i, v)))
            .collect()
    };

    chart
        .draw_series(LineSeries::new(ma_points(&short_ma), &MA_SHORT_COLOR))
        .map_err(|e| AnalysisError::Chart(e.to_string()))?
        .label(format!("{short_window}-Day MA"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], MA_SHORT_COLOR));

    chart
        .draw_series(LineSeries::new(ma_points(&long_ma), &MA_LONG_COLOR))
        .map_err(|e| AnalysisError::Chart(e.to_string()))?
        .label(format!("{long_window}-Day MA"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], MA_LONG_COLOR));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()
        .map_err(|e| AnalysisError::Chart(e.to_string()))?;

    root.present()
        .map_err(|e| AnalysisError::Chart(e.to_string()))?;

    Ok(())
}
