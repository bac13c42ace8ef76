//! PDF report rendering
//!
//! Composes the research report: title, key/value indicator block, the
//! embedded price chart, and up to five labeled bullet sections. A
//! Unicode-capable TTF is discovered from a candidate list; without one
//! the report cannot be produced and the error is surfaced to the user.

use crate::error::{AnalysisError, Result};
use crate::market::indicators::IndicatorBlock;
use crate::report::sections::ReportSections;
use genpdf::elements::{Break, Image, Paragraph};
use genpdf::fonts::{FontData, FontFamily};
use genpdf::{Alignment, Document, Element, SimplePageDecorator, style};
use std::path::{Path, PathBuf};
use tracing::info;

/// Font files tried in order when building the report
pub const FONT_CANDIDATES: [&str; 6] = [
    "fonts/NotoSans-Regular.ttf",
    "fonts/NotoSansTC-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
];

/// Locate a usable report font
pub fn find_report_font() -> Option<PathBuf> {
    for candidate in FONT_CANDIDATES {
        let path = Path::new(candidate);
        if path.exists() {
            info!("using report font {}", path.display());
            return Some(path.to_path_buf());
        }
    }
    None
}

/// Everything needed to render one report
pub struct ReportContext<'a> {
    /// Ticker the report covers
    pub ticker: &'a str,

    /// Indicator block shown below the title
    pub indicators: &'a IndicatorBlock,

    /// Chart image to embed, when one was rendered
    pub chart_path: Option<&'a Path>,

    /// Parsed bullet sections
    pub sections: &'a ReportSections,
}

fn load_font_family(font_path: &Path) -> Result<FontFamily<FontData>> {
    let bytes = std::fs::read(font_path)?;
    let data = FontData::new(bytes, None)
        .map_err(|e| AnalysisError::Report(format!("failed to load font: {e}")))?;

    // One discovered TTF serves all styles
    Ok(FontFamily {
        regular: data.clone(),
        bold: data.clone(),
        italic: data.clone(),
        bold_italic: data,
    })
}

/// Render the report PDF to `output_path`
pub fn render_pdf(context: &ReportContext<'_>, output_path: &Path) -> Result<()> {
    let font_path = find_report_font().ok_or_else(|| {
        AnalysisError::Report(
            "no report font found; install a TTF from the candidate list or add one under ./fonts"
                .to_string(),
        )
    })?;

    let mut doc = Document::new(load_font_family(&font_path)?);
    doc.set_title("Investment Research Report");

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(15);
    doc.set_page_decorator(decorator);

    doc.push(
        Paragraph::new("Investment Research Report")
            .aligned(Alignment::Center)
            .styled(style::Style::new().with_font_size(18)),
    );
    doc.push(Break::new(1));

    doc.push(
        Paragraph::new(format!("Ticker: {}", context.ticker))
            .styled(style::Style::new().with_font_size(14)),
    );
    doc.push(Break::new(1));

    doc.push(
        Paragraph::new("Financial Summary").styled(style::Style::new().with_font_size(14)),
    );
    for (label, value) in context.indicators.pairs() {
        doc.push(
            Paragraph::new(format!("- {label}: {value}"))
                .styled(style::Style::new().with_font_size(10)),
        );
    }
    doc.push(Break::new(1));

    if let Some(chart_path) = context.chart_path {
        let image = Image::from_path(chart_path)
            .map_err(|e| AnalysisError::Report(format!("failed to embed chart: {e}")))?;
        doc.push(image.with_alignment(Alignment::Center));
        doc.push(Break::new(1));
    }

    for (title, items) in context.sections.titled() {
        if items.is_empty() {
            continue;
        }
        doc.push(Paragraph::new(title).styled(style::Style::new().with_font_size(14)));
        for item in items {
            doc.push(
                Paragraph::new(format!("- {item}"))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }
        doc.push(Break::new(1));
    }

    doc.render_to_file(output_path)
        .map_err(|e| AnalysisError::Report(e.to_string()))?;

    info!("report written to {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::indicators::Trend;

    fn sample_indicators() -> IndicatorBlock {
        IndicatorBlock {
            symbol: "TEST".to_string(),
            latest_close: 123.45,
            week52_high: 150.0,
            week52_low: 90.0,
            ma_short: Some(120.0),
            ma_long: Some(110.0),
            ytd_change: Some(10.0),
            ytd_change_pct: Some(8.8),
            annualized_volatility: Some(0.25),
            trend: Trend::Upward,
        }
    }

    #[test]
    fn test_font_discovery_returns_existing_path_or_none() {
        if let Some(path) = find_report_font() {
            assert!(path.exists());
        }
    }

    #[test]
    #[ignore] // Requires a candidate font on the machine
    fn test_render_pdf_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");

        let sections = ReportSections::parse(
            "[Company Profile]\n- Test company\n[Recommendation]\n- Buy",
        );
        let indicators = sample_indicators();
        let context = ReportContext {
            ticker: "TEST",
            indicators: &indicators,
            chart_path: None,
            sections: &sections,
        };

        render_pdf(&context, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"%PDF");
    }
}
