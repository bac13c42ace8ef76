//! Report assembly: section parsing and PDF rendering

pub mod pdf;
pub mod sections;

pub use pdf::{ReportContext, find_report_font, render_pdf};
pub use sections::{ReportSections, SECTION_TAGS, clean_bullet};
