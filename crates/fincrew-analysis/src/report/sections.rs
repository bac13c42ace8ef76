//! Tagged-section parsing
//!
//! The summarization step returns text organized under bracketed section
//! tags. A line-oriented pass assigns each line to the most recent tag;
//! lines before the first tag are ignored, and sections missing from the
//! text stay empty.

/// Section tags, in report order, with their display titles
pub const SECTION_TAGS: [(&str, &str); 5] = [
    ("[Company Profile]", "1. Company Profile"),
    ("[Industry Overview]", "2. Industry Overview"),
    ("[Financial Summary]", "3. Financial Summary"),
    ("[News Digest]", "4. News Digest"),
    ("[Recommendation]", "5. Recommendation"),
];

/// Bullet lists for the five report sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSections {
    pub company: Vec<String>,
    pub industry: Vec<String>,
    pub financials: Vec<String>,
    pub news: Vec<String>,
    pub recommendation: Vec<String>,
}

impl ReportSections {
    /// Parse tagged text into sections
    pub fn parse(text: &str) -> Self {
        let mut sections = Self::default();
        let mut current: Option<usize> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(index) = SECTION_TAGS.iter().position(|(tag, _)| line.contains(tag)) {
                current = Some(index);
                // Tag lines sometimes carry content after the colon
                let rest = line
                    .split_once(':')
                    .map(|(_, rest)| rest.trim())
                    .unwrap_or("");
                if !rest.is_empty() {
                    sections.section_mut(index).push(clean_bullet(rest));
                }
                continue;
            }

            if let Some(index) = current {
                sections.section_mut(index).push(clean_bullet(line));
            }
        }

        sections
    }

    fn section_mut(&mut self, index: usize) -> &mut Vec<String> {
        match index {
            0 => &mut self.company,
            1 => &mut self.industry,
            2 => &mut self.financials,
            3 => &mut self.news,
            _ => &mut self.recommendation,
        }
    }

    /// Sections paired with their display titles, in report order
    pub fn titled(&self) -> [(&'static str, &[String]); 5] {
        [
            (SECTION_TAGS[0].1, &self.company),
            (SECTION_TAGS[1].1, &self.industry),
            (SECTION_TAGS[2].1, &self.financials),
            (SECTION_TAGS[3].1, &self.news),
            (SECTION_TAGS[4].1, &self.recommendation),
        ]
    }

    /// Whether every section is empty
    pub fn is_empty(&self) -> bool {
        self.titled().iter().all(|(_, items)| items.is_empty())
    }
}

/// Strip leading list markers and surrounding whitespace from a line
pub fn clean_bullet(line: &str) -> String {
    line.trim_start_matches(['-', '*', '•', ' ']).trim().to_string()
}
