//! Result collector
//!
//! Accumulated turns are serialized to CSV the way downstream spreadsheet
//! tools expect them: UTF-8 with a byte-order mark, header written only on
//! the first write, appended without header thereafter. Missing optional
//! fields are written as empty cells.

use crate::error::Result;
use fincrew_team::Turn;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// UTF-8 byte-order mark, expected by spreadsheet imports
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// One output row of a batch transcript
#[derive(Debug, Clone)]
pub struct TranscriptRow {
    /// Source-table index of the batch's first record
    pub batch_start: usize,

    /// Source-table index of the batch's last record (inclusive)
    pub batch_end: usize,

    /// Participant that produced the turn
    pub source: String,

    /// Turn text
    pub content: String,

    /// Event kind the turn was decoded from
    pub kind: String,

    /// Input token count, when the service reported usage
    pub prompt_tokens: Option<usize>,

    /// Output token count, when the service reported usage
    pub completion_tokens: Option<usize>,
}

impl TranscriptRow {
    /// Column headers for transcript files
    pub const HEADERS: [&'static str; 7] = [
        "batch_start",
        "batch_end",
        "source",
        "content",
        "type",
        "prompt_tokens",
        "completion_tokens",
    ];

    /// Build a row from a turn, tagging it with its batch's record range
    pub fn from_turn(batch_start: usize, batch_end: usize, turn: &Turn) -> Self {
        Self {
            batch_start,
            batch_end,
            source: turn.source.clone(),
            content: turn.content.clone(),
            kind: "text".to_string(),
            prompt_tokens: turn.usage.map(|u| u.input_tokens),
            completion_tokens: turn.usage.map(|u| u.output_tokens),
        }
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.batch_start.to_string(),
            self.batch_end.to_string(),
            self.source.clone(),
            self.content.clone(),
            self.kind.clone(),
            self.prompt_tokens.map(|t| t.to_string()).unwrap_or_default(),
            self.completion_tokens
                .map(|t| t.to_string())
                .unwrap_or_default(),
        ]
    }
}

/// Create a CSV file with a UTF-8 BOM and write header plus rows
pub fn write_rows_with_bom<P, I>(path: P, headers: &[&str], rows: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Vec<String>>,
{
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Append rows to an existing CSV file, without header
pub fn append_rows<P, I>(path: P, rows: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Vec<String>>,
{
    let file = OpenOptions::new().append(true).open(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a full transcript in one shot
pub fn write_transcript(path: impl AsRef<Path>, rows: &[TranscriptRow]) -> Result<()> {
    write_rows_with_bom(
        path,
        &TranscriptRow::HEADERS,
        rows.iter().map(TranscriptRow::to_record),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fincrew_llm::TokenUsage;

    fn sample_turn(with_usage: bool) -> Turn {
        Turn {
            source: "data_agent".to_string(),
            content: "prices trended up".to_string(),
            usage: with_usage.then_some(TokenUsage {
                input_tokens: 11,
                output_tokens: 7,
            }),
        }
    }

    #[test]
    fn test_row_from_turn_with_usage() {
        let row = TranscriptRow::from_turn(0, 9, &sample_turn(true));
        assert_eq!(row.batch_start, 0);
        assert_eq!(row.batch_end, 9);
        assert_eq!(row.prompt_tokens, Some(11));
        assert_eq!(row.completion_tokens, Some(7));
    }

    #[test]
    fn test_missing_usage_serializes_empty() {
        let row = TranscriptRow::from_turn(10, 19, &sample_turn(false));
        let record = row.to_record();
        assert_eq!(record[5], "");
        assert_eq!(record[6], "");
    }

    #[test]
    fn test_write_then_append_keeps_single_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.csv");

        let first = TranscriptRow::from_turn(0, 9, &sample_turn(true));
        let second = TranscriptRow::from_turn(10, 19, &sample_turn(false));

        write_transcript(&path, std::slice::from_ref(&first)).unwrap();
        append_rows(&path, vec![second.to_record()]).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);

        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let header_lines = text
            .lines()
            .filter(|line| line.starts_with("batch_start"))
            .count();
        assert_eq!(header_lines, 1);
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_empty_transcript_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_transcript(&path, &[]).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.starts_with("batch_start,batch_end,source"));
    }
}
