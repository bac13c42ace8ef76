//! Tabular input records
//!
//! Input rows are treated as opaque ordered field/value mappings: the
//! pipelines never interpret a cell beyond rendering it into a prompt or
//! copying it into the output table.

use crate::error::Result;
use std::io::Read;
use std::path::Path;

/// An in-memory table of records read from a CSV file
#[derive(Debug, Clone)]
pub struct RecordTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RecordTable {
    /// Create a table from headers and rows
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a table from a CSV file
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Read a table from any CSV reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(ToString::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(ToString::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Column headers in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All rows in file order
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no records
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of one column, in row order; missing cells become empty
    pub fn column_values(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect()
    }
}

/// Render rows as human-readable field/value lines for a prompt
///
/// One line per record: `{Date: 2024-01-02, Close: 4742.83, ...}`.
pub fn render_field_values(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push('{');
        for (i, header) in headers.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(header);
            out.push_str(": ");
            out.push_str(row.get(i).map_or("", String::as_str));
        }
        out.push_str("}\n");
    }
    out
}
