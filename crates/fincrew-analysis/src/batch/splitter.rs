//! Batch splitter
//!
//! Partitions an ordered record sequence into contiguous, non-overlapping
//! slices covering every record exactly once; the last slice may be
//! shorter. Batch order is the insertion order of the source table.

use crate::error::{AnalysisError, Result};
use crate::records::RecordTable;

/// A contiguous slice of records processed as one unit
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// Zero-based position of this batch in split order
    pub index: usize,

    /// Index of the batch's first record in the source table
    pub start: usize,

    /// The records in this batch
    pub rows: &'a [Vec<String>],
}

impl Batch<'_> {
    /// Number of records in the batch
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the batch is empty (never true for splitter output)
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the batch's last record in the source table (inclusive)
    pub fn end(&self) -> usize {
        self.start + self.rows.len().saturating_sub(1)
    }
}

/// Lazy iterator over the batches of a record sequence
#[derive(Debug)]
pub struct Batches<'a> {
    rows: &'a [Vec<String>],
    chunk_size: usize,
    index: usize,
    offset: usize,
}

impl<'a> Iterator for Batches<'a> {
    type Item = Batch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.rows.len() {
            return None;
        }

        let end = (self.offset + self.chunk_size).min(self.rows.len());
        let batch = Batch {
            index: self.index,
            start: self.offset,
            rows: &self.rows[self.offset..end],
        };

        self.index += 1;
        self.offset = end;
        Some(batch)
    }
}

/// Split rows into batches of at most `chunk_size` records
///
/// A chunk size of zero fails fast with [`AnalysisError::InvalidChunkSize`].
pub fn split(rows: &[Vec<String>], chunk_size: usize) -> Result<Batches<'_>> {
    if chunk_size == 0 {
        return Err(AnalysisError::InvalidChunkSize);
    }

    Ok(Batches {
        rows,
        chunk_size,
        index: 0,
        offset: 0,
    })
}

impl RecordTable {
    /// Split this table's records into batches of at most `chunk_size`
    pub fn batches(&self, chunk_size: usize) -> Result<Batches<'_>> {
        split(self.rows(), chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Vec<String>> {
        (0..n).map(|i| vec![i.to_string()]).collect()
    }

    #[test]
    fn test_partition_covers_input_exactly() {
        let rows = rows(25);
        let batches: Vec<_> = split(&rows, 10).unwrap().collect();

        assert_eq!(batches.len(), 3);
        assert_eq!(
            batches.iter().map(Batch::len).collect::<Vec<_>>(),
            [10, 10, 5]
        );

        // Concatenation in batch order reproduces the original sequence
        let rebuilt: Vec<&Vec<String>> =
            batches.iter().flat_map(|b| b.rows.iter()).collect();
        assert_eq!(rebuilt.len(), rows.len());
        for (original, got) in rows.iter().zip(rebuilt) {
            assert_eq!(original, got);
        }
    }

    #[test]
    fn test_batch_count_is_ceiling() {
        for (n, c, expected) in [(25, 10, 3), (30, 10, 3), (1, 10, 1), (10, 3, 4)] {
            let rows = rows(n);
            assert_eq!(split(&rows, c).unwrap().count(), expected, "n={n} c={c}");
        }
    }

    #[test]
    fn test_index_ranges_are_contiguous() {
        let rows = rows(25);
        let batches: Vec<_> = split(&rows, 10).unwrap().collect();

        assert_eq!((batches[0].start, batches[0].end()), (0, 9));
        assert_eq!((batches[1].start, batches[1].end()), (10, 19));
        assert_eq!((batches[2].start, batches[2].end()), (20, 24));
        assert_eq!(
            batches.iter().map(|b| b.index).collect::<Vec<_>>(),
            [0, 1, 2]
        );
    }

    #[test]
    fn test_chunk_size_at_least_input_yields_one_batch() {
        let rows = rows(7);
        let batches: Vec<_> = split(&rows, 7).unwrap().collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 7);

        let batches: Vec<_> = split(&rows, 100).unwrap().collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 7);
    }

    #[test]
    fn test_empty_input_yields_no_batches() {
        let rows: Vec<Vec<String>> = Vec::new();
        assert_eq!(split(&rows, 10).unwrap().count(), 0);
    }

    #[test]
    fn test_zero_chunk_size_fails_fast() {
        let rows = rows(5);
        assert!(matches!(
            split(&rows, 0),
            Err(AnalysisError::InvalidChunkSize)
        ));
    }
}
