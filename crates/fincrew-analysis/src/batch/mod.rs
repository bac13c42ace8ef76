//! Chunked batch-processing pipeline
//!
//! The one pattern repeated across the analysis flows: split a table into
//! fixed-size batches, render each into a prompt, hand it to a team run,
//! and collect the turns back into one ordered transcript.

pub mod collector;
pub mod runner;
pub mod splitter;

pub use collector::{TranscriptRow, append_rows, write_rows_with_bom, write_transcript};
pub use runner::BatchRunner;
pub use splitter::{Batch, Batches, split};
