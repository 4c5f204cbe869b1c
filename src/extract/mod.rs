//! Snapshot extraction: payload bytes to normalized asset records.

mod baseline;
mod extractor;
mod payload;

pub use baseline::SelectionBaseline;
pub use extractor::SnapshotExtractor;
