//! Model definitions for price snapshots and report rows.
//!
//! This module provides the data structures that flow through a scrape
//! cycle and the traits implemented by payload sources and report sinks.

pub mod fields;
pub mod record;
pub mod snapshot;
pub mod traits;

// Re-export commonly used items at the module level
pub use fields::{DerivedField, FieldSet};
pub use record::{round1, AssetRecord, FieldValue};
pub use snapshot::Snapshot;
pub use traits::{PayloadSource, ReportSink};
