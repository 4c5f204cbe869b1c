use crate::error::{Result, SinkError};
use crate::model::{AssetRecord, Snapshot};
use async_trait::async_trait;

/// Trait for types that can produce the latest raw payload.
///
/// Implementors swallow transport problems: a failed fetch is logged and
/// reported as `None`, and the next scheduled cycle simply tries again.
#[async_trait]
pub trait PayloadSource: Send + Sync {
    /// Fetches the payload body verbatim, or `None` if nothing usable arrived.
    async fn fetch(&self) -> Option<Vec<u8>>;
}

/// Trait for independent persistence destinations of an accepted snapshot.
///
/// Each sink owns its store exclusively. A failure in one sink never stops
/// the others from being written.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Persists one accepted snapshot and the records extracted from it.
    async fn write(&self, snapshot: &Snapshot, records: &[AssetRecord]) -> Result<(), SinkError>;
}
