//! Report sinks and the fan-out that feeds them.

mod archive;
mod naming;
mod table;
mod zip_archive;

pub use archive::{DirectoryPolicy, RawArchiveSink};
pub use table::CumulativeTableSink;
pub use zip_archive::CompressedArchiveSink;

use crate::model::{AssetRecord, ReportSink, Snapshot};

/// Per-cycle tally of sink outcomes.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct FanOutSummary {
    pub written: usize,
    pub failed: usize,
}

/// Hands one accepted snapshot to every sink, in order.
///
/// A failing sink is logged and counted; the remaining sinks still run.
pub async fn fan_out(
    sinks: &[Box<dyn ReportSink>],
    snapshot: &Snapshot,
    records: &[AssetRecord],
) -> FanOutSummary {
    let mut summary = FanOutSummary::default();

    for sink in sinks {
        match sink.write(snapshot, records).await {
            Ok(()) => {
                tracing::debug!(sink = sink.name(), "Sink write succeeded");
                summary.written += 1;
            }
            Err(e) => {
                tracing::error!(sink = sink.name(), "Failed to write report: {}", e);
                summary.failed += 1;
            }
        }
    }

    summary
}
