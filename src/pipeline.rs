//! One fetch → detect → extract → fan-out cycle.

use crate::detect::ChangeDetector;
use crate::extract::SnapshotExtractor;
use crate::model::{PayloadSource, ReportSink, Snapshot};
use crate::report::{fan_out, FanOutSummary};
use chrono::Local;
use tokio_util::sync::CancellationToken;

/// How a single cycle ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CycleOutcome {
    /// Interrupted before any sink was touched
    Cancelled,
    /// Transport failure or non-success status
    FetchFailed,
    /// Payload identical to the last accepted one
    Duplicate,
    /// Fingerprint store or extraction failure; nothing written
    Rejected,
    /// Sinks ran; some may have failed
    Completed(FanOutSummary),
}

pub struct Pipeline {
    source: Box<dyn PayloadSource>,
    detector: ChangeDetector,
    extractor: SnapshotExtractor,
    sinks: Vec<Box<dyn ReportSink>>,
    embed_metadata: bool,
}

impl Pipeline {
    pub fn new(
        source: Box<dyn PayloadSource>,
        detector: ChangeDetector,
        extractor: SnapshotExtractor,
        sinks: Vec<Box<dyn ReportSink>>,
    ) -> Self {
        Self {
            source,
            detector,
            extractor,
            sinks,
            embed_metadata: false,
        }
    }

    /// Inject capture time and checksum into accepted payloads before they
    /// reach the extractor and archives.
    pub fn with_embedded_metadata(mut self, embed: bool) -> Self {
        self.embed_metadata = embed;
        self
    }

    /// Runs one cycle.
    ///
    /// Only the fetch can be interrupted by `cancel`; once a payload is
    /// accepted the sinks are always run to completion.
    pub async fn run_cycle(&mut self, cancel: &CancellationToken) -> CycleOutcome {
        let body = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Fetch interrupted, abandoning cycle");
                return CycleOutcome::Cancelled;
            }
            body = self.source.fetch() => body,
        };

        let Some(body) = body else {
            return CycleOutcome::FetchFailed;
        };

        let snapshot = Snapshot::new(body, Local::now());
        match self.detector.is_novel(snapshot.fingerprint()) {
            Ok(true) => {}
            Ok(false) => return CycleOutcome::Duplicate,
            Err(e) => {
                tracing::error!("Failed to check fingerprint: {}", e);
                return CycleOutcome::Rejected;
            }
        }

        let snapshot = if self.embed_metadata {
            snapshot.with_embedded_metadata()
        } else {
            snapshot
        };

        let records = match self.extractor.extract(&snapshot) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(fingerprint = %snapshot.fingerprint(), "Rejected snapshot: {}", e);
                return CycleOutcome::Rejected;
            }
        };
        tracing::debug!(assets = records.len(), "Extracted snapshot");

        let summary = fan_out(&self.sinks, &snapshot, &records).await;
        tracing::info!(
            written = summary.written,
            failed = summary.failed,
            "Cycle complete"
        );
        CycleOutcome::Completed(summary)
    }
}
