//! Mock payload sources and report sinks.

use crate::detect::store::FingerprintStore;
use crate::error::{Result, SinkError, StoreError};
use crate::model::{AssetRecord, PayloadSource, ReportSink, Snapshot};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A source that replays a fixed queue of fetch results, then returns `None`.
pub struct SequenceSource {
    results: Mutex<VecDeque<Option<Vec<u8>>>>,
    call_count: Arc<AtomicUsize>,
}

impl SequenceSource {
    pub fn new(results: Vec<Option<Vec<u8>>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source that returns the same payload every time.
    pub fn repeating(body: Vec<u8>, times: usize) -> Self {
        Self::new(vec![Some(body); times])
    }

    /// Shared counter of fetch calls, readable after the source is boxed.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait]
impl PayloadSource for SequenceSource {
    async fn fetch(&self) -> Option<Vec<u8>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.results.lock().unwrap().pop_front().flatten()
    }
}

/// A source whose fetch never completes.
pub struct PendingSource;

#[async_trait]
impl PayloadSource for PendingSource {
    async fn fetch(&self) -> Option<Vec<u8>> {
        std::future::pending::<()>().await;
        None
    }
}

/// What a [`RecordingSink`] saw on one write.
#[derive(Debug, Clone)]
pub struct RecordedWrite {
    pub body: Vec<u8>,
    pub ids: Vec<i64>,
}

/// A sink that remembers every write it received.
#[derive(Clone, Default)]
pub struct RecordingSink {
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl ReportSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn write(&self, snapshot: &Snapshot, records: &[AssetRecord]) -> Result<(), SinkError> {
        self.writes.lock().unwrap().push(RecordedWrite {
            body: snapshot.body().to_vec(),
            ids: records.iter().map(|r| r.id).collect(),
        });
        Ok(())
    }
}

/// A sink that always fails, counting its attempts.
#[derive(Clone, Default)]
pub struct FailingSink {
    attempts: Arc<AtomicUsize>,
}

impl FailingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    async fn write(&self, _snapshot: &Snapshot, _records: &[AssetRecord]) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::io(
            "/dev/full",
            std::io::Error::new(std::io::ErrorKind::Other, "no space left on device"),
        ))
    }
}

/// Lets a test keep a handle on a store after boxing it into a detector.
impl<S: FingerprintStore + Sync> FingerprintStore for Arc<S> {
    fn load(&self) -> Result<Option<String>, StoreError> {
        (**self).load()
    }

    fn save(&self, digest: &str) -> Result<(), StoreError> {
        (**self).save(digest)
    }
}

/// In-process fingerprint store.
#[derive(Debug, Default)]
pub struct MemoryFingerprintStore {
    slot: Mutex<Option<String>>,
}

impl MemoryFingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_digest(digest: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(digest.into())),
        }
    }
}

impl FingerprintStore for MemoryFingerprintStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, digest: &str) -> Result<(), StoreError> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(digest.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::dates::capture_time;

    #[test]
    fn test_memory_store() {
        let store = MemoryFingerprintStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.save("x").unwrap();
        assert_eq!(store.load().unwrap(), Some("x".to_string()));

        let seeded = Arc::new(MemoryFingerprintStore::with_digest("seed"));
        let shared = Arc::clone(&seeded);
        shared.save("next").unwrap();
        assert_eq!(seeded.load().unwrap(), Some("next".to_string()));
    }

    #[tokio::test]
    async fn test_sequence_source_replays_then_runs_dry() {
        let source = SequenceSource::new(vec![Some(b"a".to_vec()), None, Some(b"b".to_vec())]);
        assert_eq!(source.fetch().await, Some(b"a".to_vec()));
        assert_eq!(source.fetch().await, None);
        assert_eq!(source.fetch().await, Some(b"b".to_vec()));
        assert_eq!(source.fetch().await, None);
        assert_eq!(source.call_counter().load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_recording_sink_shares_state_across_clones() {
        let sink = RecordingSink::new();
        let clone = sink.clone();
        let snapshot = Snapshot::new(b"{}".to_vec(), capture_time());

        clone.write(&snapshot, &[]).await.unwrap();
        assert_eq!(sink.write_count(), 1);
        assert_eq!(sink.writes()[0].body, b"{}".to_vec());
    }

    #[tokio::test]
    async fn test_failing_sink_counts_attempts() {
        let sink = FailingSink::new();
        let snapshot = Snapshot::new(b"{}".to_vec(), capture_time());

        assert!(sink.write(&snapshot, &[]).await.is_err());
        assert_eq!(sink.attempts(), 1);
    }
}
