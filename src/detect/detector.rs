use crate::detect::fingerprint::Fingerprint;
use crate::detect::store::FingerprintStore;
use crate::error::{Result, StoreError};

/// Decides whether a freshly fetched payload is new.
///
/// The previously accepted fingerprint is read from the store once, on the
/// first call, and kept in memory afterwards. Every accepted fingerprint is
/// written back to the store before `is_novel` reports it, so a crash during
/// fan-out cannot let the same payload through twice.
pub struct ChangeDetector {
    store: Box<dyn FingerprintStore>,
    allow_duplicates: bool,
    last: Option<Option<Fingerprint>>,
}

impl ChangeDetector {
    pub fn new(store: Box<dyn FingerprintStore>, allow_duplicates: bool) -> Self {
        Self {
            store,
            allow_duplicates,
            last: None,
        }
    }

    /// Returns `true` when `fingerprint` differs from the last accepted one,
    /// or unconditionally when duplicates are allowed.
    ///
    /// A novel fingerprint is persisted before returning.
    pub fn is_novel(&mut self, fingerprint: &Fingerprint) -> Result<bool, StoreError> {
        let last = self.last_accepted()?;

        if last.as_ref() == Some(fingerprint) && !self.allow_duplicates {
            tracing::info!(fingerprint = %fingerprint, "Duplicate content, skipping");
            return Ok(false);
        }

        if last.is_none() {
            tracing::debug!("No previous fingerprint, accepting payload");
        } else if last.as_ref() == Some(fingerprint) {
            tracing::debug!(fingerprint = %fingerprint, "Duplicate content accepted by override");
        }

        self.store.save(fingerprint.as_str())?;
        self.last = Some(Some(fingerprint.clone()));
        Ok(true)
    }

    fn last_accepted(&mut self) -> Result<Option<Fingerprint>, StoreError> {
        if let Some(last) = &self.last {
            return Ok(last.clone());
        }
        let loaded = self.store.load()?.map(Fingerprint::from_stored);
        self.last = Some(loaded.clone());
        Ok(loaded)
    }
}
