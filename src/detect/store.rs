use crate::error::{Result, StoreError};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Single-slot durable storage for the last accepted fingerprint.
///
/// Holds at most one digest. `save` overwrites whatever was there.
pub trait FingerprintStore: Send {
    /// Returns the stored digest, or `None` on cold start.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replaces the stored digest.
    fn save(&self, digest: &str) -> Result<(), StoreError>;
}

/// Plain-text file holding exactly one digest string.
#[derive(Debug, Clone)]
pub struct FileFingerprintStore {
    path: PathBuf,
}

impl FileFingerprintStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

impl FingerprintStore for FileFingerprintStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let digest = content.trim();
                if digest.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(digest.to_string()))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::read(self.display_path(), e)),
        }
    }

    fn save(&self, digest: &str) -> Result<(), StoreError> {
        std::fs::write(&self.path, digest).map_err(|e| StoreError::write(self.display_path(), e))
    }
}
