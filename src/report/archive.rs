use crate::error::{ConfigError, Result, SinkError};
use crate::model::{AssetRecord, ReportSink, Snapshot};
use crate::report::naming::archive_name;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// What to do when the raw archive directory does not exist.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DirectoryPolicy {
    /// Create the directory (and parents) on demand
    Create,
    /// Treat a missing directory as a configuration error
    Require,
}

impl DirectoryPolicy {
    pub fn from_create_flag(create: bool) -> Self {
        if create {
            DirectoryPolicy::Create
        } else {
            DirectoryPolicy::Require
        }
    }

    /// Startup check, run before the first cycle.
    pub fn validate(&self, dir: &Path) -> Result<(), ConfigError> {
        if *self == DirectoryPolicy::Require && !dir.is_dir() {
            return Err(ConfigError::invalid(
                "archive_dir",
                format!("{} does not exist", dir.display()),
            ));
        }
        Ok(())
    }
}

/// Stores every accepted payload as its own file in a directory.
#[derive(Debug, Clone)]
pub struct RawArchiveSink {
    dir: PathBuf,
    prefix: String,
    policy: DirectoryPolicy,
}

impl RawArchiveSink {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, policy: DirectoryPolicy) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            policy,
        }
    }

    fn ensure_dir(&self) -> Result<(), SinkError> {
        if self.dir.is_dir() {
            return Ok(());
        }
        match self.policy {
            DirectoryPolicy::Create => {
                tracing::info!("Creating archive directory: {}", self.dir.display());
                std::fs::create_dir_all(&self.dir)
                    .map_err(|e| SinkError::io(self.dir.display().to_string(), e))
            }
            DirectoryPolicy::Require => {
                Err(SinkError::missing_directory(self.dir.display().to_string()))
            }
        }
    }

    fn store(&self, name: &str, body: &[u8]) -> Result<(), SinkError> {
        self.ensure_dir()?;

        let path = self.dir.join(name);
        std::fs::write(&path, body).map_err(|e| SinkError::io(path.display().to_string(), e))?;

        tracing::info!("Saved raw prices to file: {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl ReportSink for RawArchiveSink {
    fn name(&self) -> &str {
        "archive"
    }

    async fn write(&self, snapshot: &Snapshot, _records: &[AssetRecord]) -> Result<(), SinkError> {
        let sink = self.clone();
        let name = archive_name(&self.prefix, snapshot.captured_at());
        let body = snapshot.body().to_vec();
        tokio::task::spawn_blocking(move || sink.store(&name, &body)).await?
    }
}
