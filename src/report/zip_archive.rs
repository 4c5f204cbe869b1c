use crate::error::{Result, SinkError};
use crate::model::{AssetRecord, ReportSink, Snapshot};
use crate::report::naming::archive_name;
use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Appends every accepted payload as a deflated member of one zip container.
///
/// Existing members are never rewritten or removed. A member name that is
/// already present (two snapshots in the same second) fails the write.
#[derive(Debug, Clone)]
pub struct CompressedArchiveSink {
    path: PathBuf,
    prefix: String,
}

impl CompressedArchiveSink {
    pub fn new(path: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            prefix: prefix.into(),
        }
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn append(&self, name: &str, body: &[u8]) -> Result<(), SinkError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| SinkError::io(self.display_path(), e))?;
        let existing = file
            .metadata()
            .map_err(|e| SinkError::io(self.display_path(), e))?
            .len();

        let mut archive = if existing == 0 {
            ZipWriter::new(file)
        } else {
            ZipWriter::new_append(file)?
        };

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        archive.start_file(name, options)?;
        archive
            .write_all(body)
            .map_err(|e| SinkError::io(self.display_path(), e))?;
        archive.finish()?;

        tracing::info!(member = %name, "Saved raw prices to zip archive: {}", self.display_path());
        Ok(())
    }
}

#[async_trait]
impl ReportSink for CompressedArchiveSink {
    fn name(&self) -> &str {
        "zip"
    }

    async fn write(&self, snapshot: &Snapshot, _records: &[AssetRecord]) -> Result<(), SinkError> {
        let sink = self.clone();
        let name = archive_name(&self.prefix, snapshot.captured_at());
        let body = snapshot.body().to_vec();
        tokio::task::spawn_blocking(move || sink.append(&name, &body)).await?
    }
}
