use crate::error::{Result, SinkError};
use crate::model::{AssetRecord, FieldSet, ReportSink, Snapshot};
use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Append-only CSV summary with one row per asset per snapshot.
#[derive(Debug, Clone)]
pub struct CumulativeTableSink {
    path: PathBuf,
    header: Vec<String>,
}

impl CumulativeTableSink {
    pub fn new(path: impl Into<PathBuf>, fields: &FieldSet) -> Self {
        Self {
            path: path.into(),
            header: fields.header(),
        }
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    /// The header is written only to a missing or empty file.
    fn needs_header(&self) -> Result<bool, SinkError> {
        match std::fs::metadata(&self.path) {
            Ok(metadata) => Ok(metadata.len() == 0),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
            Err(e) => Err(SinkError::io(self.display_path(), e)),
        }
    }

    fn append(&self, rows: &[Vec<String>]) -> Result<(), SinkError> {
        let needs_header = self.needs_header()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SinkError::io(self.display_path(), e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(&self.header)?;
        }
        for row in rows {
            writer.write_record(row)?;
        }
        writer
            .flush()
            .map_err(|e| SinkError::io(self.display_path(), e))?;

        tracing::info!(rows = rows.len(), "Saved prices to csv file: {}", self.display_path());
        Ok(())
    }
}

#[async_trait]
impl ReportSink for CumulativeTableSink {
    fn name(&self) -> &str {
        "csv"
    }

    async fn write(&self, _snapshot: &Snapshot, records: &[AssetRecord]) -> Result<(), SinkError> {
        let sink = self.clone();
        let rows: Vec<Vec<String>> = records.iter().map(AssetRecord::to_row).collect();
        tokio::task::spawn_blocking(move || sink.append(&rows)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DerivedField, FieldValue};
    use crate::test_utils::fixtures::dates::capture_time;
    use tempfile::tempdir;

    fn records(ids: &[i64]) -> Vec<AssetRecord> {
        ids.iter()
            .map(|&id| {
                AssetRecord::new(
                    id,
                    format!("Driver, {}", id),
                    10.5,
                    vec![FieldValue::Integer(id * 2)],
                    capture_time(),
                )
            })
            .collect()
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(b"{}".to_vec(), capture_time())
    }

    mod succeeds {
        use super::*;

        #[tokio::test]
        async fn test_header_written_once_and_rows_accumulate() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("prices.csv");
            let sink = CumulativeTableSink::new(&path, &FieldSet::new(vec![DerivedField::Sentiment]));

            // N = 3 snapshots of M = 4 assets
            for _ in 0..3 {
                sink.write(&snapshot(), &records(&[4, 1, 3, 2])).await.unwrap();
            }

            let mut reader = csv::Reader::from_path(&path).unwrap();
            let header = reader.headers().unwrap().clone();
            assert_eq!(
                header.iter().collect::<Vec<_>>(),
                vec!["id", "name", "price", "sentiment", "datetime", "timestamp"]
            );

            let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
            assert_eq!(rows.len(), 12);
            let ids: Vec<&str> = rows.iter().map(|r| r.get(0).unwrap()).collect();
            assert_eq!(
                ids,
                vec!["4", "1", "3", "2", "4", "1", "3", "2", "4", "1", "3", "2"]
            );

            let content = std::fs::read_to_string(&path).unwrap();
            assert_eq!(content.matches("id,name,price").count(), 1);
        }

        #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
        async fn test_writes_from_worker_threads() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("prices.csv");
            let sink = CumulativeTableSink::new(&path, &FieldSet::new(vec![DerivedField::Sentiment]));

            let handle = tokio::spawn({
                let sink = sink.clone();
                async move { sink.write(&snapshot(), &records(&[1, 2])).await }
            });
            handle.await.unwrap().unwrap();
            sink.write(&snapshot(), &records(&[3])).await.unwrap();

            let mut reader = csv::Reader::from_path(&path).unwrap();
            assert_eq!(reader.records().count(), 3);
        }

        #[tokio::test]
        async fn test_row_contents_are_quoted() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("prices.csv");
            let sink = CumulativeTableSink::new(&path, &FieldSet::new(vec![DerivedField::Sentiment]));

            sink.write(&snapshot(), &records(&[7])).await.unwrap();

            let content = std::fs::read_to_string(&path).unwrap();
            let line = content.lines().nth(1).unwrap();
            assert_eq!(
                line,
                format!(
                    "7,\"Driver, 7\",10.5,14,2022-03-20 14:05:09,{}",
                    capture_time().timestamp()
                )
            );
        }

        #[tokio::test]
        async fn test_empty_existing_file_gets_header() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("prices.csv");
            std::fs::write(&path, "").unwrap();
            let sink = CumulativeTableSink::new(&path, &FieldSet::default());

            sink.write(&snapshot(), &[]).await.unwrap();

            let content = std::fs::read_to_string(&path).unwrap();
            assert_eq!(content, "id,name,price,datetime,timestamp\n");
        }

        #[tokio::test]
        async fn test_existing_rows_are_never_rewritten() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("prices.csv");
            std::fs::write(&path, "id,name,price,datetime,timestamp\nold,row,1,x,0\n").unwrap();
            let sink = CumulativeTableSink::new(&path, &FieldSet::default());

            sink.write(&snapshot(), &[]).await.unwrap();

            let content = std::fs::read_to_string(&path).unwrap();
            assert_eq!(content, "id,name,price,datetime,timestamp\nold,row,1,x,0\n");
        }
    }

    mod fails {
        use super::*;

        #[tokio::test]
        async fn test_missing_parent_directory() {
            let dir = tempdir().unwrap();
            let sink = CumulativeTableSink::new(
                dir.path().join("missing").join("prices.csv"),
                &FieldSet::default(),
            );

            let err = sink.write(&snapshot(), &records(&[1])).await.unwrap_err();
            assert!(matches!(err, SinkError::Io { .. }));
        }
    }
}
