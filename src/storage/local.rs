// src/storage/local.rs

//! Local filesystem storage implementation.
//!
//! ## Storage Layout
//!
//! ```text
//! {data_dir}/
//! └── YYYY-MM-DD/
//!     └── {file_label}_YYYY-MM-DD.csv
//! {report_dir}/
//! └── *.json
//! ```
//!
//! Every write goes to a temporary file first and is renamed into place,
//! so an interrupted run never leaves a partial snapshot behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ListingRecord;
use crate::storage::{
    SnapshotInfo, SnapshotStorage, WriteMetadata, decode_snapshot, encode_snapshot,
};

const SNAPSHOT_EXTENSION: &str = "csv";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    data_dir: PathBuf,
    report_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage with separate snapshot and report roots.
    pub fn new(data_dir: impl Into<PathBuf>, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            report_dir: report_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding one snapshot date.
    fn snapshot_dir(&self, date: NaiveDate) -> PathBuf {
        self.data_dir.join(date.format("%Y-%m-%d").to_string())
    }

    /// File name for a campaign's snapshot on a date.
    fn snapshot_file_name(file_label: &str, date: NaiveDate) -> String {
        format!("{}_{}.{}", file_label, date.format("%Y-%m-%d"), SNAPSHOT_EXTENSION)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.ensure_dir(path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Snapshot files in a directory, sorted by name.
    async fn snapshot_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_snapshot = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SNAPSHOT_EXTENSION));
            if is_snapshot && entry.file_type().await?.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl SnapshotStorage for LocalStorage {
    async fn write_snapshot(
        &self,
        date: NaiveDate,
        file_label: &str,
        records: &[ListingRecord],
    ) -> Result<WriteMetadata> {
        if file_label.trim().is_empty() {
            return Err(AppError::validation("snapshot file label is empty"));
        }
        let path = self
            .snapshot_dir(date)
            .join(Self::snapshot_file_name(file_label, date));

        let bytes = encode_snapshot(records)?;
        self.write_bytes(&path, &bytes).await?;
        log::info!("Wrote {} rows to {}", records.len(), path.display());

        Ok(WriteMetadata {
            path: path.display().to_string(),
            rows: records.len(),
            timestamp: Utc::now(),
        })
    }

    async fn load_snapshot(&self, date: NaiveDate) -> Result<Vec<ListingRecord>> {
        let dir = self.snapshot_dir(date);
        if !tokio::fs::try_exists(&dir).await? {
            return Err(AppError::SnapshotNotFound { date, path: dir });
        }

        let mut records = Vec::new();
        for file in Self::snapshot_files(&dir).await? {
            let bytes = tokio::fs::read(&file).await?;
            let text = String::from_utf8_lossy(&bytes);
            let decoded = decode_snapshot(&text);
            if decoded.malformed > 0 {
                log::warn!(
                    "Skipped {} malformed rows in {}",
                    decoded.malformed,
                    file.display()
                );
            }
            log::debug!("Loaded {} rows from {}", decoded.records.len(), file.display());
            records.extend(decoded.records);
        }
        Ok(records)
    }

    async fn list_snapshots(&self) -> Result<Vec<SnapshotInfo>> {
        let mut entries = match tokio::fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Data directory {} not found", self.data_dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut snapshots = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let Ok(date) = NaiveDate::parse_from_str(&name, "%Y-%m-%d") else {
                continue;
            };
            let files = Self::snapshot_files(&entry.path())
                .await?
                .iter()
                .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect();
            snapshots.push(SnapshotInfo { date, files });
        }
        snapshots.sort_by_key(|s| s.date);
        Ok(snapshots)
    }

    async fn write_report(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let path = self.report_dir.join(name);
        self.write_bytes(&path, bytes).await?;
        log::info!("Report written to {}", path.display());
        Ok(path.display().to_string())
    }
}
