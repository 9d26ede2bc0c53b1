// src/storage/mod.rs

//! Storage abstractions for snapshot persistence.
//!
//! Each collection run writes one delimited file per campaign under a
//! directory named after the collection date. Reports go to a separate
//! directory.
//!
//! ## Directory Structure
//!
//! ```text
//! data/
//! ├── 2025-09-26/
//! │   ├── Продажи_Коммерция_3дня_2025-09-26.csv
//! │   └── Закупки_Снабжение_Проекты_3дня_2025-09-26.csv
//! └── 2025-10-03/
//!     └── ...
//! report_dynamics/
//! ├── analysis_2025-10-03.json
//! └── dynamics_2025-09-26_2025-10-03.json
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::models::ListingRecord;
use crate::utils::delimited::{self, BOM};

// Re-export for convenience
pub use local::LocalStorage;

/// Cell separator of snapshot files.
pub const SEPARATOR: char = ';';

/// Metadata about a storage write operation.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Location of the written file
    pub path: String,
    /// Number of listing rows written
    pub rows: usize,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// One snapshot date and the files it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub date: NaiveDate,
    pub files: Vec<String>,
}

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Write one campaign's listings for a collection date, replacing any earlier file.
    async fn write_snapshot(
        &self,
        date: NaiveDate,
        file_label: &str,
        records: &[ListingRecord],
    ) -> Result<WriteMetadata>;

    /// Load every file of a snapshot date, concatenated in file name order.
    ///
    /// Fails with `SnapshotNotFound` when the date has no directory.
    async fn load_snapshot(&self, date: NaiveDate) -> Result<Vec<ListingRecord>>;

    /// Snapshot dates present, oldest first.
    async fn list_snapshots(&self) -> Result<Vec<SnapshotInfo>>;

    /// Write a named report; returns its location.
    async fn write_report(&self, name: &str, bytes: &[u8]) -> Result<String>;
}

/// Encode records as a snapshot file: BOM, header row, one row per record.
pub fn encode_snapshot(records: &[ListingRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.extend_from_slice(BOM.to_string().as_bytes());

    let header: Vec<String> = ListingRecord::HEADERS.iter().map(|h| h.to_string()).collect();
    delimited::write_row(&mut buf, &header, SEPARATOR)?;
    for record in records {
        delimited::write_row(&mut buf, &record.to_row(), SEPARATOR)?;
    }
    Ok(buf)
}

/// Decoded snapshot file content.
#[derive(Debug, Default)]
pub struct DecodedSnapshot {
    pub records: Vec<ListingRecord>,
    /// Rows with too few cells
    pub malformed: usize,
}

/// Decode a snapshot file, skipping the header and short rows.
pub fn decode_snapshot(text: &str) -> DecodedSnapshot {
    let mut decoded = DecodedSnapshot::default();
    for row in delimited::parse_rows(text, SEPARATOR) {
        if ListingRecord::is_header(&row) {
            continue;
        }
        match ListingRecord::from_row(&row) {
            Some(record) => decoded.records.push(record),
            None => decoded.malformed += 1,
        }
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> ListingRecord {
        ListingRecord {
            title: title.to_string(),
            employer: "ООО \"Ромашка\"".to_string(),
            url: "https://hh.ru/vacancy/1".to_string(),
            published: "2025-10-05 09:30".to_string(),
            when: "сегодня".to_string(),
            salary: "80,000–120,000 RUR".to_string(),
            query: "менеджер по продажам".to_string(),
        }
    }

    #[test]
    fn test_encode_starts_with_bom_and_header() {
        let bytes = encode_snapshot(&[record("Менеджер")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with('\u{feff}'));
        let first_line = text.trim_start_matches('\u{feff}').lines().next().unwrap();
        assert_eq!(
            first_line,
            "Название вакансии;Компания;Ссылка;Дата публикации;Когда;Зарплата;Запрос"
        );
    }

    #[test]
    fn test_decode_encoded_snapshot() {
        let records = vec![record("Менеджер; B2B"), record("Закупщик")];
        let text = String::from_utf8(encode_snapshot(&records).unwrap()).unwrap();
        let decoded = decode_snapshot(&text);
        assert_eq!(decoded.records, records);
        assert_eq!(decoded.malformed, 0);
    }

    #[test]
    fn test_decode_skips_short_rows() {
        let text = "\u{feff}Название вакансии;Компания;Ссылка;Дата публикации;Когда;Зарплата;Запрос\n\
                    a;b;c\n\
                    t;e;u;p;w;s;q\n";
        let decoded = decode_snapshot(text);
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.malformed, 1);
        assert_eq!(decoded.records[0].query, "q");
    }
}
