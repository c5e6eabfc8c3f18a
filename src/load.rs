//! Partitioned CSV persistence for spread batches.
//!
//! Each flush writes exactly one new file under
//! `book={book}/year=YYYY/month=MM/day=DD/{book}_YYYYMMDDHHMMSS.csv`,
//! relative to the loader's root directory. Two flushes within the same
//! UTC second target the same file name; the later one replaces the
//! earlier.

use std::fs::File;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::Result;
use crate::error::EtlError;
use crate::models::SpreadRecord;

/// Sink for completed batches.
pub trait Loader {
    /// Persists `records` for `book`, returning where they were written.
    fn load(&mut self, book: &str, records: &[SpreadRecord]) -> Result<PathBuf>;
}

/// Writes batches as date-partitioned CSV files.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    root: PathBuf,
}

impl CsvLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes `records` to the partition for `now`.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::Persistence`] if the partition directory or file
    /// cannot be created, or [`EtlError::Csv`] if a row cannot be written.
    pub fn load_at(
        &self,
        book: &str,
        records: &[SpreadRecord],
        now: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let dir = self.root.join(partition_dir(book, now));
        std::fs::create_dir_all(&dir).map_err(|source| EtlError::Persistence {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(file_name(book, now));
        let file = File::create(&path).map_err(|source| EtlError::Persistence {
            path: path.clone(),
            source,
        })?;

        // Header comes from the first serialized record's field names.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(file);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(|source| EtlError::Persistence {
            path: path.clone(),
            source,
        })?;

        info!(book, rows = records.len(), path = %path.display(), "Flushed batch");
        Ok(path)
    }
}

impl Loader for CsvLoader {
    fn load(&mut self, book: &str, records: &[SpreadRecord]) -> Result<PathBuf> {
        self.load_at(book, records, Utc::now())
    }
}

/// Partition directory for `book` at `now`, relative to the output root.
pub fn partition_dir(book: &str, now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!("book={book}"))
        .join(now.format("year=%Y").to_string())
        .join(now.format("month=%m").to_string())
        .join(now.format("day=%d").to_string())
}

/// File name for a batch of `book` flushed at `now`.
pub fn file_name(book: &str, now: DateTime<Utc>) -> String {
    format!("{book}_{}.csv", now.format("%Y%m%d%H%M%S"))
}
