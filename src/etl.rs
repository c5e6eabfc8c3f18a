//! The extract → transform → alert → buffer → flush loop.
//!
//! An [`Etl`] owns its batch buffer. A failed iteration appends nothing
//! and leaves the buffer as it was; a failed flush keeps every buffered
//! record so the next flush rewrites the whole batch.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::Result;
use crate::alerts::AlertTable;
use crate::config::{EtlConfig, FailurePolicy};
use crate::extract::{Extractor, HttpExtractor};
use crate::load::{CsvLoader, Loader};
use crate::models::SpreadRecord;
use crate::transform::transform;

/// Polling loop for a single book.
pub struct Etl<E, L> {
    book: String,
    extractor: E,
    loader: L,
    alerts: AlertTable,
    save_interval: usize,
    poll_interval: Duration,
    failure_policy: FailurePolicy,
    buffer: Vec<SpreadRecord>,
}

impl Etl<HttpExtractor, CsvLoader> {
    /// Builds a loop polling the configured HTTP endpoint and writing CSV
    /// partitions under the configured output directory.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::Config`](crate::EtlError::Config) if the HTTP
    /// client cannot be built.
    pub fn from_config(book: impl Into<String>, config: &EtlConfig) -> Result<Self> {
        let extractor = HttpExtractor::new(config.api_url.clone())?;
        let loader = CsvLoader::new(config.output_dir.clone());

        Ok(Self::new(book, extractor, loader)
            .with_alerts(config.alerts.clone())
            .with_save_interval(config.save_interval)
            .with_poll_interval(config.poll_interval)
            .with_failure_policy(config.failure_policy))
    }
}

impl<E: Extractor, L: Loader> Etl<E, L> {
    /// Creates a loop with default intervals, thresholds and failure policy.
    pub fn new(book: impl Into<String>, extractor: E, loader: L) -> Self {
        let defaults = EtlConfig::default();
        Self {
            book: book.into(),
            extractor,
            loader,
            alerts: defaults.alerts,
            save_interval: defaults.save_interval,
            poll_interval: defaults.poll_interval,
            failure_policy: defaults.failure_policy,
            buffer: Vec::new(),
        }
    }

    pub fn with_alerts(mut self, alerts: AlertTable) -> Self {
        self.alerts = alerts;
        self
    }

    /// Sets the flush threshold. Values below one are treated as one.
    pub fn with_save_interval(mut self, save_interval: usize) -> Self {
        self.save_interval = save_interval.max(1);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Records waiting for the next flush, in arrival order.
    pub fn buffer(&self) -> &[SpreadRecord] {
        &self.buffer
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Runs one extract/transform/alert/buffer/flush pass without sleeping.
    ///
    /// Returns the written file when this pass flushed a batch.
    ///
    /// # Errors
    ///
    /// Propagates extraction, transform and flush failures. On error no
    /// record from this pass is buffered, except when the flush itself
    /// failed, in which case the buffer keeps every record.
    pub async fn run_once(&mut self) -> Result<Option<PathBuf>> {
        let payload = self.extractor.fetch(&self.book).await?;
        let snapshot = transform(&payload)?;

        self.alerts.check(&self.book, snapshot.spread_pct());

        let record = snapshot.into_record(&self.book);
        debug!(
            book = %self.book,
            bid = record.bid,
            ask = record.ask,
            spread = record.spread,
            "Buffered spread record"
        );
        self.buffer.push(record);

        if self.buffer.len() < self.save_interval {
            return Ok(None);
        }

        let path = self.loader.load(&self.book, &self.buffer)?;
        self.buffer.clear();
        Ok(Some(path))
    }

    /// Runs one iteration, logs any failure, then waits according to the
    /// outcome: the poll interval after success, the failure policy after
    /// an error.
    ///
    /// Returns `true` when the iteration succeeded.
    pub async fn step(&mut self) -> bool {
        match self.run_once().await {
            Ok(_) => {
                tokio::time::sleep(self.poll_interval).await;
                true
            }
            Err(e) => {
                error!(
                    book = %self.book,
                    buffered = self.buffer.len(),
                    error = %e,
                    "Error fetching data"
                );
                if let FailurePolicy::Backoff(delay) = self.failure_policy {
                    tokio::time::sleep(delay).await;
                }
                false
            }
        }
    }

    /// Polls forever. Errors are logged by [`step`](Self::step) and never
    /// stop the loop.
    pub async fn run(&mut self) {
        info!(book = %self.book, "Starting spread ETL for book={}", self.book);
        loop {
            self.step().await;
        }
    }
}
