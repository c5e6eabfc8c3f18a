//! Order book spread poller.
//!
//! Polls a public REST order book for one book, derives the best bid, best
//! ask and spread percentage, warns when the spread crosses configured
//! thresholds, and flushes batches of records to date-partitioned CSV files.

pub mod alerts;
pub mod config;
pub mod error;
pub mod etl;
pub mod extract;
pub mod load;
pub mod models;
pub mod transform;

pub use error::{EtlError, Result};
