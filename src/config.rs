//! Application configuration loaded from environment variables.
//!
//! Every variable is optional; empty values are treated as unset.
//! - `SPREAD_ETL_API_URL` — order book endpoint
//! - `SPREAD_ETL_POLL_INTERVAL_SECS` — pause after a successful iteration
//! - `SPREAD_ETL_SAVE_INTERVAL` — records per flushed batch
//! - `SPREAD_ETL_OUTPUT_DIR` — root of the partitioned CSV tree
//! - `SPREAD_ETL_FAILURE_BACKOFF_SECS` — pause after a failed iteration
//!   (defaults to the poll interval; `0` skips the pause and retries
//!   immediately, as the loop originally did)
//! - `SPREAD_ETL_ALERTS_FILE` — JSON threshold table replacing the defaults

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::alerts::AlertTable;

/// Default public order book endpoint.
pub const DEFAULT_API_URL: &str = "https://api.bitso.com/v3/order_book/";

/// Default pause between successful polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Default number of records per flushed file.
pub const DEFAULT_SAVE_INTERVAL: usize = 6;

/// What the loop does after an iteration fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Start the next iteration straight away.
    Immediate,
    /// Sleep before the next iteration.
    Backoff(Duration),
}

impl FailurePolicy {
    /// Maps a backoff duration to a policy; zero means immediate.
    pub fn from_backoff(backoff: Duration) -> Self {
        if backoff.is_zero() {
            Self::Immediate
        } else {
            Self::Backoff(backoff)
        }
    }
}

/// Settings for one ETL loop.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub api_url: String,
    pub poll_interval: Duration,
    pub save_interval: usize,
    pub output_dir: PathBuf,
    pub failure_policy: FailurePolicy,
    pub alerts: AlertTable,
}

impl Default for EtlConfig {
    fn default() -> Self {
        let poll_interval = Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS);
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval,
            save_interval: DEFAULT_SAVE_INTERVAL,
            output_dir: PathBuf::from("."),
            failure_policy: FailurePolicy::Backoff(poll_interval),
            alerts: AlertTable::default(),
        }
    }
}

/// Loads the ETL configuration from environment variables.
///
/// # Errors
///
/// Returns [`EtlError::Config`](crate::EtlError::Config) if a numeric
/// variable does not parse, the save interval is zero, or the alerts file
/// cannot be loaded.
pub fn fetch_config() -> crate::Result<EtlConfig> {
    let api_url = non_empty_var("SPREAD_ETL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let poll_interval = Duration::from_secs(
        parse_var("SPREAD_ETL_POLL_INTERVAL_SECS")?.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
    );

    let save_interval = parse_var("SPREAD_ETL_SAVE_INTERVAL")?.unwrap_or(DEFAULT_SAVE_INTERVAL);
    if save_interval == 0 {
        return Err(crate::EtlError::Config(
            "SPREAD_ETL_SAVE_INTERVAL must be at least 1".to_string(),
        ));
    }

    let output_dir = non_empty_var("SPREAD_ETL_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let backoff = parse_var("SPREAD_ETL_FAILURE_BACKOFF_SECS")?
        .map(Duration::from_secs)
        .unwrap_or(poll_interval);

    let alerts = match non_empty_var("SPREAD_ETL_ALERTS_FILE") {
        Some(path) => AlertTable::load(&PathBuf::from(path))?,
        None => AlertTable::default(),
    };

    Ok(EtlConfig {
        api_url,
        poll_interval,
        save_interval,
        output_dir,
        failure_policy: FailurePolicy::from_backoff(backoff),
        alerts,
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parse_var<T>(name: &str) -> crate::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_empty_var(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| crate::EtlError::Config(format!("invalid {name}={raw:?}: {e}")))
        })
        .transpose()
}
