//! Crate-level error types.
//!
//! [`EtlError`] unifies every failure an ETL iteration can hit (upstream
//! connectivity, malformed snapshots, persistence) behind a single enum so
//! the loop driver can log and swallow them at one boundary.

use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EtlError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    /// Configuration could not be read or contained an invalid value.
    #[error("configuration error: {0}")]
    Config(String),

    /// The upstream request failed or returned an unsuccessful response.
    #[error(
        "error trying to connect to {url}. http_status={} book={book} response={body}",
        .status.map_or_else(|| "none".to_string(), |s| s.to_string())
    )]
    Connectivity {
        url: String,
        status: Option<u16>,
        book: String,
        body: String,
    },

    /// The order book snapshot cannot produce a spread.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] PayloadError),

    /// A partition directory or output file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which side of the book a price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Bid,
    Ask,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Bid => f.write_str("bid"),
            Side::Ask => f.write_str("ask"),
        }
    }
}

/// Reasons a snapshot is rejected by the transform stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("no {0} levels in order book")]
    EmptySide(Side),

    #[error("{side} price {price:?} is not a number")]
    InvalidPrice { side: Side, price: String },

    #[error("best ask is zero, spread is undefined")]
    ZeroAsk,

    #[error("spread for bid {bid} and ask {ask} overflows")]
    SpreadOverflow {
        bid: rust_decimal::Decimal,
        ask: rust_decimal::Decimal,
    },
}
