//! Order book REST response models.

use serde::{Deserialize, Serialize};

/// Envelope returned by the order book endpoint.
///
/// `payload` is absent on most error responses, which carry an `error`
/// object instead.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBookResponse {
    pub success: bool,
    pub payload: Option<OrderBookPayload>,
}

/// Order book snapshot for a single book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookPayload {
    /// Server-side update time, passed through untouched.
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

/// A single price level in the order book.
///
/// Prices stay as strings on the wire; numeric parsing happens in the
/// transform stage so a bad price is reported as a malformed snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<String>,
    pub price: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}
