//! Spread derivation from a raw order book snapshot.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{PayloadError, Side};
use crate::models::{OrderBookPayload, PriceLevel, SpreadRecord};

/// Best prices and spread derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadSnapshot {
    pub timestamp: String,
    pub best_bid: Decimal,
    pub best_ask: Decimal,
    /// `(best_ask - best_bid) * 100 / best_ask`; negative when the book is crossed.
    pub spread: Decimal,
}

impl SpreadSnapshot {
    /// Spread as a float percentage, for threshold checks.
    pub fn spread_pct(&self) -> f64 {
        self.spread.to_f64().unwrap_or(f64::NAN)
    }

    /// Builds the output row for `book`.
    pub fn into_record(self, book: &str) -> SpreadRecord {
        SpreadRecord {
            book: book.to_string(),
            bid: self.best_bid.to_f64().unwrap_or(f64::NAN),
            ask: self.best_ask.to_f64().unwrap_or(f64::NAN),
            spread: self.spread.to_f64().unwrap_or(f64::NAN),
            orderbook_timestamp: self.timestamp,
        }
    }
}

/// Computes best bid, best ask and spread percentage for a snapshot.
///
/// # Errors
///
/// Returns a [`PayloadError`] if either side is empty, a price is not
/// numeric, or the best ask is zero.
pub fn transform(payload: &OrderBookPayload) -> Result<SpreadSnapshot, PayloadError> {
    let bids = parse_prices(&payload.bids, Side::Bid)?;
    let asks = parse_prices(&payload.asks, Side::Ask)?;

    let best_bid = bids
        .into_iter()
        .max()
        .ok_or(PayloadError::EmptySide(Side::Bid))?;
    let best_ask = asks
        .into_iter()
        .min()
        .ok_or(PayloadError::EmptySide(Side::Ask))?;

    let spread = calculate_spread(best_bid, best_ask)?;

    Ok(SpreadSnapshot {
        timestamp: payload.updated_at.clone(),
        best_bid,
        best_ask,
        spread,
    })
}

/// Spread between `bid` and `ask` as a percentage of `ask`.
///
/// # Errors
///
/// Returns [`PayloadError::ZeroAsk`] when `ask` is zero, or
/// [`PayloadError::SpreadOverflow`] when the result does not fit a `Decimal`.
pub fn calculate_spread(bid: Decimal, ask: Decimal) -> Result<Decimal, PayloadError> {
    if ask.is_zero() {
        return Err(PayloadError::ZeroAsk);
    }
    ask.checked_sub(bid)
        .and_then(|gap| gap.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|scaled| scaled.checked_div(ask))
        .ok_or(PayloadError::SpreadOverflow { bid, ask })
}

fn parse_prices(levels: &[PriceLevel], side: Side) -> Result<Vec<Decimal>, PayloadError> {
    levels
        .iter()
        .map(|level| parse_price(&level.price, side))
        .collect()
}

fn parse_price(raw: &str, side: Side) -> Result<Decimal, PayloadError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| PayloadError::InvalidPrice {
            side,
            price: raw.to_string(),
        })
}
