//! Data models for the order book endpoint and the CSV output rows.

pub mod book;
pub mod record;

pub use book::{OrderBookPayload, OrderBookResponse, PriceLevel};
pub use record::SpreadRecord;
