use serde::Serialize;

/// One output row: the spread observed for a book at one snapshot.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadRecord {
    pub orderbook_timestamp: String,
    pub book: String,
    pub bid: f64,
    pub ask: f64,
    pub spread: f64,
}
