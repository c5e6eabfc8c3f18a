//! Spread threshold alerts.
//!
//! Every threshold in the table is checked on its own, so a wide spread
//! fires one warning per threshold it exceeds. Alerts only log; they never
//! influence the ETL loop.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// A named spread threshold, in percent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlertThreshold {
    pub label: String,
    pub percent: f64,
}

impl AlertThreshold {
    pub fn new(label: impl Into<String>, percent: f64) -> Self {
        Self {
            label: label.into(),
            percent,
        }
    }
}

/// Ordered set of thresholds, ascending by percent.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertTable {
    thresholds: Vec<AlertThreshold>,
}

impl Default for AlertTable {
    fn default() -> Self {
        Self::new(vec![
            AlertThreshold::new("alert_0.1%", 0.1),
            AlertThreshold::new("alert_0.5%", 0.5),
            AlertThreshold::new("alert_1.0%", 1.0),
        ])
    }
}

impl AlertTable {
    /// Builds a table, sorting thresholds ascending.
    pub fn new(mut thresholds: Vec<AlertThreshold>) -> Self {
        thresholds.sort_by(|a, b| a.percent.total_cmp(&b.percent));
        Self { thresholds }
    }

    /// Loads a threshold table from a JSON array of `{"label", "percent"}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::EtlError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let thresholds: Vec<AlertThreshold> = serde_json::from_str(&contents)?;
        Ok(Self::new(thresholds))
    }

    pub fn thresholds(&self) -> &[AlertThreshold] {
        &self.thresholds
    }

    /// Logs a warning for every threshold `spread` strictly exceeds and
    /// returns the thresholds that fired.
    pub fn check(&self, book: &str, spread: f64) -> Vec<&AlertThreshold> {
        let fired: Vec<&AlertThreshold> = self
            .thresholds
            .iter()
            .filter(|t| spread > t.percent)
            .collect();

        for threshold in &fired {
            warn!(
                book,
                spread,
                threshold = %threshold.label,
                "{book} spread {spread:.3}% exceeds {} threshold",
                threshold.label
            );
        }

        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels<'a>(fired: &[&'a AlertThreshold]) -> Vec<&'a str> {
        fired.iter().map(|t| t.label.as_str()).collect()
    }

    #[test]
    fn spread_between_thresholds_fires_lower_ones() {
        let table = AlertTable::default();
        let fired = table.check("btc_mxn", 0.6);
        assert_eq!(labels(&fired), vec!["alert_0.1%", "alert_0.5%"]);
    }

    #[test]
    fn spread_above_all_fires_every_threshold() {
        let table = AlertTable::default();
        assert_eq!(table.check("btc_mxn", 2.0).len(), 3);
    }

    #[test]
    fn threshold_is_exclusive() {
        let table = AlertTable::default();
        assert_eq!(labels(&table.check("btc_mxn", 0.5)), vec!["alert_0.1%"]);
    }

    #[test]
    fn negative_spread_fires_nothing() {
        let table = AlertTable::default();
        assert!(table.check("btc_mxn", -50.0).is_empty());
    }

    #[test]
    fn new_sorts_ascending() {
        let table = AlertTable::new(vec![
            AlertThreshold::new("wide", 2.0),
            AlertThreshold::new("narrow", 0.2),
        ]);
        assert_eq!(table.thresholds()[0].label, "narrow");
        assert_eq!(table.thresholds()[1].label, "wide");
    }
}
