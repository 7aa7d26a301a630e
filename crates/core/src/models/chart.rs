use serde::{Deserialize, Serialize};

pub const LABEL_24H_AGO: &str = "24h Ago";
pub const LABEL_NOW: &str = "Now";

/// A single data point for the portfolio trend chart.
///
/// The core computes these, the charting widget only renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Axis label ("24h Ago" or "Now")
    pub label: String,

    /// Portfolio value in USD at that point
    pub value: f64,
}

impl TrendPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}
