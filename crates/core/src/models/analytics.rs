use serde::{Deserialize, Serialize};

use super::chart::TrendPoint;

/// Valuation of the whole portfolio against the current market snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    /// Sum of all line values in USD
    pub total_value: f64,

    /// Value-weighted 24h change in percent; 0 when `total_value` is 0
    pub total_change_percent: f64,

    /// Per-coin lines, largest value first. Holdings of coins missing from
    /// the snapshot are not listed.
    pub holdings: Vec<HoldingValuation>,

    /// Two-point trend: 24h ago (back-projected) and now
    pub chart: Vec<TrendPoint>,
}

/// Valuation of one held coin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub coin_id: String,
    pub name: String,
    pub symbol: String,
    pub image: String,

    /// Quantity held
    pub amount: f64,

    /// Current price in USD (0 if the snapshot has none)
    pub price: f64,

    /// 24h change in percent, as reported
    pub change_24h: Option<f64>,

    /// price × amount
    pub value: f64,

    /// USD amount this line moved over the last 24h
    pub change_contribution: f64,
}
