use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analytics::PortfolioValuation;
use super::coin::CoinRecord;
use super::market::FetchError;
use super::search::CoinFilter;
use super::theme::ThemeMode;

/// Everything the presentation layer reads, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub query: String,
    pub filter: CoinFilter,

    /// Price table rows after search and filters, best rank first
    pub filtered_coins: Vec<CoinRecord>,

    pub portfolio: PortfolioValuation,

    pub loading: bool,
    pub error: Option<FetchError>,
    pub last_updated: Option<DateTime<Utc>>,

    pub theme: ThemeMode,
}
