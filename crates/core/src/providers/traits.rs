use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::coin::CoinRecord;
use crate::models::settings::DashboardSettings;

/// Parameters of one market listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketQuery {
    /// Quote currency ("usd")
    pub vs_currency: String,
    /// Page size, ordered by descending market cap
    pub per_page: u32,
    /// 1-based page number
    pub page: u32,
}

impl MarketQuery {
    pub fn from_settings(settings: &DashboardSettings) -> Self {
        Self {
            vs_currency: settings.vs_currency.clone(),
            per_page: settings.per_page,
            page: 1,
        }
    }
}

impl Default for MarketQuery {
    fn default() -> Self {
        Self::from_settings(&DashboardSettings::default())
    }
}

/// Source of market snapshots.
///
/// The dashboard only ever asks for "the current top N coins". Any endpoint
/// that can answer that can be plugged in behind this trait; tests use
/// in-memory implementations.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch one snapshot: coins ordered by descending market cap.
    async fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<CoinRecord>, CoreError>;
}
