pub mod actions;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod stores;

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use actions::DashboardAction;
use errors::CoreError;
use models::{
    analytics::PortfolioValuation,
    chart::TrendPoint,
    coin::CoinRecord,
    market::{FetchError, MarketState},
    search::{CoinFilter, FilterUpdate},
    settings::DashboardSettings,
    theme::ThemeMode,
    view::DashboardView,
};
use providers::coingecko::CoinGeckoProvider;
use providers::traits::{MarketDataProvider, MarketQuery};
use services::refresh_service::refresh_market;
#[cfg(not(target_arch = "wasm32"))]
use services::refresh_service::{RefreshHandle, RefreshScheduler};
use services::{filter_service::FilterService, valuation_service::ValuationService};
use stores::{
    market_store::SharedMarketStore, portfolio_store::PortfolioStore, search_store::SearchStore,
    theme_store::ThemeStore,
};

/// Main entry point for the coin dashboard core library.
///
/// Owns every store and is the only place where they are combined. The
/// presentation layer writes through the setters (or [`dispatch`]) and reads
/// derived values, which are recomputed on every call.
///
/// [`dispatch`]: CoinDashboard::dispatch
#[must_use]
pub struct CoinDashboard {
    settings: DashboardSettings,
    provider: Arc<dyn MarketDataProvider>,
    market: SharedMarketStore,
    search: SearchStore,
    portfolio: PortfolioStore,
    theme: ThemeStore,
    filter_service: FilterService,
    valuation_service: ValuationService,
}

impl std::fmt::Debug for CoinDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let market = self.market.read();
        f.debug_struct("CoinDashboard")
            .field("provider", &self.provider.name())
            .field("coins", &market.coin_count())
            .field("loading", &market.loading())
            .field("holdings", &self.portfolio.holdings().len())
            .field("theme", &self.theme.mode())
            .finish()
    }
}

impl CoinDashboard {
    /// Dashboard with default settings, backed by the public CoinGecko API.
    pub fn new() -> Self {
        let settings = DashboardSettings::default();
        let provider = Arc::new(CoinGeckoProvider::with_settings(&settings));
        Self::build(settings, provider)
    }

    /// Dashboard backed by a CoinGecko-compatible endpoint described by `settings`.
    pub fn from_settings(settings: DashboardSettings) -> Result<Self, CoreError> {
        settings.validate()?;
        let provider = Arc::new(CoinGeckoProvider::with_settings(&settings));
        Ok(Self::build(settings, provider))
    }

    /// Dashboard with a custom market data source.
    pub fn with_provider(
        settings: DashboardSettings,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self::build(settings, provider))
    }

    // ── Refresh ─────────────────────────────────────────────────────

    /// Fetch a fresh snapshot now. Returns whether the fetch succeeded; on
    /// failure the error is recorded in the market store.
    pub async fn refresh(&self) -> bool {
        refresh_market(self.provider.as_ref(), &self.market, &self.query()).await
    }

    /// Start periodic refreshing: one fetch now, then one per
    /// `settings.refresh_interval`. Must be called inside a Tokio runtime.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn start_auto_refresh(&self) -> RefreshHandle {
        self.scheduler().start()
    }

    /// Scheduler wired to this dashboard's provider and market store.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn scheduler(&self) -> RefreshScheduler {
        RefreshScheduler::new(
            Arc::clone(&self.provider),
            self.market.clone(),
            self.query(),
            self.settings.refresh_interval,
        )
    }

    /// Handle to the market store, e.g. for a UI event loop that wants to
    /// drive fetches itself.
    pub fn market_store(&self) -> SharedMarketStore {
        self.market.clone()
    }

    // ── User actions ────────────────────────────────────────────────

    /// Route a presentation action to its store.
    pub fn dispatch(&mut self, action: DashboardAction) {
        match action {
            DashboardAction::SetQuery(text) => self.set_query(text),
            DashboardAction::SetFilter(update) => self.set_filter(update),
            DashboardAction::SetHolding { coin_id, amount } => self.set_holding(coin_id, amount),
            DashboardAction::AddToHolding { coin_id, amount } => {
                self.add_to_holding(coin_id, amount);
            }
            DashboardAction::RemoveHolding(coin_id) => self.remove_holding(&coin_id),
            DashboardAction::ToggleTheme => self.toggle_theme(),
            DashboardAction::SetTheme(mode) => self.set_theme(mode),
        }
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.search.set_query(text);
    }

    pub fn set_filter(&mut self, update: FilterUpdate) {
        self.search.set_filter(update);
    }

    pub fn set_holding(&mut self, coin_id: impl Into<String>, amount: f64) {
        self.portfolio.set_holding(coin_id, amount);
    }

    /// Add to the amount already held and return the new amount.
    pub fn add_to_holding(&mut self, coin_id: impl Into<String>, amount: f64) -> f64 {
        self.portfolio.add_to_holding(coin_id, amount)
    }

    pub fn remove_holding(&mut self, coin_id: &str) {
        self.portfolio.remove_holding(coin_id);
    }

    pub fn toggle_theme(&mut self) {
        self.theme.toggle_theme();
    }

    pub fn set_theme(&mut self, mode: ThemeMode) {
        self.theme.set_theme(mode);
    }

    // ── Store reads ─────────────────────────────────────────────────

    #[must_use]
    pub fn search_query(&self) -> &str {
        self.search.query()
    }

    #[must_use]
    pub fn filter(&self) -> CoinFilter {
        self.search.filter()
    }

    #[must_use]
    pub fn holdings(&self) -> &HashMap<String, f64> {
        self.portfolio.holdings()
    }

    /// Amount held of `coin_id`; zero when not held.
    #[must_use]
    pub fn holding(&self, coin_id: &str) -> f64 {
        self.portfolio.holding(coin_id)
    }

    #[must_use]
    pub fn theme(&self) -> ThemeMode {
        self.theme.mode()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.market.read().loading()
    }

    #[must_use]
    pub fn error(&self) -> Option<FetchError> {
        self.market.read().error().cloned()
    }

    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.market.read().last_updated()
    }

    /// True when the last fetch failed and an older snapshot is on display.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.market.read().is_stale()
    }

    #[must_use]
    pub fn coin(&self, coin_id: &str) -> Option<CoinRecord> {
        self.market.read().coin(coin_id).cloned()
    }

    #[must_use]
    pub fn market_snapshot(&self) -> MarketState {
        self.market.read().snapshot()
    }

    #[must_use]
    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    // ── Derived values ──────────────────────────────────────────────

    /// Price table rows matching the current query and filters.
    /// Order is unspecified.
    #[must_use]
    pub fn filtered_coins(&self) -> Vec<CoinRecord> {
        let market = self.market.read();
        self.filter_service
            .filter_coins(market.entities(), self.search.state())
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn portfolio_valuation(&self) -> PortfolioValuation {
        let market = self.market.read();
        self.valuation_service
            .value_portfolio(market.entities(), self.portfolio.holdings())
    }

    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.portfolio_valuation().total_value
    }

    #[must_use]
    pub fn total_change_percent(&self) -> f64 {
        self.portfolio_valuation().total_change_percent
    }

    /// Two-point portfolio trend for the chart widget. Approximate: the
    /// "24h Ago" value is estimated linearly from the current 24h change.
    #[must_use]
    pub fn chart_data(&self) -> Vec<TrendPoint> {
        self.portfolio_valuation().chart
    }

    /// All presentation reads in one consistent snapshot. Table rows are
    /// ordered by market cap rank.
    #[must_use]
    pub fn view(&self) -> DashboardView {
        let market = self.market.read();
        let mut filtered_coins: Vec<CoinRecord> = self
            .filter_service
            .filter_coins(market.entities(), self.search.state())
            .into_iter()
            .cloned()
            .collect();
        filtered_coins.sort_by(|a, b| {
            a.market_cap_rank
                .unwrap_or(u32::MAX)
                .cmp(&b.market_cap_rank.unwrap_or(u32::MAX))
                .then_with(|| a.id.cmp(&b.id))
        });

        DashboardView {
            query: self.search.query().to_string(),
            filter: self.search.filter(),
            filtered_coins,
            portfolio: self
                .valuation_service
                .value_portfolio(market.entities(), self.portfolio.holdings()),
            loading: market.loading(),
            error: market.error().cloned(),
            last_updated: market.last_updated(),
            theme: self.theme.mode(),
        }
    }

    /// [`view`](Self::view) serialized as pretty JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.view()).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize dashboard view: {e}"))
        })
    }

    // ── Internal ────────────────────────────────────────────────────

    fn query(&self) -> MarketQuery {
        MarketQuery::from_settings(&self.settings)
    }

    fn build(settings: DashboardSettings, provider: Arc<dyn MarketDataProvider>) -> Self {
        let theme = ThemeStore::new(settings.initial_theme);
        Self {
            settings,
            provider,
            market: SharedMarketStore::new(),
            search: SearchStore::new(),
            portfolio: PortfolioStore::new(),
            theme,
            filter_service: FilterService::new(),
            valuation_service: ValuationService::new(),
        }
    }
}

impl Default for CoinDashboard {
    fn default() -> Self {
        Self::new()
    }
}
