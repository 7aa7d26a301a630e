use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::models::coin::CoinRecord;
use crate::models::market::{FetchError, MarketState};

/// One transition of the fetch lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketAction {
    Pending,
    Fulfilled(Vec<CoinRecord>),
    Rejected(FetchError),
}

/// Owner of the market snapshot.
///
/// Every fetch attempt is exactly one `fetch_pending` followed by either
/// `fetch_fulfilled` or `fetch_rejected`. None of the operations can fail.
#[derive(Debug, Clone, Default)]
pub struct MarketStore {
    state: MarketState,
}

impl MarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a lifecycle transition through a single entry point.
    pub fn apply(&mut self, action: MarketAction) {
        match action {
            MarketAction::Pending => self.fetch_pending(),
            MarketAction::Fulfilled(records) => self.fetch_fulfilled(records),
            MarketAction::Rejected(error) => self.fetch_rejected(error),
        }
    }

    /// A fetch has started: mark loading and clear the previous error.
    pub fn fetch_pending(&mut self) {
        self.state.loading = true;
        self.state.error = None;
    }

    /// A fetch succeeded: replace the snapshot wholesale.
    ///
    /// Records are keyed by `id`; on duplicate ids the last one wins. Coins
    /// missing from `records` are dropped.
    pub fn fetch_fulfilled(&mut self, records: Vec<CoinRecord>) {
        self.fetch_fulfilled_at(records, Utc::now());
    }

    /// [`fetch_fulfilled`](Self::fetch_fulfilled) with an explicit clock reading.
    /// `last_updated` never moves backwards, even if `now` does.
    pub fn fetch_fulfilled_at(&mut self, records: Vec<CoinRecord>, now: DateTime<Utc>) {
        let received = records.len();
        let entities: HashMap<String, CoinRecord> =
            records.into_iter().map(|r| (r.id.clone(), r)).collect();

        debug!(received, unique = entities.len(), "Market snapshot replaced");

        self.state.entities = entities;
        self.state.loading = false;
        self.state.last_updated = Some(match self.state.last_updated {
            Some(prev) if prev > now => prev,
            _ => now,
        });
    }

    /// A fetch failed: record the error and keep the stale snapshot.
    pub fn fetch_rejected(&mut self, error: impl Into<FetchError>) {
        let error = error.into();
        debug!(%error, "Market fetch rejected");
        self.state.loading = false;
        self.state.error = Some(error);
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn entities(&self) -> &HashMap<String, CoinRecord> {
        &self.state.entities
    }

    pub fn coin(&self, coin_id: &str) -> Option<&CoinRecord> {
        self.state.entities.get(coin_id)
    }

    pub fn coin_count(&self) -> usize {
        self.state.entities.len()
    }

    pub fn loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.state.error.as_ref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.state.last_updated
    }

    /// True when the last fetch failed but an older snapshot is still shown.
    pub fn is_stale(&self) -> bool {
        self.state.error.is_some() && self.state.last_updated.is_some()
    }

    pub fn state(&self) -> &MarketState {
        &self.state
    }

    /// Owned copy of the whole state.
    pub fn snapshot(&self) -> MarketState {
        self.state.clone()
    }
}

/// Market store shared between the dashboard and the refresh task.
///
/// Mutations are short and synchronous; the lock is never held across an
/// `.await`.
#[derive(Debug, Clone, Default)]
pub struct SharedMarketStore {
    inner: Arc<RwLock<MarketStore>>,
}

impl SharedMarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, MarketStore> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, MarketStore> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn apply(&self, action: MarketAction) {
        self.write().apply(action);
    }
}
