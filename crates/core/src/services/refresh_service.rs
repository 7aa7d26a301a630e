#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
#[cfg(not(target_arch = "wasm32"))]
use tokio::task::JoinHandle;
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::models::market::FetchError;
use crate::providers::traits::{MarketDataProvider, MarketQuery};
use crate::stores::market_store::{MarketAction, SharedMarketStore};

/// Run one fetch attempt against `provider` and record the outcome in `store`.
///
/// Always emits `Pending` and then exactly one of `Fulfilled`/`Rejected`.
/// Returns whether the fetch succeeded; failures are never propagated.
pub async fn refresh_market(
    provider: &dyn MarketDataProvider,
    store: &SharedMarketStore,
    query: &MarketQuery,
) -> bool {
    store.apply(MarketAction::Pending);
    debug!(provider = provider.name(), "Fetching market snapshot");

    match provider.fetch_markets(query).await {
        Ok(records) => {
            info!(provider = provider.name(), count = records.len(), "Market snapshot fetched");
            store.apply(MarketAction::Fulfilled(records));
            true
        }
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "Market fetch failed");
            store.apply(MarketAction::Rejected(FetchError::from(e)));
            false
        }
    }
}

// The polling task needs the Tokio runtime, which is native only.

/// Periodically refreshes the market store.
///
/// `start` fetches immediately and then once per `interval`. Every fetch runs
/// as its own task, so stopping the scheduler never cancels a request that is
/// already in flight; its result still lands in the store.
///
/// Fetches are not serialized. If a request outlives the interval, the next
/// one starts anyway and whichever finishes last wins.
#[cfg(not(target_arch = "wasm32"))]
pub struct RefreshScheduler {
    provider: Arc<dyn MarketDataProvider>,
    store: SharedMarketStore,
    query: MarketQuery,
    interval: Duration,
}

#[cfg(not(target_arch = "wasm32"))]
impl RefreshScheduler {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        store: SharedMarketStore,
        query: MarketQuery,
        interval: Duration,
    ) -> Self {
        Self {
            provider,
            store,
            query,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One fetch, awaited in place.
    pub async fn refresh_once(&self) -> bool {
        refresh_market(self.provider.as_ref(), &self.store, &self.query).await
    }

    /// Spawn the polling task. Must be called from within a Tokio runtime.
    pub fn start(&self) -> RefreshHandle {
        let provider = Arc::clone(&self.provider);
        let store = self.store.clone();
        let query = self.query.clone();
        let interval = self.interval;

        info!(
            provider = provider.name(),
            interval_secs = interval.as_secs_f64(),
            "Refresh scheduler started"
        );

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // First tick completes immediately
                ticker.tick().await;
                let provider = Arc::clone(&provider);
                let store = store.clone();
                let query = query.clone();
                tokio::spawn(async move {
                    refresh_market(provider.as_ref(), &store, &query).await;
                });
            }
        });

        RefreshHandle { task }
    }
}

/// Handle to a running [`RefreshScheduler`].
///
/// Stopping (or dropping) the handle cancels future ticks only.
#[cfg(not(target_arch = "wasm32"))]
#[must_use = "dropping the handle stops the scheduler"]
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

#[cfg(not(target_arch = "wasm32"))]
impl RefreshHandle {
    /// Stop issuing new fetches.
    pub fn stop(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
        info!("Refresh scheduler stopped");
    }
}
