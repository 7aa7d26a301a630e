// ═══════════════════════════════════════════════════════════════════
// Refresh Tests — refresh_market, RefreshScheduler, RefreshHandle
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use coin_dashboard_core::errors::CoreError;
use coin_dashboard_core::models::coin::CoinRecord;
use coin_dashboard_core::models::market::FetchError;
use coin_dashboard_core::providers::traits::{MarketDataProvider, MarketQuery};
use coin_dashboard_core::services::refresh_service::{refresh_market, RefreshScheduler};
use coin_dashboard_core::stores::market_store::SharedMarketStore;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Providers
// ═══════════════════════════════════════════════════════════════════

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("coin_dashboard_core=debug")
        .try_init();
}

/// Replays scripted responses in order; the last one repeats forever.
/// Each response can carry a delay to simulate a slow request.
struct ScriptedProvider {
    script: Mutex<Vec<(Duration, Result<Vec<CoinRecord>, String>)>>,
    calls: AtomicUsize,
    last_query: Mutex<Option<MarketQuery>>,
}

impl ScriptedProvider {
    fn new(script: Vec<(Duration, Result<Vec<CoinRecord>, String>)>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    fn always(records: Vec<CoinRecord>) -> Self {
        Self::new(vec![(Duration::ZERO, Ok(records))])
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<CoinRecord>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        let (delay, outcome) = {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.remove(0)
            } else {
                script[0].clone()
            }
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome.map_err(CoreError::Network)
    }
}

/// Fails with a non-2xx payload.
struct RateLimitedProvider;

#[async_trait]
impl MarketDataProvider for RateLimitedProvider {
    fn name(&self) -> &str {
        "RateLimited"
    }

    async fn fetch_markets(&self, _query: &MarketQuery) -> Result<Vec<CoinRecord>, CoreError> {
        Err(CoreError::ApiResponse {
            provider: "RateLimited".into(),
            status: 429,
            body: json!({
                "status": {"error_code": 429, "error_message": "You've exceeded the Rate Limit"}
            }),
        })
    }
}

fn coin(id: &str, rank: u32) -> CoinRecord {
    CoinRecord::new(id, id, id).with_rank(rank).with_price(1.0)
}

const INTERVAL: Duration = Duration::from_secs(30);

// ═══════════════════════════════════════════════════════════════════
// Single fetch
// ═══════════════════════════════════════════════════════════════════

mod single_fetch {
    use super::*;

    #[tokio::test]
    async fn success_fills_store() {
        init_tracing();
        let provider = ScriptedProvider::always(vec![coin("bitcoin", 1), coin("ethereum", 2)]);
        let store = SharedMarketStore::new();

        let ok = refresh_market(&provider, &store, &MarketQuery::default()).await;

        assert!(ok);
        let market = store.read();
        assert_eq!(market.coin_count(), 2);
        assert!(!market.loading());
        assert!(market.error().is_none());
        assert!(market.last_updated().is_some());
    }

    #[tokio::test]
    async fn sends_default_query() {
        let provider = ScriptedProvider::always(vec![]);
        let store = SharedMarketStore::new();
        refresh_market(&provider, &store, &MarketQuery::default()).await;

        let query = provider.last_query.lock().unwrap().clone().unwrap();
        assert_eq!(query.vs_currency, "usd");
        assert_eq!(query.per_page, 100);
        assert_eq!(query.page, 1);
    }

    #[tokio::test]
    async fn failure_records_message_and_keeps_snapshot() {
        let provider = ScriptedProvider::new(vec![
            (Duration::ZERO, Ok(vec![coin("bitcoin", 1)])),
            (Duration::ZERO, Err("connection refused".into())),
        ]);
        let store = SharedMarketStore::new();

        assert!(refresh_market(&provider, &store, &MarketQuery::default()).await);
        let updated = store.read().last_updated();
        assert!(!refresh_market(&provider, &store, &MarketQuery::default()).await);

        let market = store.read();
        assert_eq!(market.coin_count(), 1);
        assert_eq!(market.last_updated(), updated);
        assert!(!market.loading());
        assert_eq!(
            market.error(),
            Some(&FetchError::Message("Network error: connection refused".into()))
        );
    }

    #[tokio::test]
    async fn failure_prefers_response_payload() {
        let store = SharedMarketStore::new();
        refresh_market(&RateLimitedProvider, &store, &MarketQuery::default()).await;

        match store.read().error() {
            Some(FetchError::Payload(body)) => {
                assert_eq!(body["status"]["error_code"], 429);
            }
            other => panic!("expected payload error, got {other:?}"),
        };
    }

    #[tokio::test(start_paused = true)]
    async fn loading_is_visible_while_in_flight() {
        let provider = Arc::new(ScriptedProvider::new(vec![(
            Duration::from_secs(5),
            Ok(vec![coin("bitcoin", 1)]),
        )]));
        let store = SharedMarketStore::new();
        store.write().fetch_fulfilled(vec![coin("old", 1)]);

        let task = {
            let provider = Arc::clone(&provider);
            let store = store.clone();
            tokio::spawn(async move {
                refresh_market(provider.as_ref(), &store, &MarketQuery::default()).await
            })
        };

        tokio::time::sleep(Duration::from_secs(1)).await;
        {
            let market = store.read();
            assert!(market.loading());
            // Previous snapshot still readable
            assert!(market.coin("old").is_some());
        }

        assert!(task.await.unwrap());
        assert!(!store.read().loading());
        assert!(store.read().coin("bitcoin").is_some());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Scheduler
// ═══════════════════════════════════════════════════════════════════

mod scheduler {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fetches_immediately_then_every_interval() {
        init_tracing();
        let provider = Arc::new(ScriptedProvider::always(vec![coin("bitcoin", 1)]));
        let store = SharedMarketStore::new();
        let scheduler = RefreshScheduler::new(
            provider.clone(),
            store.clone(),
            MarketQuery::default(),
            INTERVAL,
        );

        let handle = scheduler.start();
        assert!(handle.is_running());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(provider.calls(), 1);
        assert_eq!(store.read().coin_count(), 1);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(provider.calls(), 2);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(provider.calls(), 3);

        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_further_fetches() {
        let provider = Arc::new(ScriptedProvider::always(vec![coin("bitcoin", 1)]));
        let store = SharedMarketStore::new();
        let scheduler =
            RefreshScheduler::new(provider.clone(), store, MarketQuery::default(), INTERVAL);

        let handle = scheduler.start();
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(provider.calls(), 2);

        handle.stop();
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_scheduler() {
        let provider = Arc::new(ScriptedProvider::always(vec![]));
        let scheduler = RefreshScheduler::new(
            provider.clone(),
            SharedMarketStore::new(),
            MarketQuery::default(),
            INTERVAL,
        );

        {
            let _handle = scheduler.start();
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_fetch_survives_stop() {
        let provider = Arc::new(ScriptedProvider::new(vec![(
            Duration::from_secs(10),
            Ok(vec![coin("bitcoin", 1)]),
        )]));
        let store = SharedMarketStore::new();
        let scheduler = RefreshScheduler::new(
            provider.clone(),
            store.clone(),
            MarketQuery::default(),
            INTERVAL,
        );

        let handle = scheduler.start();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(store.read().loading());

        handle.stop();
        tokio::time::sleep(Duration::from_secs(20)).await;

        let market = store.read();
        assert!(!market.loading());
        assert_eq!(market.coin_count(), 1);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_tick_is_retried_on_next_tick() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            (Duration::ZERO, Err("timeout".into())),
            (Duration::ZERO, Ok(vec![coin("bitcoin", 1)])),
        ]));
        let store = SharedMarketStore::new();
        let scheduler = RefreshScheduler::new(
            provider.clone(),
            store.clone(),
            MarketQuery::default(),
            INTERVAL,
        );

        let handle = scheduler.start();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(store.read().error().is_some());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(store.read().error().is_none());
        assert_eq!(store.read().coin_count(), 1);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_fetches_last_fulfilled_wins() {
        // First request takes 40s, the second (issued at t=30) returns at once.
        let provider = Arc::new(ScriptedProvider::new(vec![
            (Duration::from_secs(40), Ok(vec![coin("slow", 1)])),
            (Duration::ZERO, Ok(vec![coin("fast", 1)])),
        ]));
        let store = SharedMarketStore::new();
        let scheduler = RefreshScheduler::new(
            provider.clone(),
            store.clone(),
            MarketQuery::default(),
            INTERVAL,
        );

        let handle = scheduler.start();
        tokio::time::sleep(Duration::from_secs(35)).await;
        assert!(store.read().coin("fast").is_some());

        handle.stop();
        tokio::time::sleep(Duration::from_secs(10)).await;
        // The older request finished later and overwrote the newer snapshot
        assert!(store.read().coin("slow").is_some());
        assert!(store.read().coin("fast").is_none());
    }
}
