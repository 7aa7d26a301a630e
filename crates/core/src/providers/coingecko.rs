use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::traits::{MarketDataProvider, MarketQuery};
use crate::errors::CoreError;
use crate::models::coin::CoinRecord;
use crate::models::settings::DashboardSettings;

const PROVIDER: &str = "CoinGecko";

/// CoinGecko `/coins/markets` provider.
///
/// - **Free**: no API key required for the public tier (rate limited).
/// - **Endpoint**: `/coins/markets?vs_currency=usd&order=market_cap_desc&...`
/// - **Response**: JSON array of coin objects, already ordered by market cap.
///
/// Any server exposing the same endpoint shape can be used by pointing
/// `base_url` at it.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_settings(&DashboardSettings::default())
    }

    /// Build a provider using the base URL and request timeout from `settings`.
    pub fn with_settings(settings: &DashboardSettings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = match settings.request_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full URL of the markets listing.
    pub fn markets_url(&self) -> String {
        format!("{}/coins/markets", self.base_url)
    }

    /// Query string for a markets request: top N by descending market cap,
    /// with 24h change and without sparkline data.
    pub fn query_params(query: &MarketQuery) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", query.vs_currency.clone()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", query.per_page.to_string()),
            ("page", query.page.to_string()),
            ("sparkline", "false".to_string()),
            ("price_change_percentage", "24h".to_string()),
        ]
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a non-2xx response into the most specific error available:
/// the JSON body if it parses, the raw body text otherwise, and only a
/// generic status message when the body is empty.
pub fn error_from_response(status: u16, body: &str) -> CoreError {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Request failed with status code {status}"),
        };
    }
    let payload = serde_json::from_str::<serde_json::Value>(trimmed)
        .unwrap_or_else(|_| serde_json::Value::String(trimmed.to_string()));
    CoreError::ApiResponse {
        provider: PROVIDER.into(),
        status,
        body: payload,
    }
}

/// Decode a markets response body.
///
/// The body must be a JSON array. Elements without a string `id` are
/// skipped so one bad entry does not cost the whole snapshot; any other
/// field that is `null` or malformed decodes as empty and the record is kept.
pub fn decode_records(value: serde_json::Value) -> Result<Vec<CoinRecord>, CoreError> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Expected a JSON array of coins, got {}", json_kind(&other)),
            })
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<CoinRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!(index, error = %e, "Skipping malformed coin record"),
        }
    }
    Ok(records)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<CoinRecord>, CoreError> {
        let resp = self
            .client
            .get(self.markets_url())
            .query(&Self::query_params(query))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &body));
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse market listing: {e}"),
            })?;

        let records = decode_records(value)?;
        debug!(count = records.len(), "Decoded market listing");
        Ok(records)
    }
}
