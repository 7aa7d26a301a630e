use serde::{Deserialize, Serialize};

/// One coin as returned by the market data endpoint.
///
/// Only `id` is mandatory. Every other field may be missing, `null` or of the
/// wrong type on the wire. Such a field decodes as empty (`""` / `None`)
/// instead of failing the whole record; the derived views treat a missing
/// number as "no signal" in filters and as zero in valuation math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    /// Stable key, e.g. "bitcoin"
    pub id: String,

    /// Ticker symbol as sent by the provider (usually lowercase, e.g. "btc")
    #[serde(default, deserialize_with = "lenient::string")]
    pub symbol: String,

    /// Display name (e.g. "Bitcoin")
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,

    /// Logo URI
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: String,

    /// Spot price in USD
    #[serde(default, deserialize_with = "lenient::number")]
    pub current_price: Option<f64>,

    /// Signed percent change over the last 24h
    #[serde(default, deserialize_with = "lenient::number")]
    pub price_change_percentage_24h: Option<f64>,

    /// Market capitalization in USD
    #[serde(default, deserialize_with = "lenient::number")]
    pub market_cap: Option<f64>,

    /// 1-based position by market cap
    #[serde(default, deserialize_with = "lenient::rank")]
    pub market_cap_rank: Option<u32>,
}

impl CoinRecord {
    /// Minimal record, mostly useful for tests and fixtures.
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            image: String::new(),
            current_price: None,
            price_change_percentage_24h: None,
            market_cap: None,
            market_cap_rank: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    pub fn with_change_24h(mut self, pct: f64) -> Self {
        self.price_change_percentage_24h = Some(pct);
        self
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.market_cap_rank = Some(rank);
        self
    }

    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    /// Price for valuation math; missing price counts as zero.
    pub fn price_or_zero(&self) -> f64 {
        self.current_price.filter(|p| p.is_finite()).unwrap_or(0.0)
    }

    /// 24h change for valuation math; missing change counts as zero.
    pub fn change_24h_or_zero(&self) -> f64 {
        self.price_change_percentage_24h
            .filter(|p| p.is_finite())
            .unwrap_or(0.0)
    }
}

/// Field decoders that never fail: a value of the wrong shape reads as empty.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            _ => String::new(),
        })
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Value::deserialize(deserializer)?.as_f64())
    }

    pub fn rank<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Value::deserialize(deserializer)?
            .as_u64()
            .and_then(|n| u32::try_from(n).ok()))
    }
}
