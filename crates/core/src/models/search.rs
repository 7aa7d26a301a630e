use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// Market cap rank cut-off for the price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RankTier {
    /// Ranks 1..=10
    #[default]
    #[serde(rename = "10")]
    Top10,
    /// Ranks 1..=50
    #[serde(rename = "50")]
    Top50,
}

impl RankTier {
    /// Highest rank (inclusive) that passes this tier.
    pub fn max_rank(self) -> u32 {
        match self {
            RankTier::Top10 => 10,
            RankTier::Top50 => 50,
        }
    }
}

impl std::fmt::Display for RankTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.max_rank())
    }
}

impl FromStr for RankTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "10" => Ok(RankTier::Top10),
            "50" => Ok(RankTier::Top50),
            other => Err(CoreError::ValidationError(format!(
                "Unknown rank tier '{other}': expected 10 or 50"
            ))),
        }
    }
}

/// Sign filter on the 24h price change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceChangeFilter {
    #[default]
    All,
    Positive,
    Negative,
}

impl std::fmt::Display for PriceChangeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceChangeFilter::All => write!(f, "all"),
            PriceChangeFilter::Positive => write!(f, "positive"),
            PriceChangeFilter::Negative => write!(f, "negative"),
        }
    }
}

impl FromStr for PriceChangeFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PriceChangeFilter::All),
            "positive" => Ok(PriceChangeFilter::Positive),
            "negative" => Ok(PriceChangeFilter::Negative),
            other => Err(CoreError::ValidationError(format!(
                "Unknown price change filter '{other}': expected all, positive or negative"
            ))),
        }
    }
}

/// Active filter predicates for the price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoinFilter {
    pub top: RankTier,
    pub price_change: PriceChangeFilter,
}

/// Partial filter update. `None` fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterUpdate {
    #[serde(default)]
    pub top: Option<RankTier>,
    #[serde(default)]
    pub price_change: Option<PriceChangeFilter>,
}

impl FilterUpdate {
    pub fn top(tier: RankTier) -> Self {
        Self {
            top: Some(tier),
            price_change: None,
        }
    }

    pub fn price_change(change: PriceChangeFilter) -> Self {
        Self {
            top: None,
            price_change: Some(change),
        }
    }
}

/// Search box text plus filter selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    /// Raw query text, stored verbatim
    pub query: String,
    pub filter: CoinFilter,
}
