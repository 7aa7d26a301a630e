use std::collections::HashMap;

use crate::models::coin::CoinRecord;
use crate::models::search::{CoinFilter, PriceChangeFilter, SearchState};

/// Derives the visible price table from the market snapshot and the
/// current search state.
///
/// Pure logic, recomputed on every call.
pub struct FilterService;

impl FilterService {
    pub fn new() -> Self {
        Self
    }

    /// Coins that match the query and both filter predicates.
    ///
    /// Order follows the iteration order of `entities` and is therefore
    /// unspecified; callers that need a stable order sort the result.
    pub fn filter_coins<'a>(
        &self,
        entities: &'a HashMap<String, CoinRecord>,
        search: &SearchState,
    ) -> Vec<&'a CoinRecord> {
        let q = search.query.to_lowercase();
        entities
            .values()
            .filter(|coin| {
                Self::matches_query(coin, &q) && Self::matches_filter(coin, &search.filter)
            })
            .collect()
    }

    /// Case-insensitive substring match against name or symbol.
    /// `lowercase_query` must already be lowercased.
    pub fn matches_query(coin: &CoinRecord, lowercase_query: &str) -> bool {
        coin.name.to_lowercase().contains(lowercase_query)
            || coin.symbol.to_lowercase().contains(lowercase_query)
    }

    /// Rank tier and 24h change sign. A coin without a rank never passes the
    /// tier; a coin without a change passes only `All`.
    pub fn matches_filter(coin: &CoinRecord, filter: &CoinFilter) -> bool {
        let in_tier = coin
            .market_cap_rank
            .is_some_and(|rank| rank <= filter.top.max_rank());

        let change = coin.price_change_percentage_24h;
        let change_ok = match filter.price_change {
            PriceChangeFilter::All => true,
            PriceChangeFilter::Positive => change.is_some_and(|c| c > 0.0),
            PriceChangeFilter::Negative => change.is_some_and(|c| c < 0.0),
        };

        in_tier && change_ok
    }
}

impl Default for FilterService {
    fn default() -> Self {
        Self::new()
    }
}
