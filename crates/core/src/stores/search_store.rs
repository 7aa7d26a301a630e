use crate::models::search::{CoinFilter, FilterUpdate, SearchState};

/// Owner of the search box text and filter selections.
#[derive(Debug, Clone, Default)]
pub struct SearchStore {
    state: SearchState,
}

impl SearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the query verbatim. Case folding happens when filtering.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.state.query = text.into();
    }

    /// Merge the given fields into the current filter.
    pub fn set_filter(&mut self, update: FilterUpdate) {
        if let Some(top) = update.top {
            self.state.filter.top = top;
        }
        if let Some(price_change) = update.price_change {
            self.state.filter.price_change = price_change;
        }
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn filter(&self) -> CoinFilter {
        self.state.filter
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }
}
