use std::collections::HashMap;

use crate::models::portfolio::PortfolioState;

/// Owner of the user's holdings.
///
/// Pure business logic, no I/O. Amounts are stored as given; negative or
/// non-finite values are the caller's responsibility.
#[derive(Debug, Clone, Default)]
pub struct PortfolioStore {
    state: PortfolioState,
}

impl PortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quantity held for `coin_id`, overwriting any previous amount.
    pub fn set_holding(&mut self, coin_id: impl Into<String>, amount: f64) {
        self.state.holdings.insert(coin_id.into(), amount);
    }

    /// Add `amount` to the current quantity (absent counts as zero).
    /// Returns the new quantity.
    pub fn add_to_holding(&mut self, coin_id: impl Into<String>, amount: f64) -> f64 {
        let coin_id = coin_id.into();
        let total = self.holding(&coin_id) + amount;
        self.set_holding(coin_id, total);
        total
    }

    /// Forget a holding. No-op when the coin is not held.
    pub fn remove_holding(&mut self, coin_id: &str) {
        self.state.holdings.remove(coin_id);
    }

    /// Quantity held; zero when the coin is not held.
    pub fn holding(&self, coin_id: &str) -> f64 {
        self.state.holdings.get(coin_id).copied().unwrap_or(0.0)
    }

    pub fn holdings(&self) -> &HashMap<String, f64> {
        &self.state.holdings
    }

    pub fn state(&self) -> &PortfolioState {
        &self.state
    }
}
