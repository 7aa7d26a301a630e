use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The user's declared holdings: coin id → quantity.
///
/// Holdings are independent of market data. A coin id that is missing from
/// the latest snapshot stays here until the user removes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub holdings: HashMap<String, f64>,
}
