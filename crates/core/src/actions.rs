use serde::{Deserialize, Serialize};

use crate::models::search::FilterUpdate;
use crate::models::theme::ThemeMode;

/// A user action coming from the presentation layer.
///
/// Each variant maps to exactly one store operation; see
/// [`CoinDashboard::dispatch`](crate::CoinDashboard::dispatch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DashboardAction {
    SetQuery(String),
    SetFilter(FilterUpdate),
    SetHolding { coin_id: String, amount: f64 },
    /// Add to the existing amount instead of overwriting it
    AddToHolding { coin_id: String, amount: f64 },
    RemoveHolding(String),
    ToggleTheme,
    SetTheme(ThemeMode),
}
