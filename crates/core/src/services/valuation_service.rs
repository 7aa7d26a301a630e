use std::collections::HashMap;

use crate::models::analytics::{HoldingValuation, PortfolioValuation};
use crate::models::chart::{TrendPoint, LABEL_24H_AGO, LABEL_NOW};
use crate::models::coin::CoinRecord;

/// Values the user's holdings against the current market snapshot.
///
/// All numbers come from the snapshot's spot price and 24h change; there is
/// no price history. Holdings of coins missing from the snapshot are skipped
/// (they contribute nothing and raise no error).
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Per-holding lines, totals and the two-point trend.
    pub fn value_portfolio(
        &self,
        entities: &HashMap<String, CoinRecord>,
        holdings: &HashMap<String, f64>,
    ) -> PortfolioValuation {
        let mut lines: Vec<HoldingValuation> = holdings
            .iter()
            .filter_map(|(coin_id, &amount)| {
                let coin = entities.get(coin_id)?;
                Some(Self::value_holding(coin, amount))
            })
            .collect();

        let total_value: f64 = lines.iter().map(|l| l.value).sum();
        let total_change: f64 = lines.iter().map(|l| l.change_contribution).sum();
        let total_change_percent = Self::change_percent(total_value, total_change);

        // Largest position first; ties broken by id so the order is stable
        lines.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.coin_id.cmp(&b.coin_id))
        });

        PortfolioValuation {
            total_value,
            total_change_percent,
            holdings: lines,
            chart: Self::trend(total_value, total_change_percent),
        }
    }

    /// Value of `amount` units of `coin`. Missing price or change count as 0.
    pub fn value_holding(coin: &CoinRecord, amount: f64) -> HoldingValuation {
        let price = coin.price_or_zero();
        let value = price * amount;
        let change_contribution = coin.change_24h_or_zero() / 100.0 * value;

        HoldingValuation {
            coin_id: coin.id.clone(),
            name: coin.name.clone(),
            symbol: coin.symbol.clone(),
            image: coin.image.clone(),
            amount,
            price,
            change_24h: coin.price_change_percentage_24h,
            value,
            change_contribution,
        }
    }

    /// Value-weighted change in percent; 0 for an empty or worthless portfolio.
    pub fn change_percent(total_value: f64, total_change: f64) -> f64 {
        if total_value > 0.0 {
            total_change / total_value * 100.0
        } else {
            0.0
        }
    }

    /// Two points: the value 24h ago and now.
    ///
    /// The past value is estimated linearly from the aggregate change,
    /// `now * (1 - pct / 100)`. It is an approximation, not recorded history.
    pub fn trend(total_value: f64, total_change_percent: f64) -> Vec<TrendPoint> {
        let previous = total_value * (1.0 - total_change_percent / 100.0);
        vec![
            TrendPoint::new(LABEL_24H_AGO, previous),
            TrendPoint::new(LABEL_NOW, total_value),
        ]
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_is_flat_without_change() {
        let points = ValuationService::trend(120.0, 0.0);
        assert_eq!(points[0].value, 120.0);
        assert_eq!(points[1].value, 120.0);
    }

    #[test]
    fn trend_after_total_loss_starts_at_double() {
        let points = ValuationService::trend(50.0, -100.0);
        assert_eq!(points[0].value, 100.0);
        assert_eq!(points[1].value, 50.0);
    }

    #[test]
    fn negative_change_estimates_higher_past_value() {
        let points = ValuationService::trend(90.0, -10.0);
        assert!((points[0].value - 99.0).abs() < 1e-9);
        assert_eq!(points[0].label, "24h Ago");
        assert_eq!(points[1].label, "Now");
    }

    #[test]
    fn positive_change_uses_linear_estimate() {
        let points = ValuationService::trend(300.0, 10.0);
        assert!((points[0].value - 270.0).abs() < 1e-9);
    }
}
