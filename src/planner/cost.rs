use tracing::debug;

use crate::models::{CostBreakdown, CostLine, Portion, PriceSnapshot};
use crate::planner::config::PlannerConfig;
use crate::planner::constants::round2;

/// Turns ingredient quantities into money using a price snapshot.
///
/// Every line, subtotal, wastage and total is rounded to 2 decimals so the
/// reported figures add up exactly.
#[derive(Debug, Clone, Copy)]
pub struct CostEstimator {
    wastage_pct: f64,
    spice_allowance: f64,
}

impl CostEstimator {
    pub fn new(wastage_pct: f64, spice_allowance: f64) -> Self {
        Self {
            wastage_pct,
            spice_allowance,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.wastage_pct, config.spice_allowance)
    }

    /// Cost of one serving.
    ///
    /// `total = subtotal + spice + round2(subtotal * wastage)`.
    /// Ingredients without a price contribute 0 and are listed in `missing_prices`.
    pub fn estimate(&self, portions: &[Portion], snapshot: &PriceSnapshot) -> CostBreakdown {
        let mut lines = Vec::with_capacity(portions.len());
        let mut missing_prices = Vec::new();

        for portion in portions {
            let cost = match snapshot.get(&portion.ingredient) {
                Some(entry) => round2(entry.cost_for_grams(portion.grams)),
                None => {
                    missing_prices.push(portion.ingredient.clone());
                    0.0
                }
            };
            lines.push(CostLine {
                ingredient: portion.ingredient.clone(),
                grams: portion.grams,
                cost,
            });
        }

        let subtotal = round2(lines.iter().map(|l| l.cost).sum());
        let wastage_amount = round2(subtotal * self.wastage_pct);
        let total = round2(subtotal + self.spice_allowance + wastage_amount);

        if !missing_prices.is_empty() {
            debug!(
                location = %snapshot.location,
                missing = ?missing_prices,
                "costed with missing prices"
            );
        }

        CostBreakdown {
            lines,
            subtotal,
            spice_allowance: self.spice_allowance,
            wastage_amount,
            total,
            missing_prices,
        }
    }
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceEntry;
    use assert_float_eq::*;
    use std::collections::BTreeMap;

    fn snapshot() -> PriceSnapshot {
        let mut prices = BTreeMap::new();
        prices.insert("rice".to_string(), PriceEntry::per_kg(50.0, "test"));
        prices.insert("toor_dal".to_string(), PriceEntry::per_kg(150.0, "test"));
        prices.insert("milk".to_string(), PriceEntry::per_litre(56.0, "test"));
        prices.insert("egg".to_string(), PriceEntry::per_piece(7.0, 50.0, "test"));
        PriceSnapshot::new("test", prices)
    }

    #[test]
    fn test_breakdown_adds_up() {
        let estimator = CostEstimator::default();
        let portions = vec![
            Portion::new("rice", 120.0),
            Portion::new("toor_dal", 40.0),
            Portion::new("milk", 150.0),
        ];
        let cost = estimator.estimate(&portions, &snapshot());

        // 6.00 + 6.00 + 8.40
        assert_float_absolute_eq!(cost.subtotal, 20.4, 1e-9);
        assert_float_absolute_eq!(cost.wastage_amount, 1.43, 1e-9);
        assert_float_absolute_eq!(cost.total, 23.83, 1e-9);
        assert_float_absolute_eq!(
            cost.total,
            round2(cost.subtotal + cost.spice_allowance + cost.wastage_amount),
            1e-9
        );
        assert!(cost.missing_prices.is_empty());
    }

    #[test]
    fn test_per_piece_pricing() {
        let estimator = CostEstimator::new(0.0, 0.0);
        let cost = estimator.estimate(&[Portion::new("egg", 100.0)], &snapshot());
        assert_float_absolute_eq!(cost.total, 14.0, 1e-9);
    }

    #[test]
    fn test_missing_price_costs_nothing() {
        let estimator = CostEstimator::default();
        let cost = estimator.estimate(
            &[Portion::new("rice", 100.0), Portion::new("saffron", 1.0)],
            &snapshot(),
        );
        assert_eq!(cost.missing_prices, vec!["saffron".to_string()]);
        assert_eq!(cost.lines[1].cost, 0.0);
        assert_float_absolute_eq!(cost.subtotal, 5.0, 1e-9);
    }

    #[test]
    fn test_lines_are_rounded() {
        let estimator = CostEstimator::default();
        // 50 * 33 / 1000 = 1.65, 150 * 7 / 1000 = 1.05
        let cost = estimator.estimate(
            &[Portion::new("rice", 33.0), Portion::new("toor_dal", 7.0)],
            &snapshot(),
        );
        for line in &cost.lines {
            assert_float_absolute_eq!(line.cost, round2(line.cost), 1e-12);
        }
        assert_float_absolute_eq!(cost.subtotal, 2.7, 1e-9);
    }
}
