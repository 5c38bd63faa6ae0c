use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{PriceEntry, PriceSnapshot};

/// Source label of the built-in prices.
pub const FALLBACK_SOURCE: &str = "fallback";

/// Supplies the price snapshot for one generation run.
///
/// Implementations may fetch prices however they like before the engine runs;
/// the engine only ever sees the finished snapshot.
pub trait PriceProvider {
    fn snapshot(&self, location: &str) -> PriceSnapshot;
}

/// Built-in retail prices (INR), used whenever no live price is known.
///
/// Eggs are priced per piece with 50 g of recipe weight standing for one egg.
pub fn fallback_prices() -> BTreeMap<String, PriceEntry> {
    let per_kg: [(&str, f64); 37] = [
        ("rice", 52.0),
        ("wheat_flour", 45.0),
        ("rava", 50.0),
        ("poha", 60.0),
        ("oats", 180.0),
        ("ragi", 60.0),
        ("jowar", 55.0),
        ("bajra", 45.0),
        ("toor_dal", 150.0),
        ("moong_dal", 125.0),
        ("masoor_dal", 105.0),
        ("chana_dal", 95.0),
        ("urad_dal", 130.0),
        ("rajma", 140.0),
        ("chickpeas", 110.0),
        ("besan", 100.0),
        ("soy_chunks", 160.0),
        ("potato", 30.0),
        ("onion", 35.0),
        ("tomato", 30.0),
        ("spinach", 40.0),
        ("carrot", 50.0),
        ("cauliflower", 40.0),
        ("green_peas", 80.0),
        ("bottle_gourd", 30.0),
        ("cabbage", 25.0),
        ("pumpkin", 30.0),
        ("banana", 60.0),
        ("apple", 160.0),
        ("guava", 80.0),
        ("papaya", 40.0),
        ("curd", 70.0),
        ("paneer", 400.0),
        ("ghee", 600.0),
        ("chicken", 240.0),
        ("fish", 220.0),
        ("peanuts", 140.0),
    ];

    let mut prices: BTreeMap<String, PriceEntry> = per_kg
        .into_iter()
        .map(|(key, price)| (key.to_string(), PriceEntry::per_kg(price, FALLBACK_SOURCE)))
        .collect();

    prices.insert("jaggery".to_string(), PriceEntry::per_kg(70.0, FALLBACK_SOURCE));
    prices.insert("milk".to_string(), PriceEntry::per_litre(56.0, FALLBACK_SOURCE));
    prices.insert("oil".to_string(), PriceEntry::per_litre(150.0, FALLBACK_SOURCE));
    prices.insert("egg".to_string(), PriceEntry::per_piece(7.0, 50.0, FALLBACK_SOURCE));
    prices
}

/// Fallback prices with an optional live snapshot merged over them.
#[derive(Debug, Clone)]
pub struct FallbackPriceProvider {
    defaults: BTreeMap<String, PriceEntry>,
    live: BTreeMap<String, PriceEntry>,
}

impl FallbackPriceProvider {
    pub fn new() -> Self {
        Self {
            defaults: fallback_prices(),
            live: BTreeMap::new(),
        }
    }

    /// Replace the live overrides wholesale.
    pub fn with_live(mut self, live: BTreeMap<String, PriceEntry>) -> Self {
        self.live = live;
        self
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl Default for FallbackPriceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceProvider for FallbackPriceProvider {
    fn snapshot(&self, location: &str) -> PriceSnapshot {
        let mut prices = self.defaults.clone();
        for (key, entry) in &self.live {
            prices.insert(key.clone(), entry.clone());
        }
        debug!(
            location,
            total = prices.len(),
            live = self.live.len(),
            "built price snapshot"
        );
        PriceSnapshot::new(location, prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NutritionDatabase;
    use crate::models::PriceUnit;

    #[test]
    fn test_fallback_covers_every_ingredient() {
        let db = NutritionDatabase::builtin();
        let prices = fallback_prices();
        for key in db.keys() {
            assert!(prices.contains_key(key), "no fallback price for {}", key);
        }
    }

    #[test]
    fn test_live_prices_override_defaults() {
        let mut live = BTreeMap::new();
        live.insert("rice".to_string(), PriceEntry::per_kg(64.0, "mandi"));
        let provider = FallbackPriceProvider::new().with_live(live);

        let snapshot = provider.snapshot("pune");
        assert_eq!(snapshot.location, "pune");
        let rice = snapshot.get("rice").unwrap();
        assert_eq!(rice.unit_price, 64.0);
        assert_eq!(rice.source, "mandi");
        // untouched entries keep the fallback
        assert_eq!(snapshot.get("onion").unwrap().source, FALLBACK_SOURCE);
    }

    #[test]
    fn test_egg_priced_per_piece() {
        let prices = fallback_prices();
        assert_eq!(
            prices["egg"].unit,
            PriceUnit::PerPiece {
                grams_per_piece: 50.0
            }
        );
    }
}
