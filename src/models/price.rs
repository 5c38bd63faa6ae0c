use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a unit price is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "unit")]
pub enum PriceUnit {
    PerKg,
    PerLitre,
    /// Counted items. Recipe grams are converted to pieces through `grams_per_piece`.
    PerPiece { grams_per_piece: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub unit_price: f64,
    #[serde(flatten)]
    pub unit: PriceUnit,
    pub source: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PriceEntry {
    pub fn per_kg(unit_price: f64, source: impl Into<String>) -> Self {
        Self {
            unit_price,
            unit: PriceUnit::PerKg,
            source: source.into(),
            updated_at: None,
        }
    }

    pub fn per_litre(unit_price: f64, source: impl Into<String>) -> Self {
        Self {
            unit_price,
            unit: PriceUnit::PerLitre,
            source: source.into(),
            updated_at: None,
        }
    }

    pub fn per_piece(unit_price: f64, grams_per_piece: f64, source: impl Into<String>) -> Self {
        Self {
            unit_price,
            unit: PriceUnit::PerPiece { grams_per_piece },
            source: source.into(),
            updated_at: None,
        }
    }

    /// Unrounded cost of `grams` of this item.
    ///
    /// Litre prices treat 1 g as 1 ml.
    pub fn cost_for_grams(&self, grams: f64) -> f64 {
        match self.unit {
            PriceUnit::PerKg | PriceUnit::PerLitre => self.unit_price * grams / 1000.0,
            PriceUnit::PerPiece { grams_per_piece } if grams_per_piece > 0.0 => {
                self.unit_price * grams / grams_per_piece
            }
            PriceUnit::PerPiece { .. } => 0.0,
        }
    }
}

/// Prices for one location at one point in time. Read-only for a generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub location: String,
    pub prices: BTreeMap<String, PriceEntry>,
}

impl PriceSnapshot {
    pub fn new(location: impl Into<String>, prices: BTreeMap<String, PriceEntry>) -> Self {
        Self {
            location: location.into(),
            prices,
        }
    }

    pub fn get(&self, key: &str) -> Option<&PriceEntry> {
        self.prices.get(key)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
