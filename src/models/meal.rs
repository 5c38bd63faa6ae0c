use std::fmt;

use serde::{Deserialize, Serialize};

/// A meal occasion within a day, in serving order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Snack1,
    Lunch,
    Snack2,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 5] = [
        MealSlot::Breakfast,
        MealSlot::Snack1,
        MealSlot::Lunch,
        MealSlot::Snack2,
        MealSlot::Dinner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Snack1 => "snack1",
            MealSlot::Lunch => "lunch",
            MealSlot::Snack2 => "snack2",
            MealSlot::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Grain staple classes subject to the rotation cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Staple {
    Rice,
    Wheat,
    Millet,
}

impl fmt::Display for Staple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Staple::Rice => "rice",
            Staple::Wheat => "wheat",
            Staple::Millet => "millet",
        })
    }
}

/// One ingredient line of a dish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portion {
    pub ingredient: String,
    pub grams: f64,
}

impl Portion {
    pub fn new(ingredient: impl Into<String>, grams: f64) -> Self {
        Self {
            ingredient: ingredient.into(),
            grams,
        }
    }
}

/// A named dish that can fill exactly one slot.
///
/// Rotation tags are explicit fields; they are validated against the
/// ingredient list when the catalog is built and never re-derived from names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealOption {
    pub name: String,
    pub slot: MealSlot,
    pub ingredients: Vec<Portion>,
    #[serde(default)]
    pub staple: Option<Staple>,
    /// Key of the pulse ingredient this dish is built around.
    #[serde(default)]
    pub pulse: Option<String>,
    pub variety_bucket: String,
}

impl MealOption {
    pub fn total_grams(&self) -> f64 {
        self.ingredients.iter().map(|p| p.grams).sum()
    }
}
