use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::{PlanError, Result};
use crate::fuzzy::closest_match;
use crate::models::{Allergen, Ingredient, IngredientKind, Nutrition};

use crate::models::Allergen as A;
use crate::models::IngredientKind as K;

const fn ingredient(
    key: &'static str,
    kind: IngredientKind,
    allergens: &'static [Allergen],
    per_100g: Nutrition,
) -> Ingredient {
    Ingredient {
        key,
        per_100g,
        kind,
        allergens,
    }
}

/// Reference values per 100 g edible portion, raw weight.
///
/// Columns: kcal, protein g, carbs g, fat g, iron mg, vitamin A µg, fiber g.
/// Values follow the Indian Food Composition Tables, rounded.
static INGREDIENTS: LazyLock<Vec<Ingredient>> = LazyLock::new(|| {
    vec![
        // Grains
        ingredient("rice", K::Grain, &[], Nutrition::new(345.0, 6.8, 78.2, 0.5, 0.7, 0.0, 0.2)),
        ingredient("wheat_flour", K::Grain, &[A::Gluten], Nutrition::new(341.0, 12.1, 69.4, 1.7, 4.9, 29.0, 11.2)),
        ingredient("rava", K::Grain, &[A::Gluten], Nutrition::new(348.0, 10.4, 73.0, 0.8, 1.6, 0.0, 3.9)),
        ingredient("poha", K::Grain, &[], Nutrition::new(346.0, 6.6, 77.3, 1.2, 20.0, 0.0, 0.7)),
        ingredient("oats", K::Grain, &[A::Gluten], Nutrition::new(389.0, 16.9, 66.3, 6.9, 4.7, 0.0, 10.6)),
        ingredient("ragi", K::Grain, &[], Nutrition::new(328.0, 7.3, 72.0, 1.3, 3.9, 42.0, 11.5)),
        ingredient("jowar", K::Grain, &[], Nutrition::new(349.0, 10.4, 72.6, 1.9, 4.1, 47.0, 9.7)),
        ingredient("bajra", K::Grain, &[], Nutrition::new(361.0, 11.6, 67.5, 5.0, 8.0, 132.0, 11.3)),
        // Pulses
        ingredient("toor_dal", K::Pulse, &[], Nutrition::new(335.0, 22.3, 57.6, 1.7, 2.7, 132.0, 15.0)),
        ingredient("moong_dal", K::Pulse, &[], Nutrition::new(348.0, 24.5, 59.9, 1.2, 3.9, 49.0, 8.2)),
        ingredient("masoor_dal", K::Pulse, &[], Nutrition::new(343.0, 25.1, 59.0, 0.7, 7.6, 270.0, 10.7)),
        ingredient("chana_dal", K::Pulse, &[], Nutrition::new(360.0, 20.8, 59.8, 5.6, 5.3, 129.0, 17.0)),
        ingredient("urad_dal", K::Pulse, &[], Nutrition::new(347.0, 24.0, 59.6, 1.4, 3.8, 38.0, 18.0)),
        ingredient("rajma", K::Pulse, &[], Nutrition::new(346.0, 22.9, 60.6, 1.3, 5.1, 0.0, 24.9)),
        ingredient("chickpeas", K::Pulse, &[], Nutrition::new(360.0, 17.1, 60.9, 5.3, 4.6, 189.0, 17.0)),
        ingredient("besan", K::Pulse, &[], Nutrition::new(387.0, 22.4, 57.8, 6.7, 4.9, 0.0, 10.8)),
        ingredient("soy_chunks", K::Pulse, &[A::Soy], Nutrition::new(345.0, 52.0, 33.0, 0.5, 10.4, 0.0, 13.0)),
        // Vegetables
        ingredient("potato", K::Vegetable, &[], Nutrition::new(97.0, 1.6, 22.6, 0.1, 0.5, 24.0, 1.7)),
        ingredient("onion", K::Vegetable, &[], Nutrition::new(50.0, 1.2, 11.1, 0.1, 0.6, 0.0, 1.2)),
        ingredient("tomato", K::Vegetable, &[], Nutrition::new(20.0, 0.9, 3.6, 0.2, 0.6, 351.0, 1.2)),
        ingredient("spinach", K::Vegetable, &[], Nutrition::new(26.0, 2.0, 2.9, 0.7, 1.1, 5580.0, 2.5)),
        ingredient("carrot", K::Vegetable, &[], Nutrition::new(48.0, 0.9, 10.6, 0.2, 1.0, 1890.0, 2.8)),
        ingredient("cauliflower", K::Vegetable, &[], Nutrition::new(30.0, 2.6, 4.0, 0.4, 1.2, 30.0, 2.0)),
        ingredient("green_peas", K::Vegetable, &[], Nutrition::new(93.0, 7.2, 15.9, 0.1, 1.5, 83.0, 4.0)),
        ingredient("bottle_gourd", K::Vegetable, &[], Nutrition::new(12.0, 0.2, 2.5, 0.1, 0.5, 0.0, 0.6)),
        ingredient("cabbage", K::Vegetable, &[], Nutrition::new(27.0, 1.8, 4.6, 0.1, 0.8, 120.0, 2.0)),
        ingredient("pumpkin", K::Vegetable, &[], Nutrition::new(25.0, 1.4, 4.6, 0.1, 0.7, 50.0, 0.7)),
        // Fruits
        ingredient("banana", K::Fruit, &[], Nutrition::new(116.0, 1.2, 27.2, 0.3, 0.4, 78.0, 0.4)),
        ingredient("apple", K::Fruit, &[], Nutrition::new(59.0, 0.2, 13.4, 0.5, 0.7, 0.0, 1.0)),
        ingredient("guava", K::Fruit, &[], Nutrition::new(51.0, 0.9, 11.2, 0.3, 0.3, 0.0, 5.2)),
        ingredient("papaya", K::Fruit, &[], Nutrition::new(32.0, 0.6, 7.2, 0.1, 0.5, 666.0, 0.8)),
        // Dairy
        ingredient("milk", K::Dairy, &[A::Dairy], Nutrition::new(67.0, 3.2, 4.4, 4.1, 0.2, 53.0, 0.0)),
        ingredient("curd", K::Dairy, &[A::Dairy], Nutrition::new(60.0, 3.1, 3.0, 4.0, 0.2, 31.0, 0.0)),
        ingredient("paneer", K::Dairy, &[A::Dairy], Nutrition::new(265.0, 18.3, 1.2, 20.8, 0.2, 110.0, 0.0)),
        ingredient("ghee", K::Dairy, &[A::Dairy], Nutrition::new(900.0, 0.0, 0.0, 100.0, 0.0, 600.0, 0.0)),
        // Animal protein
        ingredient("egg", K::Egg, &[A::Egg], Nutrition::new(173.0, 13.3, 0.0, 13.3, 2.1, 420.0, 0.0)),
        ingredient("chicken", K::Meat, &[], Nutrition::new(109.0, 25.9, 0.0, 0.6, 1.3, 0.0, 0.0)),
        ingredient("fish", K::Fish, &[A::Fish], Nutrition::new(97.0, 16.6, 4.4, 1.4, 1.0, 0.0, 0.0)),
        // Fats, nuts, sweeteners
        ingredient("oil", K::Oil, &[], Nutrition::new(900.0, 0.0, 0.0, 100.0, 0.0, 0.0, 0.0)),
        ingredient("peanuts", K::Nut, &[A::Peanut], Nutrition::new(567.0, 25.3, 26.1, 40.1, 2.5, 37.0, 3.1)),
        ingredient("jaggery", K::Sweetener, &[], Nutrition::new(383.0, 0.4, 95.0, 0.1, 2.6, 168.0, 0.0)),
    ]
});

/// Read-only ingredient lookup keyed by ingredient key.
#[derive(Debug, Clone)]
pub struct NutritionDatabase {
    by_key: BTreeMap<&'static str, &'static Ingredient>,
}

impl NutritionDatabase {
    /// The built-in reference table.
    pub fn builtin() -> Self {
        let by_key = INGREDIENTS.iter().map(|i| (i.key, i)).collect();
        Self { by_key }
    }

    pub fn get(&self, key: &str) -> Option<&'static Ingredient> {
        self.by_key.get(key).copied()
    }

    /// Look up an ingredient, suggesting the closest known key on a miss.
    pub fn lookup(&self, key: &str) -> Result<&'static Ingredient> {
        self.get(key).ok_or_else(|| PlanError::UnknownIngredient {
            key: key.to_string(),
            suggestion: closest_match(key, self.keys()),
        })
    }

    /// Nutrition of `grams` of the ingredient.
    pub fn nutrition_for(&self, key: &str, grams: f64) -> Result<Nutrition> {
        Ok(self.lookup(key)?.per_100g.for_grams(grams))
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_key.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl Default for NutritionDatabase {
    fn default() -> Self {
        Self::builtin()
    }
}
