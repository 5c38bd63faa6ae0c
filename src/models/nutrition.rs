use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Nutrient amounts, either per 100 g of an ingredient or for a whole serving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub iron_mg: f64,
    pub vitamin_a_ug: f64,
    pub fiber_g: f64,
}

impl Nutrition {
    pub const fn new(
        calories: f64,
        protein_g: f64,
        carbs_g: f64,
        fat_g: f64,
        iron_mg: f64,
        vitamin_a_ug: f64,
        fiber_g: f64,
    ) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
            iron_mg,
            vitamin_a_ug,
            fiber_g,
        }
    }

    /// Nutrition for `grams` of an ingredient whose values are per 100 g.
    pub fn for_grams(&self, grams: f64) -> Self {
        self.scale(grams / 100.0)
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein_g: self.protein_g * factor,
            carbs_g: self.carbs_g * factor,
            fat_g: self.fat_g * factor,
            iron_mg: self.iron_mg * factor,
            vitamin_a_ug: self.vitamin_a_ug * factor,
            fiber_g: self.fiber_g * factor,
        }
    }
}

impl Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition {
            calories: self.calories + other.calories,
            protein_g: self.protein_g + other.protein_g,
            carbs_g: self.carbs_g + other.carbs_g,
            fat_g: self.fat_g + other.fat_g,
            iron_mg: self.iron_mg + other.iron_mg,
            vitamin_a_ug: self.vitamin_a_ug + other.vitamin_a_ug,
            fiber_g: self.fiber_g + other.fiber_g,
        }
    }
}

impl AddAssign for Nutrition {
    fn add_assign(&mut self, other: Nutrition) {
        *self = *self + other;
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::default(), |acc, n| acc + n)
    }
}

/// Broad ingredient class, used to derive dietary suitability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientKind {
    Grain,
    Pulse,
    Vegetable,
    Fruit,
    Dairy,
    Egg,
    Meat,
    Fish,
    Oil,
    Nut,
    Spice,
    Sweetener,
}

impl IngredientKind {
    /// Excluded from a vegetarian (lacto-vegetarian) diet.
    pub fn is_non_vegetarian(self) -> bool {
        matches!(self, Self::Egg | Self::Meat | Self::Fish)
    }

    /// Any animal-derived product.
    pub fn is_animal_product(self) -> bool {
        self.is_non_vegetarian() || self == Self::Dairy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allergen {
    Gluten,
    Dairy,
    Egg,
    Peanut,
    TreeNut,
    Soy,
    Fish,
    Sesame,
}

impl Allergen {
    pub const ALL: [Allergen; 8] = [
        Allergen::Gluten,
        Allergen::Dairy,
        Allergen::Egg,
        Allergen::Peanut,
        Allergen::TreeNut,
        Allergen::Soy,
        Allergen::Fish,
        Allergen::Sesame,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Allergen::Gluten => "gluten",
            Allergen::Dairy => "dairy",
            Allergen::Egg => "egg",
            Allergen::Peanut => "peanut",
            Allergen::TreeNut => "tree_nut",
            Allergen::Soy => "soy",
            Allergen::Fish => "fish",
            Allergen::Sesame => "sesame",
        }
    }
}

impl fmt::Display for Allergen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Allergen {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Allergen::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or(())
    }
}

/// A reference ingredient: nutrition per 100 g plus the facts needed for dietary filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub key: &'static str,
    pub per_100g: Nutrition,
    pub kind: IngredientKind,
    pub allergens: &'static [Allergen],
}
