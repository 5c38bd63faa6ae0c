use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::catalog::NutritionDatabase;
use crate::error::{PlanError, Result};
use crate::models::{
    Allergen, DietaryConstraint, IngredientKind, MealOption, MealSlot, Nutrition, Portion, Staple,
};

/// A catalog option with everything the selector needs resolved up front.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub option: MealOption,
    /// Nutrition of the option at its catalog portion sizes.
    pub nutrition: Nutrition,
    pub kinds: BTreeSet<IngredientKind>,
    pub allergens: BTreeSet<Allergen>,
}

impl CatalogEntry {
    /// True when no meat, fish or egg ingredient is present.
    pub fn is_vegetarian(&self) -> bool {
        !self.kinds.iter().any(|k| k.is_non_vegetarian())
    }

    pub fn is_vegan(&self) -> bool {
        !self.kinds.iter().any(|k| k.is_animal_product())
    }

    pub fn satisfies(&self, constraint: DietaryConstraint) -> bool {
        match constraint {
            DietaryConstraint::Vegetarian => self.is_vegetarian(),
            DietaryConstraint::Vegan => self.is_vegan(),
            DietaryConstraint::Eggless => !self.kinds.contains(&IngredientKind::Egg),
            DietaryConstraint::AllergenFree(allergen) => !self.allergens.contains(&allergen),
        }
    }

    pub fn satisfies_all(&self, constraints: &BTreeSet<DietaryConstraint>) -> bool {
        constraints.iter().all(|c| self.satisfies(*c))
    }
}

/// The pool of meal options, in catalog order. Indices into it are stable.
#[derive(Debug, Clone, Default)]
pub struct MealCatalog {
    entries: Vec<CatalogEntry>,
}

impl MealCatalog {
    /// Resolve and validate `options` against the nutrition database.
    ///
    /// Fails on unknown ingredients, non-positive grams, duplicate names, a pulse
    /// tag that is not a pulse ingredient of the dish, or a staple tag on a dish
    /// with no grain.
    pub fn new(options: Vec<MealOption>, db: &NutritionDatabase) -> Result<Self> {
        let mut names = HashSet::new();
        let mut entries = Vec::with_capacity(options.len());

        for option in options {
            if !names.insert(option.name.to_lowercase()) {
                return Err(PlanError::InvalidCatalog(format!(
                    "duplicate meal option '{}'",
                    option.name
                )));
            }
            entries.push(resolve(option, db)?);
        }

        debug!(options = entries.len(), "meal catalog loaded");
        Ok(Self { entries })
    }

    /// The built-in catalog.
    pub fn builtin(db: &NutritionDatabase) -> Result<Self> {
        Self::new(builtin_options(), db)
    }

    pub fn all(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Entries for one slot, with their catalog indices.
    pub fn for_slot(&self, slot: MealSlot) -> impl Iterator<Item = (usize, &CatalogEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.option.slot == slot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn resolve(option: MealOption, db: &NutritionDatabase) -> Result<CatalogEntry> {
    if option.ingredients.is_empty() {
        return Err(PlanError::InvalidCatalog(format!(
            "'{}' has no ingredients",
            option.name
        )));
    }

    let mut nutrition = Nutrition::default();
    let mut kinds = BTreeSet::new();
    let mut allergens = BTreeSet::new();

    for portion in &option.ingredients {
        if !portion.grams.is_finite() || portion.grams <= 0.0 {
            return Err(PlanError::InvalidCatalog(format!(
                "'{}' has a non-positive amount of {}",
                option.name, portion.ingredient
            )));
        }
        let ingredient = db.lookup(&portion.ingredient)?;
        nutrition += ingredient.per_100g.for_grams(portion.grams);
        kinds.insert(ingredient.kind);
        allergens.extend(ingredient.allergens.iter().copied());
    }

    if let Some(pulse) = &option.pulse {
        let is_pulse_of_dish = option.ingredients.iter().any(|p| &p.ingredient == pulse)
            && db.lookup(pulse)?.kind == IngredientKind::Pulse;
        if !is_pulse_of_dish {
            return Err(PlanError::InvalidCatalog(format!(
                "'{}' is tagged with pulse '{}' but does not contain it as a pulse",
                option.name, pulse
            )));
        }
    }

    if option.staple.is_some() && !kinds.contains(&IngredientKind::Grain) {
        return Err(PlanError::InvalidCatalog(format!(
            "'{}' is tagged with a staple but contains no grain",
            option.name
        )));
    }

    Ok(CatalogEntry {
        option,
        nutrition,
        kinds,
        allergens,
    })
}

fn dish(
    name: &str,
    slot: MealSlot,
    staple: Option<Staple>,
    pulse: Option<&str>,
    bucket: &str,
    ingredients: &[(&str, f64)],
) -> MealOption {
    MealOption {
        name: name.to_string(),
        slot,
        ingredients: ingredients
            .iter()
            .map(|(key, grams)| Portion::new(*key, *grams))
            .collect(),
        staple,
        pulse: pulse.map(str::to_string),
        variety_bucket: bucket.to_string(),
    }
}

/// Default regional menu: vegetarian-leaning with a few egg, chicken and fish dishes.
pub fn builtin_options() -> Vec<MealOption> {
    use MealSlot::*;
    use Staple::*;

    vec![
        // Breakfast
        dish("Vegetable Poha", Breakfast, Some(Rice), None, "poha",
            &[("poha", 60.0), ("onion", 30.0), ("green_peas", 20.0), ("peanuts", 10.0), ("oil", 5.0)]),
        dish("Ragi Dosa with Sambar", Breakfast, Some(Millet), Some("toor_dal"), "dosa",
            &[("ragi", 50.0), ("urad_dal", 15.0), ("toor_dal", 20.0), ("tomato", 30.0), ("oil", 5.0)]),
        dish("Moong Dal Chilla with Curd", Breakfast, None, Some("moong_dal"), "chilla",
            &[("moong_dal", 60.0), ("onion", 20.0), ("tomato", 20.0), ("oil", 5.0), ("curd", 50.0)]),
        dish("Vegetable Upma", Breakfast, Some(Wheat), None, "upma",
            &[("rava", 60.0), ("carrot", 20.0), ("green_peas", 20.0), ("oil", 5.0), ("peanuts", 5.0)]),
        dish("Masala Oats with Milk", Breakfast, None, None, "oats",
            &[("oats", 50.0), ("milk", 200.0), ("carrot", 20.0), ("onion", 20.0)]),
        dish("Egg Bhurji with Roti", Breakfast, Some(Wheat), None, "egg",
            &[("egg", 100.0), ("wheat_flour", 60.0), ("onion", 30.0), ("tomato", 20.0), ("oil", 5.0)]),
        dish("Aloo Paratha with Curd", Breakfast, Some(Wheat), None, "paratha",
            &[("wheat_flour", 70.0), ("potato", 80.0), ("ghee", 5.0), ("curd", 100.0)]),
        // Mid-morning snack
        dish("Banana and Peanuts", Snack1, None, None, "fruit_nuts",
            &[("banana", 120.0), ("peanuts", 20.0)]),
        dish("Sprouted Moong Salad", Snack1, None, Some("moong_dal"), "sprouts",
            &[("moong_dal", 40.0), ("onion", 20.0), ("tomato", 30.0), ("carrot", 20.0)]),
        dish("Guava and Roasted Chana", Snack1, None, Some("chickpeas"), "roasted_chana",
            &[("guava", 100.0), ("chickpeas", 30.0)]),
        dish("Papaya Curd Bowl", Snack1, None, None, "fruit_bowl",
            &[("papaya", 150.0), ("curd", 100.0)]),
        dish("Buttermilk and Apple", Snack1, None, None, "dairy_fruit",
            &[("curd", 150.0), ("apple", 100.0)]),
        // Lunch
        dish("Rice with Toor Dal and Spinach", Lunch, Some(Rice), Some("toor_dal"), "dal_rice",
            &[("rice", 90.0), ("toor_dal", 40.0), ("spinach", 80.0), ("ghee", 5.0), ("oil", 5.0)]),
        dish("Roti with Rajma and Salad", Lunch, Some(Wheat), Some("rajma"), "rajma",
            &[("wheat_flour", 90.0), ("rajma", 50.0), ("onion", 30.0), ("tomato", 40.0), ("oil", 5.0)]),
        dish("Jowar Roti with Chana Dal and Cabbage", Lunch, Some(Millet), Some("chana_dal"), "millet_roti",
            &[("jowar", 90.0), ("chana_dal", 40.0), ("cabbage", 80.0), ("oil", 8.0)]),
        dish("Vegetable Pulao with Masoor Dal", Lunch, Some(Rice), Some("masoor_dal"), "pulao",
            &[("rice", 90.0), ("masoor_dal", 40.0), ("carrot", 40.0), ("green_peas", 30.0), ("oil", 8.0)]),
        dish("Chole with Roti", Lunch, Some(Wheat), Some("chickpeas"), "chole",
            &[("wheat_flour", 90.0), ("chickpeas", 50.0), ("onion", 30.0), ("tomato", 40.0), ("oil", 8.0)]),
        dish("Chicken Curry with Rice", Lunch, Some(Rice), None, "chicken_curry",
            &[("rice", 90.0), ("chicken", 100.0), ("onion", 40.0), ("tomato", 40.0), ("oil", 10.0)]),
        dish("Curd Rice with Moong Dal", Lunch, Some(Rice), Some("moong_dal"), "curd_rice",
            &[("rice", 80.0), ("curd", 150.0), ("moong_dal", 30.0), ("carrot", 20.0)]),
        // Evening snack
        dish("Roasted Peanut Chaat", Snack2, None, None, "chaat",
            &[("peanuts", 30.0), ("onion", 20.0), ("tomato", 20.0)]),
        dish("Besan Cheela Bites", Snack2, None, Some("besan"), "cheela",
            &[("besan", 35.0), ("onion", 20.0), ("oil", 5.0)]),
        dish("Soy Chunk Stir Fry", Snack2, None, Some("soy_chunks"), "soy",
            &[("soy_chunks", 25.0), ("onion", 20.0), ("tomato", 20.0), ("oil", 5.0)]),
        dish("Ragi Malt with Jaggery", Snack2, Some(Millet), None, "malt",
            &[("ragi", 25.0), ("milk", 200.0), ("jaggery", 10.0)]),
        dish("Boiled Egg and Banana", Snack2, None, None, "egg_snack",
            &[("egg", 100.0), ("banana", 100.0)]),
        // Dinner
        dish("Roti with Dal Tadka and Lauki", Dinner, Some(Wheat), Some("moong_dal"), "dal_roti",
            &[("wheat_flour", 80.0), ("moong_dal", 40.0), ("bottle_gourd", 100.0), ("oil", 8.0)]),
        dish("Bajra Roti with Palak Paneer", Dinner, Some(Millet), None, "palak_paneer",
            &[("bajra", 80.0), ("spinach", 100.0), ("paneer", 50.0), ("oil", 5.0)]),
        dish("Khichdi with Pumpkin", Dinner, Some(Rice), Some("moong_dal"), "khichdi",
            &[("rice", 70.0), ("moong_dal", 40.0), ("pumpkin", 80.0), ("ghee", 5.0)]),
        dish("Fish Curry with Rice", Dinner, Some(Rice), None, "fish_curry",
            &[("rice", 80.0), ("fish", 100.0), ("tomato", 40.0), ("onion", 30.0), ("oil", 8.0)]),
        dish("Roti with Masoor Dal and Gobi", Dinner, Some(Wheat), Some("masoor_dal"), "masoor_roti",
            &[("wheat_flour", 80.0), ("masoor_dal", 40.0), ("cauliflower", 100.0), ("oil", 8.0)]),
        dish("Ragi Mudde with Sambar", Dinner, Some(Millet), Some("toor_dal"), "mudde",
            &[("ragi", 80.0), ("toor_dal", 40.0), ("tomato", 40.0), ("carrot", 30.0), ("oil", 5.0)]),
        dish("Paneer Vegetable Pulao", Dinner, Some(Rice), None, "paneer_pulao",
            &[("rice", 80.0), ("paneer", 40.0), ("green_peas", 30.0), ("carrot", 30.0), ("oil", 8.0)]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MealCatalog {
        MealCatalog::builtin(&NutritionDatabase::builtin()).unwrap()
    }

    #[test]
    fn test_builtin_catalog_resolves() {
        let catalog = catalog();
        assert_eq!(catalog.len(), builtin_options().len());
        for slot in MealSlot::ALL {
            assert!(catalog.for_slot(slot).count() >= 4, "thin slot {}", slot);
        }
    }

    #[test]
    fn test_vegetarian_flag_derived_from_ingredients() {
        let catalog = catalog();
        let find = |name: &str| {
            catalog
                .all()
                .iter()
                .find(|e| e.option.name == name)
                .unwrap()
        };

        assert!(!find("Egg Bhurji with Roti").is_vegetarian());
        assert!(!find("Fish Curry with Rice").is_vegetarian());
        assert!(find("Aloo Paratha with Curd").is_vegetarian());
        assert!(!find("Aloo Paratha with Curd").is_vegan());
        assert!(find("Chole with Roti").is_vegan());
    }

    #[test]
    fn test_allergen_constraint() {
        let catalog = catalog();
        let poha = catalog
            .all()
            .iter()
            .find(|e| e.option.name == "Vegetable Poha")
            .unwrap();
        assert!(!poha.satisfies(DietaryConstraint::AllergenFree(Allergen::Peanut)));
        assert!(poha.satisfies(DietaryConstraint::AllergenFree(Allergen::Gluten)));
    }

    #[test]
    fn test_unknown_ingredient_rejected() {
        let db = NutritionDatabase::builtin();
        let bad = dish("Mystery", MealSlot::Lunch, None, None, "x", &[("unobtanium", 50.0)]);
        assert!(matches!(
            MealCatalog::new(vec![bad], &db),
            Err(PlanError::UnknownIngredient { .. })
        ));
    }

    #[test]
    fn test_pulse_tag_must_match_ingredient() {
        let db = NutritionDatabase::builtin();
        let bad = dish(
            "Plain Rice",
            MealSlot::Lunch,
            Some(Staple::Rice),
            Some("toor_dal"),
            "rice",
            &[("rice", 100.0)],
        );
        assert!(matches!(
            MealCatalog::new(vec![bad], &db),
            Err(PlanError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let db = NutritionDatabase::builtin();
        let a = dish("Same", MealSlot::Lunch, None, None, "x", &[("rice", 100.0)]);
        let b = a.clone();
        assert!(matches!(
            MealCatalog::new(vec![a, b], &db),
            Err(PlanError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_for_slot_keeps_catalog_indices() {
        let catalog = catalog();
        for (idx, entry) in catalog.for_slot(MealSlot::Dinner) {
            assert_eq!(catalog.get(idx), Some(entry));
            assert_eq!(entry.option.slot, MealSlot::Dinner);
        }
    }
}
