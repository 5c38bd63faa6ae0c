use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::{ActivityLevel, Gender, Goal, MealSlot};

// ─────────────────────────────────────────────────────────────────────────────
// Energy and protein
// ─────────────────────────────────────────────────────────────────────────────

/// Mifflin-St Jeor coefficients.
pub const MSJ_WEIGHT_COEF: f64 = 10.0;
pub const MSJ_HEIGHT_COEF: f64 = 6.25;
pub const MSJ_AGE_COEF: f64 = -5.0;
pub const MSJ_MALE_CONSTANT: f64 = 5.0;
pub const MSJ_FEMALE_CONSTANT: f64 = -161.0;

/// Share of calories from protein.
pub const PROTEIN_ENERGY_SHARE: f64 = 0.18;

/// Energy per gram of protein.
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;

/// Age at which adult goal multipliers and clamps apply.
pub const ADULT_AGE: i32 = 18;

/// Adolescent band (15-17) handled by formula rather than program standards.
pub const ADOLESCENT_MIN_AGE: i32 = 15;

/// Realistic daily calorie bands.
pub const ADULT_KCAL_RANGE: (f64, f64) = (1800.0, 2200.0);
pub const ADOLESCENT_KCAL_RANGE: (f64, f64) = (1800.0, 2000.0);
pub const CHILD_KCAL_RANGE: (f64, f64) = (1500.0, 1800.0);

/// Meal-level program standards are scaled by this to approximate a full day.
pub const DEFAULT_CHILD_DAY_MULTIPLIER: f64 = 2.3;

pub fn activity_factor(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::High => 1.75,
    }
}

pub fn goal_multiplier(goal: Goal) -> f64 {
    match goal {
        Goal::Maintain => 1.0,
        Goal::Lose => 0.88,
        Goal::Gain => 1.12,
    }
}

/// A child age band with its meal-level program standard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildBand {
    pub name: &'static str,
    pub min_age: i32,
    pub max_age: i32,
    pub meal_kcal: f64,
    pub meal_protein_g: f64,
}

pub const CHILD_BANDS: [ChildBand; 3] = [
    ChildBand {
        name: "pre-school",
        min_age: 0,
        max_age: 5,
        meal_kcal: 500.0,
        meal_protein_g: 12.0,
    },
    ChildBand {
        name: "primary",
        min_age: 6,
        max_age: 10,
        meal_kcal: 450.0,
        meal_protein_g: 12.0,
    },
    ChildBand {
        name: "upper-primary",
        min_age: 11,
        max_age: 14,
        meal_kcal: 700.0,
        meal_protein_g: 20.0,
    },
];

pub fn child_band(age: i32) -> Option<&'static ChildBand> {
    CHILD_BANDS
        .iter()
        .find(|b| (b.min_age..=b.max_age).contains(&age))
}

/// Daily (iron mg, vitamin A µg) reference intake by age and gender.
pub fn micronutrient_reference(age: i32, gender: Gender) -> (f64, f64) {
    match (age, gender) {
        (..=5, _) => (9.0, 400.0),
        (6..=10, _) => (16.0, 600.0),
        (11..=14, Gender::Male) => (21.0, 600.0),
        (11..=14, Gender::Female) => (27.0, 600.0),
        (15..=17, Gender::Male) => (22.0, 600.0),
        (15..=17, Gender::Female) => (26.0, 600.0),
        (_, Gender::Male) => (17.0, 600.0),
        (_, Gender::Female) => (21.0, 600.0),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection and rotation
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_STAPLE_CAP: u32 = 4;
pub const DEFAULT_VARIETY_CAP: u32 = 3;

/// Weight of protein error relative to calorie error in the slot score.
pub const PROTEIN_ERROR_WEIGHT: f64 = 10.0;

/// Score reduction for a variety bucket not yet used in the rotation.
pub const DEFAULT_VARIETY_BONUS: f64 = 40.0;

/// Score reduction when both calorie and protein estimates reach the adequacy ratio.
pub const DEFAULT_ADEQUACY_BONUS: f64 = 60.0;
pub const ADEQUACY_RATIO: f64 = 0.8;

/// Scores closer than this are treated as tied.
pub const SCORE_TIE_EPSILON: f64 = 1e-9;

/// Default portion scaling bounds.
pub const DEFAULT_MIN_PORTION: f64 = 0.75;
pub const DEFAULT_MAX_PORTION: f64 = 1.5;

/// Portion factors snap to this step.
pub const PORTION_STEP: f64 = 0.05;

/// Fraction of the daily target each slot should cover.
pub static SLOT_SHARES: LazyLock<HashMap<MealSlot, f64>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert(MealSlot::Breakfast, 0.25);
    m.insert(MealSlot::Snack1, 0.10);
    m.insert(MealSlot::Lunch, 0.30);
    m.insert(MealSlot::Snack2, 0.10);
    m.insert(MealSlot::Dinner, 0.25);
    m
});

pub fn slot_share(slot: MealSlot) -> f64 {
    *SLOT_SHARES.get(&slot).unwrap_or(&0.0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Cost and compliance
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_WASTAGE_PCT: f64 = 0.07;

/// Flat spice and condiment cost added to every serving.
pub const DEFAULT_SPICE_ALLOWANCE: f64 = 2.0;

/// A metric is compliant at or above this fraction of its target.
pub const COMPLIANCE_THRESHOLD: f64 = 0.9;

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 1 decimal place. Used for reported nutrient amounts.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_shares_sum_to_one() {
        let total: f64 = MealSlot::ALL.iter().map(|s| slot_share(*s)).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_child_band_lookup() {
        assert_eq!(child_band(9).unwrap().name, "primary");
        assert_eq!(child_band(14).unwrap().meal_kcal, 700.0);
        assert!(child_band(15).is_none());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005_f64 + 1e-12), 1.01);
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(-0.0), 0.0);
    }
}
