use tracing::debug;

use crate::error::Result;
use crate::models::{DailyTarget, Gender, Goal, MealSlot, SlotTarget, TargetBasis, UserProfile};
use crate::planner::config::PlannerConfig;
use crate::planner::constants::*;

/// Basal Metabolic Rate via Mifflin-St Jeor (1990), kcal/day.
///
/// `10 * weight + 6.25 * height - 5 * age + (5 | -161)`
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age: i32, gender: Gender) -> f64 {
    let gender_constant = match gender {
        Gender::Male => MSJ_MALE_CONSTANT,
        Gender::Female => MSJ_FEMALE_CONSTANT,
    };
    MSJ_WEIGHT_COEF * weight_kg + MSJ_HEIGHT_COEF * height_cm + MSJ_AGE_COEF * f64::from(age)
        + gender_constant
}

/// Total Daily Energy Expenditure: BMR times the activity factor.
pub fn calculate_tdee(profile: &UserProfile) -> f64 {
    calculate_bmr(profile.weight_kg, profile.height_cm, profile.age, profile.gender)
        * activity_factor(profile.activity_level)
}

/// Goal applied to the calorie target.
///
/// Minors are never put on a deficit: `Lose` becomes `Maintain` below adult age.
pub fn effective_goal(profile: &UserProfile) -> Goal {
    if profile.is_minor() && profile.goal == Goal::Lose {
        Goal::Maintain
    } else {
        profile.goal
    }
}

fn protein_for_calories(calories: f64) -> f64 {
    calories * PROTEIN_ENERGY_SHARE / KCAL_PER_G_PROTEIN
}

/// Compute the daily target for a profile.
///
/// Children in a program band get the meal-level standard scaled to a full day
/// and clamped to the child range. Everyone else gets TDEE, with the goal
/// multiplier for adults, clamped to the adult or adolescent range.
pub fn calculate_daily_target(profile: &UserProfile, config: &PlannerConfig) -> Result<DailyTarget> {
    profile.validate()?;

    let goal = effective_goal(profile);
    let (iron_mg, vitamin_a_ug) = micronutrient_reference(profile.age, profile.gender);

    if let Some(band) = child_band(profile.age) {
        let scaled = band.meal_kcal * config.child_day_multiplier;
        let calories = scaled.clamp(CHILD_KCAL_RANGE.0, CHILD_KCAL_RANGE.1);
        let protein_g = band.meal_protein_g * config.child_day_multiplier;
        debug!(
            band = band.name,
            meal_kcal = band.meal_kcal,
            scaled,
            calories,
            "child program target"
        );
        return Ok(DailyTarget {
            calories_kcal: calories,
            protein_g,
            iron_mg,
            vitamin_a_ug,
            basis: TargetBasis::ChildProgramStandard,
            effective_goal: goal,
        });
    }

    let bmr = calculate_bmr(profile.weight_kg, profile.height_cm, profile.age, profile.gender);
    let tdee = bmr * activity_factor(profile.activity_level);

    let (adjusted, range) = if profile.age >= ADULT_AGE {
        (tdee * goal_multiplier(goal), ADULT_KCAL_RANGE)
    } else {
        (tdee, ADOLESCENT_KCAL_RANGE)
    };
    let calories = adjusted.clamp(range.0, range.1);

    debug!(bmr, tdee, adjusted, calories, goal = %goal, "energy target");

    Ok(DailyTarget {
        calories_kcal: calories,
        protein_g: protein_for_calories(calories),
        iron_mg,
        vitamin_a_ug,
        basis: TargetBasis::EnergyExpenditure,
        effective_goal: goal,
    })
}

impl DailyTarget {
    /// Calorie and protein target for one slot.
    ///
    /// Slot shares are renormalised over `planned` so a plan that skips the
    /// snacks still aims for the whole daily target.
    pub fn for_slot(&self, slot: MealSlot, planned: &[MealSlot]) -> SlotTarget {
        let total_share: f64 = planned.iter().map(|s| slot_share(*s)).sum();
        let share = if total_share > 0.0 {
            slot_share(slot) / total_share
        } else {
            0.0
        };
        SlotTarget {
            calories_kcal: self.calories_kcal * share,
            protein_g: self.protein_g * share,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::models::ActivityLevel;
    use std::collections::BTreeSet;

    fn profile(age: i32, gender: Gender, activity: ActivityLevel, goal: Goal) -> UserProfile {
        UserProfile {
            age,
            gender,
            weight_kg: 70.0,
            height_cm: 175.0,
            activity_level: activity,
            goal,
            dietary_constraints: BTreeSet::new(),
        }
    }

    #[test]
    fn test_bmr_formula() {
        let bmr = calculate_bmr(70.0, 175.0, 25, Gender::Male);
        assert!((bmr - 1673.75).abs() < 1e-9);
        let bmr_f = calculate_bmr(70.0, 175.0, 25, Gender::Female);
        assert!((bmr - bmr_f - 166.0).abs() < 1e-9);
    }

    #[test]
    fn test_effective_goal_for_minor() {
        let child = profile(12, Gender::Female, ActivityLevel::Moderate, Goal::Lose);
        assert_eq!(effective_goal(&child), Goal::Maintain);
        let adult = profile(30, Gender::Female, ActivityLevel::Moderate, Goal::Lose);
        assert_eq!(effective_goal(&adult), Goal::Lose);
    }

    #[test]
    fn test_adolescent_range() {
        let teen = profile(16, Gender::Male, ActivityLevel::High, Goal::Gain);
        let target = calculate_daily_target(&teen, &PlannerConfig::default()).unwrap();
        assert!(target.calories_kcal >= 1800.0 && target.calories_kcal <= 2000.0);
        assert_eq!(target.basis, TargetBasis::EnergyExpenditure);
    }

    #[test]
    fn test_upper_primary_band() {
        let child = profile(12, Gender::Male, ActivityLevel::Moderate, Goal::Maintain);
        let target = calculate_daily_target(&child, &PlannerConfig::default()).unwrap();
        // 700 * 2.3 = 1610 sits inside the child range
        assert!((target.calories_kcal - 1610.0).abs() < 1e-9);
        assert!((target.protein_g - 46.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_profile_fails() {
        let mut p = profile(30, Gender::Male, ActivityLevel::Moderate, Goal::Maintain);
        p.weight_kg = -70.0;
        assert!(matches!(
            calculate_daily_target(&p, &PlannerConfig::default()),
            Err(PlanError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_slot_targets_renormalise() {
        let adult = profile(25, Gender::Male, ActivityLevel::Moderate, Goal::Maintain);
        let target = calculate_daily_target(&adult, &PlannerConfig::default()).unwrap();

        let all = MealSlot::ALL;
        let full: f64 = all
            .iter()
            .map(|s| target.for_slot(*s, &all).calories_kcal)
            .sum();
        assert!((full - target.calories_kcal).abs() < 1e-6);

        let mains = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];
        let lunch = target.for_slot(MealSlot::Lunch, &mains);
        assert!((lunch.calories_kcal - 2200.0 * 0.30 / 0.80).abs() < 1e-6);
    }
}
