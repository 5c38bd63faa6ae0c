use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::catalog::{CatalogEntry, MealCatalog, NutritionDatabase};
use crate::error::{PlanError, Result};
use crate::models::{
    ChosenMeal, DailyPlan, DailyTarget, DailyTotals, Goal, MealPlanOutput, Nutrition, PlanRequest,
    Portion, PriceSnapshot, SelectedMeal, SlotTarget, UserProfile,
};
use crate::planner::compliance::{ComplianceChecker, Warning};
use crate::planner::config::PlannerConfig;
use crate::planner::constants::{round1, round2, PORTION_STEP};
use crate::planner::cost::CostEstimator;
use crate::planner::rotation::RotationState;
use crate::planner::selector::ConstraintMealSelector;
use crate::planner::targets::calculate_daily_target;

/// Something that turns a profile and a request into a plan.
///
/// Alternative planners can sit behind this and fall back to [`RuleBasedPlanner`].
pub trait MealPlanStrategy {
    fn generate(
        &self,
        profile: &UserProfile,
        request: &PlanRequest,
        catalog: &MealCatalog,
        prices: &PriceSnapshot,
    ) -> Result<MealPlanOutput>;
}

/// Deterministic slot-by-slot planner.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedPlanner {
    config: PlannerConfig,
    db: NutritionDatabase,
}

impl RuleBasedPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            db: NutritionDatabase::builtin(),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Portion factor bringing an option's calories towards the slot target.
    ///
    /// Clamped to the configured bounds and snapped to 0.05 steps.
    pub fn portion_factor(&self, estimated_kcal: f64, target: SlotTarget) -> f64 {
        if estimated_kcal <= 0.0 || target.calories_kcal <= 0.0 {
            return 1.0;
        }
        let (min, max) = (self.config.min_portion, self.config.max_portion);
        let raw = (target.calories_kcal / estimated_kcal).clamp(min, max);
        let snapped = ((raw / PORTION_STEP).round() * PORTION_STEP).clamp(min, max);
        round2(snapped)
    }

    fn plate(
        &self,
        entry: &CatalogEntry,
        target: SlotTarget,
        estimator: &CostEstimator,
        prices: &PriceSnapshot,
    ) -> Result<ChosenMeal> {
        let factor = self.portion_factor(entry.nutrition.calories, target);

        let portions: Vec<Portion> = entry
            .option
            .ingredients
            .iter()
            .map(|p| Portion::new(p.ingredient.clone(), (p.grams * factor).round().max(1.0)))
            .collect();

        let nutrition = portions
            .iter()
            .map(|p| self.db.nutrition_for(&p.ingredient, p.grams))
            .collect::<Result<Vec<Nutrition>>>()?
            .into_iter()
            .sum::<Nutrition>();

        let cost = estimator.estimate(&portions, prices);
        let option = &entry.option;

        Ok(ChosenMeal {
            name: option.name.clone(),
            portions,
            portion_factor: factor,
            staple: option.staple,
            pulse: option.pulse.clone(),
            variety_bucket: option.variety_bucket.clone(),
            calories: round1(nutrition.calories),
            protein_g: round1(nutrition.protein_g),
            iron_mg: round1(nutrition.iron_mg),
            vitamin_a_ug: round1(nutrition.vitamin_a_ug),
            fiber_g: round1(nutrition.fiber_g),
            cost,
        })
    }
}

fn day_totals(meals: &[SelectedMeal]) -> DailyTotals {
    let chosen = || meals.iter().filter_map(|m| m.meal.as_ref());
    DailyTotals {
        calories: round1(chosen().map(|m| m.calories).sum()),
        protein_g: round1(chosen().map(|m| m.protein_g).sum()),
        iron_mg: round1(chosen().map(|m| m.iron_mg).sum()),
        vitamin_a_ug: round1(chosen().map(|m| m.vitamin_a_ug).sum()),
        fiber_g: round1(chosen().map(|m| m.fiber_g).sum()),
        cost: round2(chosen().map(|m| m.cost.total).sum()),
    }
}

fn summarize(
    request: &PlanRequest,
    target: &DailyTarget,
    compliant_days: usize,
    average_daily_cost: f64,
    warnings: usize,
) -> String {
    format!(
        "{}-day plan ({} slots/day): target {:.0} kcal and {:.1} g protein, {} of {} days compliant, average cost {:.2}/day, {} warning(s)",
        request.rotation_days,
        request.mode.slots().len(),
        target.calories_kcal,
        target.protein_g,
        compliant_days,
        request.rotation_days,
        average_daily_cost,
        warnings
    )
}

impl MealPlanStrategy for RuleBasedPlanner {
    fn generate(
        &self,
        profile: &UserProfile,
        request: &PlanRequest,
        catalog: &MealCatalog,
        prices: &PriceSnapshot,
    ) -> Result<MealPlanOutput> {
        request.validate()?;
        self.config.validate()?;

        let target = calculate_daily_target(profile, &self.config)?;
        let constraints = request.effective_constraints(profile)?;
        let slots = request.mode.slots();

        let mut warnings = Vec::new();
        if profile.is_minor() && profile.goal == Goal::Lose {
            warnings.push(Warning::MinorSupervision { age: profile.age });
        }

        let estimator = CostEstimator::from_config(&self.config);
        let mut selector = ConstraintMealSelector::new(catalog, &self.config);
        let mut rotation = RotationState::new();
        let mut missing_prices = BTreeSet::new();
        let mut daily_plans = Vec::with_capacity(request.rotation_days as usize);

        for day in 1..=request.rotation_days {
            let mut meals = Vec::with_capacity(slots.len());

            for &slot in slots {
                let slot_target = target.for_slot(slot, slots);
                let selected = match selector.select(slot, slot_target, &mut rotation, &constraints) {
                    Ok(selection) => {
                        if selection.rotation_relaxed {
                            warnings.push(Warning::RotationRelaxed { day, slot });
                        }
                        let entry = &catalog.all()[selection.index];
                        let meal = self.plate(entry, slot_target, &estimator, prices)?;
                        missing_prices.extend(meal.cost.missing_prices.iter().cloned());
                        SelectedMeal {
                            slot,
                            meal: Some(meal),
                            rotation_relaxed: selection.rotation_relaxed,
                        }
                    }
                    Err(PlanError::NoCandidate { slot }) => {
                        warnings.push(Warning::NoCandidate { day, slot });
                        SelectedMeal {
                            slot,
                            meal: None,
                            rotation_relaxed: false,
                        }
                    }
                    Err(e) => return Err(e),
                };
                meals.push(selected);
            }

            rotation.end_day();

            let totals = day_totals(&meals);
            let rotation_relaxed = meals.iter().any(|m| m.rotation_relaxed);
            debug!(day, calories = totals.calories, cost = totals.cost, "day assembled");

            daily_plans.push(DailyPlan {
                day,
                meals,
                totals,
                rotation_relaxed,
            });
        }

        let checker = ComplianceChecker::new(&target);
        let compliance = checker.check(&daily_plans);

        let total_cost: f64 = daily_plans.iter().map(|d| d.totals.cost).sum();
        let average_daily_cost = round2(total_cost / f64::from(request.rotation_days));

        if !missing_prices.is_empty() {
            warnings.push(Warning::MissingPrice {
                ingredients: missing_prices.into_iter().collect(),
            });
        }
        if let Some(budget) = request.budget_per_day {
            if average_daily_cost > budget {
                warnings.push(Warning::BudgetExceeded {
                    average: average_daily_cost,
                    budget,
                });
            }
        }
        if let Some(shortfall) = ComplianceChecker::shortfall(&compliance) {
            warnings.push(shortfall);
        }

        let compliant_days = compliance.iter().filter(|r| r.is_compliant()).count();
        let summary = summarize(request, &target, compliant_days, average_daily_cost, warnings.len());

        info!(
            days = request.rotation_days,
            location = %prices.location,
            calories = target.calories_kcal,
            average_daily_cost,
            compliant_days,
            warnings = warnings.len(),
            "meal plan generated"
        );

        Ok(MealPlanOutput {
            target,
            daily_plans,
            compliance,
            average_daily_cost,
            warnings: warnings.iter().map(Warning::to_string).collect(),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FallbackPriceProvider, PriceProvider};
    use crate::models::{ActivityLevel, Gender, MealSlot, PlanMode};
    use crate::planner::config::TieBreak;

    fn adult() -> UserProfile {
        UserProfile {
            age: 25,
            gender: Gender::Male,
            weight_kg: 70.0,
            height_cm: 175.0,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Maintain,
            dietary_constraints: BTreeSet::new(),
        }
    }

    fn fixtures() -> (MealCatalog, PriceSnapshot) {
        let db = NutritionDatabase::builtin();
        let catalog = MealCatalog::builtin(&db).unwrap();
        let prices = FallbackPriceProvider::new().snapshot("test");
        (catalog, prices)
    }

    #[test]
    fn test_plan_shape() {
        let (catalog, prices) = fixtures();
        let planner = RuleBasedPlanner::default();
        let output = planner
            .generate(&adult(), &PlanRequest::default(), &catalog, &prices)
            .unwrap();

        assert_eq!(output.daily_plans.len(), 7);
        assert_eq!(output.compliance.len(), 7);
        for (i, day) in output.daily_plans.iter().enumerate() {
            assert_eq!(day.day, i as u32 + 1);
            let slots: Vec<MealSlot> = day.meals.iter().map(|m| m.slot).collect();
            assert_eq!(slots, MealSlot::ALL.to_vec());
        }
        assert!(output.summary.starts_with("7-day plan"));
    }

    #[test]
    fn test_main_meals_mode() {
        let (catalog, prices) = fixtures();
        let request = PlanRequest {
            rotation_days: 3,
            mode: PlanMode::MainMealsOnly,
            ..Default::default()
        };
        let output = RuleBasedPlanner::default()
            .generate(&adult(), &request, &catalog, &prices)
            .unwrap();
        for day in &output.daily_plans {
            assert_eq!(day.meals.len(), 3);
            assert!(day.meal_for(MealSlot::Snack1).is_none());
        }
    }

    #[test]
    fn test_day_cost_is_rounded_sum() {
        let (catalog, prices) = fixtures();
        let output = RuleBasedPlanner::default()
            .generate(&adult(), &PlanRequest::default(), &catalog, &prices)
            .unwrap();
        for day in &output.daily_plans {
            let sum: f64 = day
                .meals
                .iter()
                .filter_map(|m| m.meal.as_ref())
                .map(|m| m.cost.total)
                .sum();
            assert_eq!(day.totals.cost, round2(sum));
        }
    }

    #[test]
    fn test_tiny_budget_warns() {
        let (catalog, prices) = fixtures();
        let request = PlanRequest {
            rotation_days: 2,
            budget_per_day: Some(1.0),
            ..Default::default()
        };
        let output = RuleBasedPlanner::default()
            .generate(&adult(), &request, &catalog, &prices)
            .unwrap();
        assert!(output.warnings.iter().any(|w| w.contains("exceeds budget")));
    }

    #[test]
    fn test_empty_slot_is_warning_not_error() {
        let db = NutritionDatabase::builtin();
        let lunch_only: Vec<_> = crate::catalog::builtin_options()
            .into_iter()
            .filter(|o| o.slot == MealSlot::Lunch)
            .collect();
        let catalog = MealCatalog::new(lunch_only, &db).unwrap();
        let prices = FallbackPriceProvider::new().snapshot("test");
        let request = PlanRequest {
            rotation_days: 1,
            ..Default::default()
        };

        let output = RuleBasedPlanner::default()
            .generate(&adult(), &request, &catalog, &prices)
            .unwrap();
        let day = &output.daily_plans[0];
        assert!(day.meal_for(MealSlot::Lunch).is_some());
        assert!(day.meal_for(MealSlot::Breakfast).is_none());
        assert!(output.warnings.iter().any(|w| w.contains("no suitable option for breakfast")));
    }

    #[test]
    fn test_rejects_out_of_range_days() {
        let (catalog, prices) = fixtures();
        for days in [0, 32] {
            let request = PlanRequest {
                rotation_days: days,
                ..Default::default()
            };
            assert!(matches!(
                RuleBasedPlanner::default().generate(&adult(), &request, &catalog, &prices),
                Err(PlanError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_portion_factor_bounds() {
        let planner = RuleBasedPlanner::default();
        let target = SlotTarget {
            calories_kcal: 600.0,
            protein_g: 20.0,
        };
        assert_eq!(planner.portion_factor(200.0, target), 1.5);
        assert_eq!(planner.portion_factor(1200.0, target), 0.75);
        assert_eq!(planner.portion_factor(500.0, target), 1.2);
        assert_eq!(planner.portion_factor(0.0, target), 1.0);

        let fixed = RuleBasedPlanner::new(PlannerConfig {
            min_portion: 1.0,
            max_portion: 1.0,
            ..Default::default()
        });
        assert_eq!(fixed.portion_factor(200.0, target), 1.0);
    }

    #[test]
    fn test_seeded_plans_repeat() {
        let (catalog, prices) = fixtures();
        let planner = RuleBasedPlanner::new(PlannerConfig {
            tie_break: TieBreak::Seeded(11),
            ..Default::default()
        });
        let a = planner
            .generate(&adult(), &PlanRequest::default(), &catalog, &prices)
            .unwrap();
        let b = planner
            .generate(&adult(), &PlanRequest::default(), &catalog, &prices)
            .unwrap();
        assert_eq!(a, b);
    }
}
