use std::fmt;

use tracing::debug;

use crate::models::{ComplianceRecord, DailyPlan, DailyTarget, MealSlot};
use crate::planner::constants::COMPLIANCE_THRESHOLD;

/// Plan-level condition surfaced to the caller. Never fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A slot had no option that satisfies the dietary constraints.
    NoCandidate { day: u32, slot: MealSlot },
    /// Rotation rules were dropped for a slot.
    RotationRelaxed { day: u32, slot: MealSlot },
    BudgetExceeded { average: f64, budget: f64 },
    NutritionShortfall { days: usize, total: usize },
    MinorSupervision { age: i32 },
    MissingPrice { ingredients: Vec<String> },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NoCandidate { day, slot } => {
                write!(f, "Day {}: no suitable option for {}, slot left empty", day, slot)
            }
            Warning::RotationRelaxed { day, slot } => {
                write!(f, "Day {}: rotation rules relaxed for {}", day, slot)
            }
            Warning::BudgetExceeded { average, budget } => write!(
                f,
                "Average daily cost {:.2} exceeds budget {:.2}",
                average, budget
            ),
            Warning::NutritionShortfall { days, total } => write!(
                f,
                "{} of {} days fall below 90% of a nutrition target",
                days, total
            ),
            Warning::MinorSupervision { age } => write!(
                f,
                "Profile age {} is under 18: weight-loss goals are not applied, plan under adult or clinical supervision",
                age
            ),
            Warning::MissingPrice { ingredients } => write!(
                f,
                "No price available for: {} (costed at 0)",
                ingredients.join(", ")
            ),
        }
    }
}

fn meets(actual: f64, target: f64) -> bool {
    target <= 0.0 || actual >= COMPLIANCE_THRESHOLD * target
}

/// Checks each day's totals against the daily target.
#[derive(Debug, Clone, Copy)]
pub struct ComplianceChecker<'a> {
    target: &'a DailyTarget,
}

impl<'a> ComplianceChecker<'a> {
    pub fn new(target: &'a DailyTarget) -> Self {
        Self { target }
    }

    /// One record per day. A metric passes at 90% of its target or more.
    pub fn check_day(&self, plan: &DailyPlan) -> ComplianceRecord {
        let t = self.target;
        let totals = &plan.totals;

        let calorie_ok = meets(totals.calories, t.calories_kcal);
        let protein_ok = meets(totals.protein_g, t.protein_g);
        let iron_ok = meets(totals.iron_mg, t.iron_mg);
        let vitamin_a_ok = meets(totals.vitamin_a_ug, t.vitamin_a_ug);

        let mut notes = Vec::new();
        let mut note = |ok: bool, label: &str, actual: f64, target: f64, unit: &str| {
            if !ok {
                notes.push(format!(
                    "{} {:.1}{} below 90% of target {:.1}{}",
                    label, actual, unit, target, unit
                ));
            }
        };
        note(calorie_ok, "Calories", totals.calories, t.calories_kcal, " kcal");
        note(protein_ok, "Protein", totals.protein_g, t.protein_g, " g");
        note(iron_ok, "Iron", totals.iron_mg, t.iron_mg, " mg");
        note(vitamin_a_ok, "Vitamin A", totals.vitamin_a_ug, t.vitamin_a_ug, " µg");

        for selected in &plan.meals {
            if selected.meal.is_none() {
                notes.push(format!("{} left empty", selected.slot));
            }
        }

        ComplianceRecord {
            day: plan.day,
            calorie_ok,
            protein_ok,
            iron_ok,
            vitamin_a_ok,
            notes,
        }
    }

    pub fn check(&self, plans: &[DailyPlan]) -> Vec<ComplianceRecord> {
        let records: Vec<ComplianceRecord> = plans.iter().map(|p| self.check_day(p)).collect();
        debug!(
            days = records.len(),
            compliant = records.iter().filter(|r| r.is_compliant()).count(),
            "compliance checked"
        );
        records
    }

    /// Summary shortfall warning, if any day missed a metric.
    pub fn shortfall(records: &[ComplianceRecord]) -> Option<Warning> {
        let days = records.iter().filter(|r| !r.is_compliant()).count();
        (days > 0).then_some(Warning::NutritionShortfall {
            days,
            total: records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyTotals, Goal, SelectedMeal, TargetBasis};

    fn target() -> DailyTarget {
        DailyTarget {
            calories_kcal: 2000.0,
            protein_g: 90.0,
            iron_mg: 17.0,
            vitamin_a_ug: 600.0,
            basis: TargetBasis::EnergyExpenditure,
            effective_goal: Goal::Maintain,
        }
    }

    fn day(calories: f64, protein_g: f64) -> DailyPlan {
        DailyPlan {
            day: 1,
            meals: vec![],
            totals: DailyTotals {
                calories,
                protein_g,
                iron_mg: 20.0,
                vitamin_a_ug: 700.0,
                fiber_g: 30.0,
                cost: 100.0,
            },
            rotation_relaxed: false,
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let target = target();
        let checker = ComplianceChecker::new(&target);
        let record = checker.check_day(&day(1800.0, 81.0));
        assert!(record.calorie_ok);
        assert!(record.protein_ok);
        assert!(record.is_compliant());
        assert!(record.notes.is_empty());
    }

    #[test]
    fn test_shortfall_is_noted() {
        let target = target();
        let checker = ComplianceChecker::new(&target);
        let record = checker.check_day(&day(1700.0, 90.0));
        assert!(!record.calorie_ok);
        assert!(record.protein_ok);
        assert_eq!(record.notes.len(), 1);
        assert!(record.notes[0].starts_with("Calories"));

        let records = checker.check(&[day(1700.0, 90.0), day(2000.0, 90.0)]);
        assert_eq!(
            ComplianceChecker::shortfall(&records),
            Some(Warning::NutritionShortfall { days: 1, total: 2 })
        );
    }

    #[test]
    fn test_zero_target_always_met() {
        let mut target = target();
        target.vitamin_a_ug = 0.0;
        let checker = ComplianceChecker::new(&target);
        let mut plan = day(2000.0, 90.0);
        plan.totals.vitamin_a_ug = 0.0;
        assert!(checker.check_day(&plan).vitamin_a_ok);
    }

    #[test]
    fn test_empty_slot_noted() {
        let target = target();
        let checker = ComplianceChecker::new(&target);
        let mut plan = day(2000.0, 90.0);
        plan.meals.push(SelectedMeal {
            slot: MealSlot::Lunch,
            meal: None,
            rotation_relaxed: false,
        });
        let record = checker.check_day(&plan);
        assert!(record.notes.iter().any(|n| n.contains("left empty")));
    }

    #[test]
    fn test_warning_messages() {
        let w = Warning::BudgetExceeded {
            average: 120.456,
            budget: 100.0,
        };
        assert_eq!(w.to_string(), "Average daily cost 120.46 exceeds budget 100.00");
        let w = Warning::RotationRelaxed {
            day: 3,
            slot: MealSlot::Lunch,
        };
        assert!(w.to_string().contains("Day 3"));
    }
}
