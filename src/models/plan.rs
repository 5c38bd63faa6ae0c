use serde::{Deserialize, Serialize};

use crate::models::meal::{MealSlot, Portion, Staple};
use crate::models::profile::Goal;

/// How a daily target was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetBasis {
    /// Meal-level program standard scaled to a full day.
    ChildProgramStandard,
    /// Mifflin-St Jeor BMR times an activity factor.
    EnergyExpenditure,
}

/// Daily nutrition goal for one consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTarget {
    pub calories_kcal: f64,
    pub protein_g: f64,
    pub iron_mg: f64,
    pub vitamin_a_ug: f64,
    pub basis: TargetBasis,
    /// Goal actually applied; minors asking to lose weight are held at maintain.
    pub effective_goal: Goal,
}

/// Calorie/protein share of a daily target assigned to one slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotTarget {
    pub calories_kcal: f64,
    pub protein_g: f64,
}

/// Cost of one ingredient line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub ingredient: String,
    pub grams: f64,
    pub cost: f64,
}

/// Per-serving cost of one dish. Every field is rounded to 2 decimal places.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub lines: Vec<CostLine>,
    pub subtotal: f64,
    pub spice_allowance: f64,
    pub wastage_amount: f64,
    pub total: f64,
    /// Ingredients with no price in the snapshot, costed at zero.
    pub missing_prices: Vec<String>,
}

/// A catalog option chosen for a slot, with resolved portions and cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChosenMeal {
    pub name: String,
    pub portions: Vec<Portion>,
    pub portion_factor: f64,
    pub staple: Option<Staple>,
    pub pulse: Option<String>,
    pub variety_bucket: String,
    pub calories: f64,
    pub protein_g: f64,
    pub iron_mg: f64,
    pub vitamin_a_ug: f64,
    pub fiber_g: f64,
    pub cost: CostBreakdown,
}

/// One slot of a day. `meal` is `None` when no dietary-valid option existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedMeal {
    pub slot: MealSlot,
    pub meal: Option<ChosenMeal>,
    /// Rotation filters were dropped to find this meal.
    pub rotation_relaxed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub iron_mg: f64,
    pub vitamin_a_ug: f64,
    pub fiber_g: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    /// 1-based day index.
    pub day: u32,
    pub meals: Vec<SelectedMeal>,
    pub totals: DailyTotals,
    pub rotation_relaxed: bool,
}

impl DailyPlan {
    /// Pulse keys served this day, in slot order.
    pub fn pulses(&self) -> Vec<&str> {
        self.meals
            .iter()
            .filter_map(|m| m.meal.as_ref())
            .filter_map(|m| m.pulse.as_deref())
            .collect()
    }

    pub fn meal_for(&self, slot: MealSlot) -> Option<&ChosenMeal> {
        self.meals
            .iter()
            .find(|m| m.slot == slot)
            .and_then(|m| m.meal.as_ref())
    }
}

/// Nutrition compliance of one day against the daily target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub day: u32,
    pub calorie_ok: bool,
    pub protein_ok: bool,
    pub iron_ok: bool,
    pub vitamin_a_ok: bool,
    pub notes: Vec<String>,
}

impl ComplianceRecord {
    pub fn is_compliant(&self) -> bool {
        self.calorie_ok && self.protein_ok && self.iron_ok && self.vitamin_a_ok
    }
}

/// Final result of one generation run. Plain data, safe to serialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanOutput {
    pub target: DailyTarget,
    pub daily_plans: Vec<DailyPlan>,
    pub compliance: Vec<ComplianceRecord>,
    pub average_daily_cost: f64,
    pub warnings: Vec<String>,
    pub summary: String,
}
