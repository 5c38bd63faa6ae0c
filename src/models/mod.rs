pub mod meal;
pub mod nutrition;
pub mod plan;
pub mod price;
pub mod profile;

pub use meal::{MealOption, MealSlot, Portion, Staple};
pub use nutrition::{Allergen, Ingredient, IngredientKind, Nutrition};
pub use plan::{
    ChosenMeal, ComplianceRecord, CostBreakdown, CostLine, DailyPlan, DailyTarget, DailyTotals,
    MealPlanOutput, SelectedMeal, SlotTarget, TargetBasis,
};
pub use price::{PriceEntry, PriceSnapshot, PriceUnit};
pub use profile::{
    ActivityLevel, DietaryConstraint, Gender, Goal, PlanMode, PlanRequest, UserProfile,
    MAX_ROTATION_DAYS, known_constraint_names,
};
