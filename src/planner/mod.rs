pub mod assembler;
pub mod compliance;
pub mod config;
pub mod constants;
pub mod cost;
pub mod rotation;
pub mod selector;
pub mod targets;

pub use assembler::{MealPlanStrategy, RuleBasedPlanner};
pub use compliance::{ComplianceChecker, Warning};
pub use config::{PlannerConfig, TieBreak};
pub use constants::*;
pub use cost::CostEstimator;
pub use rotation::RotationState;
pub use selector::{ConstraintMealSelector, Selection};
pub use targets::{calculate_bmr, calculate_daily_target, calculate_tdee, effective_goal};
