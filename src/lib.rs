pub mod catalog;
pub mod cli;
pub mod error;
pub mod fuzzy;
pub mod interface;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{PlanError, Result};
pub use models::{DailyPlan, MealOption, MealPlanOutput, PlanRequest, UserProfile};
pub use planner::{MealPlanStrategy, PlannerConfig, RuleBasedPlanner};
