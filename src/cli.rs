use std::collections::BTreeSet;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::error::{PlanError, Result};
use crate::models::{ActivityLevel, Gender, Goal, PlanMode, PlanRequest, UserProfile};

/// meal-planner: multi-day meal rotations that hit nutrition targets on a budget.
#[derive(Parser, Debug)]
#[command(name = "meal-planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Planner settings JSON (caps, bonuses, surcharges).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Meal catalog JSON replacing the built-in menu.
    #[arg(long, global = true)]
    pub catalog: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a multi-day meal plan.
    Plan {
        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Print the daily nutrition target for a profile.
    Targets {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// List the meal options per slot.
    Catalog,

    /// Collect the profile with prompts, then plan.
    Interactive {
        /// Seed for reproducible tie-breaking.
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Interactive { seed: None }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GenderArg {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ActivityArg {
    Sedentary,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GoalArg {
    Maintain,
    Lose,
    Gain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    FullDay,
    MainMeals,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
        }
    }
}

impl From<ActivityArg> for ActivityLevel {
    fn from(arg: ActivityArg) -> Self {
        match arg {
            ActivityArg::Sedentary => ActivityLevel::Sedentary,
            ActivityArg::Moderate => ActivityLevel::Moderate,
            ActivityArg::High => ActivityLevel::High,
        }
    }
}

impl From<GoalArg> for Goal {
    fn from(arg: GoalArg) -> Self {
        match arg {
            GoalArg::Maintain => Goal::Maintain,
            GoalArg::Lose => Goal::Lose,
            GoalArg::Gain => Goal::Gain,
        }
    }
}

impl From<ModeArg> for PlanMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::FullDay => PlanMode::FullDay,
            ModeArg::MainMeals => PlanMode::MainMealsOnly,
        }
    }
}

/// Profile given either as a JSON file or as individual flags.
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Profile JSON file. Overrides the individual flags.
    #[arg(long)]
    pub profile: Option<String>,

    #[arg(long)]
    pub age: Option<i32>,

    #[arg(long, value_enum)]
    pub gender: Option<GenderArg>,

    /// Body weight in kg.
    #[arg(long)]
    pub weight: Option<f64>,

    /// Height in cm.
    #[arg(long)]
    pub height: Option<f64>,

    #[arg(long, value_enum, default_value = "moderate")]
    pub activity: ActivityArg,

    #[arg(long, value_enum, default_value = "maintain")]
    pub goal: GoalArg,
}

impl ProfileArgs {
    /// Build a profile from the flags. `--profile` files are loaded by the caller.
    pub fn to_profile(&self) -> Result<UserProfile> {
        let missing = |flag: &str| PlanError::InvalidProfile(format!("--{} is required without --profile", flag));

        let profile = UserProfile {
            age: self.age.ok_or_else(|| missing("age"))?,
            gender: self.gender.ok_or_else(|| missing("gender"))?.into(),
            weight_kg: self.weight.ok_or_else(|| missing("weight"))?,
            height_cm: self.height.ok_or_else(|| missing("height"))?,
            activity_level: self.activity.into(),
            goal: self.goal.into(),
            dietary_constraints: BTreeSet::new(),
        };
        profile.validate()?;
        Ok(profile)
    }
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Number of days in the rotation (1-31).
    #[arg(long, default_value_t = 7)]
    pub days: u32,

    #[arg(long, value_enum, default_value = "full-day")]
    pub mode: ModeArg,

    /// Dietary constraint, repeatable (vegetarian, vegan, eggless, peanut_free, ...).
    #[arg(long = "diet")]
    pub diet: Vec<String>,

    /// Budget per person per day.
    #[arg(long)]
    pub budget: Option<f64>,

    /// Price location label.
    #[arg(long, default_value = "default")]
    pub location: String,

    /// CSV of price overrides merged over the built-in prices.
    #[arg(long)]
    pub prices: Option<String>,

    /// Seed for reproducible tie-breaking.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the plan as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Also write the plan JSON to this file.
    #[arg(long)]
    pub out: Option<String>,
}

impl PlanArgs {
    pub fn to_request(&self) -> PlanRequest {
        PlanRequest {
            rotation_days: self.days,
            mode: self.mode.into(),
            dietary_constraints: self.diet.iter().cloned().collect(),
            budget_per_day: self.budget,
            location: self.location.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_flags_parse() {
        let cli = Cli::parse_from([
            "meal-planner", "plan", "--age", "25", "--gender", "male", "--weight", "70",
            "--height", "175", "--days", "5", "--mode", "main-meals", "--diet", "vegetarian",
            "--diet", "peanut_free", "--budget", "120",
        ]);
        let Some(Command::Plan { profile, plan }) = cli.command else {
            panic!("expected plan command");
        };

        let p = profile.to_profile().unwrap();
        assert_eq!(p.age, 25);
        assert_eq!(p.activity_level, ActivityLevel::Moderate);

        let request = plan.to_request();
        assert_eq!(request.rotation_days, 5);
        assert_eq!(request.mode, PlanMode::MainMealsOnly);
        assert_eq!(request.dietary_constraints.len(), 2);
        assert_eq!(request.budget_per_day, Some(120.0));
    }

    #[test]
    fn test_missing_profile_flag() {
        let cli = Cli::parse_from(["meal-planner", "targets", "--age", "25"]);
        let Some(Command::Targets { profile }) = cli.command else {
            panic!("expected targets command");
        };
        assert!(matches!(profile.to_profile(), Err(PlanError::InvalidProfile(_))));
    }
}
