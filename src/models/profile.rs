use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::fuzzy::closest_match;
use crate::models::meal::MealSlot;
use crate::models::nutrition::Allergen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Maintain,
    Lose,
    Gain,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "male",
            Gender::Female => "female",
        })
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
        })
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Goal::Maintain => "maintain",
            Goal::Lose => "lose",
            Goal::Gain => "gain",
        })
    }
}

/// Biometric and preference input for one consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Age in whole years. Signed so that bad input can be rejected rather than wrapped.
    pub age: i32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    #[serde(default)]
    pub dietary_constraints: BTreeSet<String>,
}

impl UserProfile {
    pub fn is_minor(&self) -> bool {
        self.age < 18
    }

    /// Reject biometrics the target formulas cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.age < 0 {
            return Err(PlanError::InvalidProfile(format!(
                "age must not be negative (got {})",
                self.age
            )));
        }
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(PlanError::InvalidProfile(format!(
                "weight_kg must be positive (got {})",
                self.weight_kg
            )));
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(PlanError::InvalidProfile(format!(
                "height_cm must be positive (got {})",
                self.height_cm
            )));
        }
        Ok(())
    }
}

/// A parsed dietary restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryConstraint {
    /// No meat, fish or egg.
    Vegetarian,
    /// No animal product at all.
    Vegan,
    Eggless,
    AllergenFree(Allergen),
}

impl DietaryConstraint {
    /// Parse a constraint string such as `"vegetarian"`, `"peanut_free"` or `"no_gluten"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_lowercase().replace(['-', ' '], "_");

        match normalized.as_str() {
            "vegetarian" | "veg" => return Ok(Self::Vegetarian),
            "vegan" => return Ok(Self::Vegan),
            "eggless" | "no_egg" | "egg_free" => return Ok(Self::Eggless),
            _ => {}
        }

        let allergen = normalized
            .strip_suffix("_free")
            .or_else(|| normalized.strip_prefix("no_"))
            .and_then(|name| name.parse::<Allergen>().ok());

        if let Some(allergen) = allergen {
            return Ok(Self::AllergenFree(allergen));
        }

        let known = known_constraint_names();
        let suggestion = closest_match(&normalized, known.iter().map(String::as_str));
        Err(PlanError::InvalidProfile(match suggestion {
            Some(s) => format!("unknown dietary constraint '{}' (did you mean '{}'?)", raw, s),
            None => format!("unknown dietary constraint '{}'", raw),
        }))
    }

    /// Parse a whole set, stopping at the first unknown entry.
    pub fn parse_all<'a, I>(raw: I) -> Result<BTreeSet<Self>>
    where
        I: IntoIterator<Item = &'a String>,
    {
        raw.into_iter().map(|s| Self::parse(s)).collect()
    }
}

/// Canonical spellings of every accepted constraint.
pub fn known_constraint_names() -> Vec<String> {
    let mut names = vec![
        "vegetarian".to_string(),
        "vegan".to_string(),
        "eggless".to_string(),
    ];
    names.extend(Allergen::ALL.iter().map(|a| format!("{}_free", a)));
    names
}

impl fmt::Display for DietaryConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vegetarian => f.write_str("vegetarian"),
            Self::Vegan => f.write_str("vegan"),
            Self::Eggless => f.write_str("eggless"),
            Self::AllergenFree(a) => write!(f, "{}_free", a),
        }
    }
}

/// Which meal slots a plan covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanMode {
    /// Breakfast, two snacks, lunch and dinner.
    #[default]
    FullDay,
    /// Breakfast, lunch and dinner only.
    MainMealsOnly,
}

impl PlanMode {
    pub fn slots(self) -> &'static [MealSlot] {
        match self {
            PlanMode::FullDay => &MealSlot::ALL,
            PlanMode::MainMealsOnly => &[MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner],
        }
    }
}

/// Longest rotation a single request may ask for.
pub const MAX_ROTATION_DAYS: u32 = 31;

/// Caller-supplied parameters for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub rotation_days: u32,
    #[serde(default)]
    pub mode: PlanMode,
    #[serde(default)]
    pub dietary_constraints: BTreeSet<String>,
    /// Program budget allocation per person per day.
    #[serde(default)]
    pub budget_per_day: Option<f64>,
    #[serde(default = "default_location")]
    pub location: String,
}

fn default_location() -> String {
    "default".to_string()
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            rotation_days: 7,
            mode: PlanMode::FullDay,
            dietary_constraints: BTreeSet::new(),
            budget_per_day: None,
            location: default_location(),
        }
    }
}

impl PlanRequest {
    pub fn validate(&self) -> Result<()> {
        if self.rotation_days == 0 || self.rotation_days > MAX_ROTATION_DAYS {
            return Err(PlanError::InvalidRequest(format!(
                "rotation_days must be between 1 and {} (got {})",
                MAX_ROTATION_DAYS, self.rotation_days
            )));
        }
        if let Some(budget) = self.budget_per_day {
            if !budget.is_finite() || budget <= 0.0 {
                return Err(PlanError::InvalidRequest(format!(
                    "budget_per_day must be positive (got {})",
                    budget
                )));
            }
        }
        Ok(())
    }

    /// Union of the profile's and the request's constraints, parsed.
    pub fn effective_constraints(&self, profile: &UserProfile) -> Result<BTreeSet<DietaryConstraint>> {
        DietaryConstraint::parse_all(
            profile
                .dietary_constraints
                .iter()
                .chain(self.dietary_constraints.iter()),
        )
    }
}
