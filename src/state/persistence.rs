use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::catalog::{MealCatalog, NutritionDatabase};
use crate::error::{PlanError, Result};
use crate::models::{MealOption, MealPlanOutput, PriceEntry, PriceUnit, UserProfile};
use crate::planner::PlannerConfig;

/// Load a profile from a JSON file.
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<UserProfile> {
    let content = fs::read_to_string(path)?;
    let profile: UserProfile = serde_json::from_str(&content)?;
    profile.validate()?;
    Ok(profile)
}

/// Load a meal catalog from a JSON array of options and resolve it.
pub fn load_catalog<P: AsRef<Path>>(path: P, db: &NutritionDatabase) -> Result<MealCatalog> {
    let content = fs::read_to_string(path)?;
    let options: Vec<MealOption> = serde_json::from_str(&content)?;
    MealCatalog::new(options, db)
}

/// Load planner settings. Missing fields keep their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PlannerConfig> {
    let content = fs::read_to_string(path)?;
    let config: PlannerConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Write a generated plan as pretty JSON.
pub fn save_plan<P: AsRef<Path>>(path: P, plan: &MealPlanOutput) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    ingredient: String,
    unit_price: f64,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    grams_per_piece: Option<f64>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

fn parse_unit(row: &PriceRow) -> Result<PriceUnit> {
    let unit = row
        .unit
        .as_deref()
        .map(|u| u.trim().to_lowercase())
        .unwrap_or_default();

    match unit.as_str() {
        "" | "kg" | "per_kg" => Ok(PriceUnit::PerKg),
        "l" | "litre" | "liter" | "per_litre" => Ok(PriceUnit::PerLitre),
        "piece" | "per_piece" => match row.grams_per_piece {
            Some(g) if g > 0.0 => Ok(PriceUnit::PerPiece { grams_per_piece: g }),
            _ => Err(PlanError::InvalidRequest(format!(
                "price for '{}' is per piece but has no positive grams_per_piece",
                row.ingredient
            ))),
        },
        other => Err(PlanError::InvalidRequest(format!(
            "price for '{}' has unknown unit '{}'",
            row.ingredient, other
        ))),
    }
}

/// Load live price overrides from a CSV table.
///
/// Columns: `ingredient,unit_price[,unit,grams_per_piece,source,updated_at]`.
/// Keys are lowercased; the last row for a key wins.
pub fn load_price_overrides<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, PriceEntry>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;

    let mut prices = BTreeMap::new();
    for row in reader.deserialize::<PriceRow>() {
        let row = row?;
        if !row.unit_price.is_finite() || row.unit_price < 0.0 {
            return Err(PlanError::InvalidRequest(format!(
                "price for '{}' must be a non-negative number (got {})",
                row.ingredient, row.unit_price
            )));
        }
        let entry = PriceEntry {
            unit_price: row.unit_price,
            unit: parse_unit(&row)?,
            source: row.source.clone().unwrap_or_else(|| "override".to_string()),
            updated_at: row.updated_at,
        };
        prices.insert(row.ingredient.trim().to_lowercase(), entry);
    }

    debug!(count = prices.len(), "loaded price overrides");
    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, Gender, Goal};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_profile() {
        let file = write_temp(
            r#"{"age": 34, "gender": "female", "weight_kg": 58.0, "height_cm": 160.0,
                "activity_level": "sedentary", "goal": "lose", "dietary_constraints": ["vegetarian"]}"#,
        );
        let profile = load_profile(file.path()).unwrap();
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.activity_level, ActivityLevel::Sedentary);
        assert_eq!(profile.goal, Goal::Lose);
        assert!(profile.dietary_constraints.contains("vegetarian"));
    }

    #[test]
    fn test_load_profile_rejects_bad_weight() {
        let file = write_temp(
            r#"{"age": 34, "gender": "male", "weight_kg": 0, "height_cm": 170,
                "activity_level": "high", "goal": "gain"}"#,
        );
        assert!(matches!(
            load_profile(file.path()),
            Err(PlanError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_load_catalog() {
        let file = write_temp(
            r#"[{"name": "Dal Rice", "slot": "lunch", "staple": "rice", "pulse": "toor_dal",
                 "variety_bucket": "dal_rice",
                 "ingredients": [{"ingredient": "rice", "grams": 90}, {"ingredient": "toor_dal", "grams": 40}]}]"#,
        );
        let catalog = load_catalog(file.path(), &NutritionDatabase::builtin()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.all()[0].is_vegan());
    }

    #[test]
    fn test_load_catalog_unknown_ingredient_suggests() {
        let file = write_temp(
            r#"[{"name": "Dal Rice", "slot": "lunch", "variety_bucket": "x",
                 "ingredients": [{"ingredient": "ricee", "grams": 90}]}]"#,
        );
        match load_catalog(file.path(), &NutritionDatabase::builtin()) {
            Err(PlanError::UnknownIngredient { key, suggestion }) => {
                assert_eq!(key, "ricee");
                assert_eq!(suggestion.as_deref(), Some("rice"));
            }
            other => panic!("unexpected: {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_load_price_overrides() {
        let file = write_temp(
            "ingredient,unit_price,unit,grams_per_piece,source,updated_at\n\
             Rice,62.5,kg,,mandi,2024-06-01T00:00:00Z\n\
             milk,60,litre,,,\n\
             egg,8,piece,55,,\n\
             rice,64,,,,\n",
        );
        let prices = load_price_overrides(file.path()).unwrap();
        assert_eq!(prices.len(), 3);
        // later row wins
        assert_eq!(prices["rice"].unit_price, 64.0);
        assert_eq!(prices["rice"].source, "override");
        assert_eq!(prices["milk"].unit, PriceUnit::PerLitre);
        assert_eq!(prices["egg"].unit, PriceUnit::PerPiece { grams_per_piece: 55.0 });
    }

    #[test]
    fn test_price_overrides_reject_piece_without_weight() {
        let file = write_temp("ingredient,unit_price,unit\negg,8,piece\n");
        assert!(matches!(
            load_price_overrides(file.path()),
            Err(PlanError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_save_plan_roundtrip() {
        use crate::catalog::{FallbackPriceProvider, PriceProvider};
        use crate::models::PlanRequest;
        use crate::planner::{MealPlanStrategy, RuleBasedPlanner};

        let profile = UserProfile {
            age: 40,
            gender: Gender::Female,
            weight_kg: 62.0,
            height_cm: 158.0,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Maintain,
            dietary_constraints: Default::default(),
        };
        let request = PlanRequest {
            rotation_days: 2,
            ..Default::default()
        };
        let catalog = MealCatalog::builtin(&NutritionDatabase::builtin()).unwrap();
        let prices = FallbackPriceProvider::new().snapshot("test");
        let plan = RuleBasedPlanner::default()
            .generate(&profile, &request, &catalog, &prices)
            .unwrap();

        let out_file = NamedTempFile::new().unwrap();
        save_plan(out_file.path(), &plan).unwrap();

        let content = fs::read_to_string(out_file.path()).unwrap();
        let reloaded: MealPlanOutput = serde_json::from_str(&content).unwrap();
        assert_eq!(reloaded.daily_plans.len(), 2);
        assert_eq!(reloaded.summary, plan.summary);
        assert_eq!(reloaded.warnings, plan.warnings);
        assert_eq!(
            reloaded.daily_plans[1].meals.len(),
            plan.daily_plans[1].meals.len()
        );
    }

    #[test]
    fn test_partial_config() {
        let file = write_temp(r#"{"variety_cap": 2}"#);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.variety_cap, 2);
        assert_eq!(config.staple_cap, PlannerConfig::default().staple_cap);
    }
}
