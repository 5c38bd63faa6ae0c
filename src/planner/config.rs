use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::planner::constants::*;

/// How exactly tied candidates are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// First in catalog order wins.
    #[default]
    CatalogOrder,
    /// A seeded pseudo-random pick among tied candidates, reproducible per seed.
    Seeded(u64),
}

/// Tunable planner settings. Every field has a default, so partial JSON files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum number of days a staple may appear across the rotation.
    pub staple_cap: u32,
    /// Maximum number of selections of one variety bucket across the rotation.
    pub variety_cap: u32,
    pub variety_bonus: f64,
    pub adequacy_bonus: f64,
    pub wastage_pct: f64,
    pub spice_allowance: f64,
    pub child_day_multiplier: f64,
    pub min_portion: f64,
    pub max_portion: f64,
    pub tie_break: TieBreak,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            staple_cap: DEFAULT_STAPLE_CAP,
            variety_cap: DEFAULT_VARIETY_CAP,
            variety_bonus: DEFAULT_VARIETY_BONUS,
            adequacy_bonus: DEFAULT_ADEQUACY_BONUS,
            wastage_pct: DEFAULT_WASTAGE_PCT,
            spice_allowance: DEFAULT_SPICE_ALLOWANCE,
            child_day_multiplier: DEFAULT_CHILD_DAY_MULTIPLIER,
            min_portion: DEFAULT_MIN_PORTION,
            max_portion: DEFAULT_MAX_PORTION,
            tie_break: TieBreak::CatalogOrder,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PlanError::InvalidRequest(msg));

        let numeric = [
            ("variety_bonus", self.variety_bonus),
            ("adequacy_bonus", self.adequacy_bonus),
            ("wastage_pct", self.wastage_pct),
            ("spice_allowance", self.spice_allowance),
            ("child_day_multiplier", self.child_day_multiplier),
            ("min_portion", self.min_portion),
            ("max_portion", self.max_portion),
        ];
        if let Some((name, value)) = numeric.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(format!("{} must be a finite number (got {})", name, value));
        }

        if self.staple_cap == 0 || self.variety_cap == 0 {
            return invalid("rotation caps must be at least 1".to_string());
        }
        if !(0.0..1.0).contains(&self.wastage_pct) {
            return invalid(format!("wastage_pct must be in [0, 1) (got {})", self.wastage_pct));
        }
        if self.spice_allowance < 0.0 {
            return invalid(format!(
                "spice_allowance must not be negative (got {})",
                self.spice_allowance
            ));
        }
        if self.child_day_multiplier <= 0.0 {
            return invalid(format!(
                "child_day_multiplier must be positive (got {})",
                self.child_day_multiplier
            ));
        }
        if self.min_portion <= 0.0 || self.min_portion > self.max_portion {
            return invalid(format!(
                "portion bounds must satisfy 0 < min <= max (got {}..{})",
                self.min_portion, self.max_portion
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlannerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.staple_cap, 4);
        assert_eq!(config.variety_cap, 3);
        assert_eq!(config.wastage_pct, 0.07);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"staple_cap": 2, "tie_break": {"seeded": 7}}"#).unwrap();
        assert_eq!(config.staple_cap, 2);
        assert_eq!(config.variety_cap, DEFAULT_VARIETY_CAP);
        assert_eq!(config.tie_break, TieBreak::Seeded(7));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let cases = [
            PlannerConfig { min_portion: f64::NAN, ..Default::default() },
            PlannerConfig { max_portion: f64::INFINITY, ..Default::default() },
            PlannerConfig { spice_allowance: f64::NAN, ..Default::default() },
            PlannerConfig { child_day_multiplier: f64::NAN, ..Default::default() },
            PlannerConfig { variety_bonus: f64::NEG_INFINITY, ..Default::default() },
            PlannerConfig { adequacy_bonus: f64::NAN, ..Default::default() },
            PlannerConfig { wastage_pct: f64::NAN, ..Default::default() },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(PlanError::InvalidRequest(_))),
                "{:?}",
                config
            );
        }
    }

    #[test]
    fn test_rejects_bad_portions() {
        let config = PlannerConfig {
            min_portion: 2.0,
            max_portion: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
