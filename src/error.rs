use thiserror::Error;

use crate::models::MealSlot;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No candidate meal for {slot}")]
    NoCandidate { slot: MealSlot },

    #[error("Unknown ingredient: {key}{}", suggestion_suffix(.suggestion))]
    UnknownIngredient {
        key: String,
        suggestion: Option<String>,
    },

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
