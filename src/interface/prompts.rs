use std::collections::BTreeSet;

use dialoguer::{Confirm, Input, Select};

use crate::error::{PlanError, Result};
use crate::fuzzy::closest_match;
use crate::models::{
    known_constraint_names, ActivityLevel, DietaryConstraint, Gender, Goal, PlanMode, PlanRequest,
    UserProfile, MAX_ROTATION_DAYS,
};

fn prompt_number(prompt: &str, default: &str) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    input
        .trim()
        .parse()
        .map_err(|_| PlanError::InvalidProfile(format!("'{}' is not a number", input.trim())))
}

fn prompt_choice<T: Copy>(prompt: &str, options: &[(&str, T)], default: usize) -> Result<T> {
    let labels: Vec<&str> = options.iter().map(|(label, _)| *label).collect();
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(options[selection].1)
}

/// Prompt for dietary constraints, one per line, with "did you mean" recovery.
pub fn prompt_dietary_constraints() -> Result<BTreeSet<String>> {
    let known = known_constraint_names();
    let mut constraints = BTreeSet::new();

    loop {
        let input: String = Input::new()
            .with_prompt("Dietary constraint (or press Enter to finish)")
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            break;
        }

        if let Ok(parsed) = DietaryConstraint::parse(input) {
            println!("Added: {}", parsed);
            constraints.insert(parsed.to_string());
            continue;
        }

        match closest_match(&input.to_lowercase(), known.iter().map(String::as_str)) {
            Some(suggestion) => {
                let confirm = Confirm::new()
                    .with_prompt(format!("Did you mean '{}'?", suggestion))
                    .default(true)
                    .interact()?;
                if confirm {
                    println!("Added: {}", suggestion);
                    constraints.insert(suggestion);
                }
            }
            None => println!("Unknown constraint '{}'", input),
        }
    }

    Ok(constraints)
}

/// Collect a full profile interactively.
pub fn prompt_profile() -> Result<UserProfile> {
    let age = prompt_number("Age (years)", "30")?;
    if age.fract() != 0.0 || !(0.0..=120.0).contains(&age) {
        return Err(PlanError::InvalidProfile(format!(
            "age must be a whole number of years (got {})",
            age
        )));
    }

    let gender = prompt_choice(
        "Gender",
        &[("Male", Gender::Male), ("Female", Gender::Female)],
        0,
    )?;
    let weight_kg = prompt_number("Weight (kg)", "65")?;
    let height_cm = prompt_number("Height (cm)", "165")?;
    let activity_level = prompt_choice(
        "Activity level",
        &[
            ("Sedentary", ActivityLevel::Sedentary),
            ("Moderate", ActivityLevel::Moderate),
            ("High", ActivityLevel::High),
        ],
        1,
    )?;
    let goal = prompt_choice(
        "Goal",
        &[
            ("Maintain weight", Goal::Maintain),
            ("Lose weight", Goal::Lose),
            ("Gain weight", Goal::Gain),
        ],
        0,
    )?;
    let dietary_constraints = prompt_dietary_constraints()?;

    let profile = UserProfile {
        age: age as i32,
        gender,
        weight_kg,
        height_cm,
        activity_level,
        goal,
        dietary_constraints,
    };
    profile.validate()?;
    Ok(profile)
}

/// Collect the plan request settings interactively.
pub fn prompt_request() -> Result<PlanRequest> {
    let days = prompt_number("Rotation length (days)", "7")?;
    if days.fract() != 0.0 || days < 1.0 || days > f64::from(MAX_ROTATION_DAYS) {
        return Err(PlanError::InvalidRequest(format!(
            "rotation length must be a whole number from 1 to {} (got {})",
            MAX_ROTATION_DAYS, days
        )));
    }

    let mode = prompt_choice(
        "Meals per day",
        &[
            ("Full day (with snacks)", PlanMode::FullDay),
            ("Main meals only", PlanMode::MainMealsOnly),
        ],
        0,
    )?;

    let budget = prompt_number("Budget per day (0 for none)", "0")?;
    let budget_per_day = (budget > 0.0).then_some(budget);

    Ok(PlanRequest {
        rotation_days: days as u32,
        mode,
        budget_per_day,
        ..Default::default()
    })
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
