use std::io::Write;

use crate::catalog::MealCatalog;
use crate::error::Result;
use crate::models::{DailyTarget, MealPlanOutput, MealSlot, TargetBasis};

/// Display the daily target.
pub fn display_target(target: &DailyTarget) {
    let basis = match target.basis {
        TargetBasis::ChildProgramStandard => "child programme standard",
        TargetBasis::EnergyExpenditure => "energy expenditure",
    };

    println!();
    println!("=== Daily Target ===");
    println!("Calories:  {:.0} kcal ({})", target.calories_kcal, basis);
    println!("Protein:   {:.1} g", target.protein_g);
    println!("Iron:      {:.1} mg", target.iron_mg);
    println!("Vitamin A: {:.0} µg", target.vitamin_a_ug);
    println!("Goal:      {}", target.effective_goal);
    println!();
}

/// Display a generated plan day by day.
pub fn display_plan(output: &MealPlanOutput) {
    display_target(&output.target);

    let name_width = output
        .daily_plans
        .iter()
        .flat_map(|d| d.meals.iter())
        .filter_map(|m| m.meal.as_ref())
        .map(|m| m.name.len())
        .max()
        .unwrap_or(10);

    for (day, record) in output.daily_plans.iter().zip(&output.compliance) {
        println!("=== Day {} ===", day.day);

        for selected in &day.meals {
            match &selected.meal {
                Some(meal) => {
                    let relaxed = if selected.rotation_relaxed { "  [relaxed]" } else { "" };
                    println!(
                        "  {:<9} {:<width$}  x{:.2}  {:>4.0} kcal  {:>5.1} g  {:>7.2}{}",
                        selected.slot,
                        meal.name,
                        meal.portion_factor,
                        meal.calories,
                        meal.protein_g,
                        meal.cost.total,
                        relaxed,
                        width = name_width
                    );
                }
                None => println!("  {:<9} (no suitable option)", selected.slot),
            }
        }

        let t = &day.totals;
        println!(
            "  Total: {:.0} kcal | {:.1} g protein | {:.1} mg iron | {:.0} µg vit A | cost {:.2}",
            t.calories, t.protein_g, t.iron_mg, t.vitamin_a_ug, t.cost
        );
        if !record.is_compliant() {
            for note in &record.notes {
                println!("  ! {}", note);
            }
        }
        println!();
    }

    println!("--- Summary ---");
    println!("{}", output.summary);
    println!("Average daily cost: {:.2}", output.average_daily_cost);

    if !output.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &output.warnings {
            println!("  - {}", warning);
        }
    }
    println!();
}

/// Write the plan as pretty JSON and nothing else, so the stream can be piped.
pub fn write_plan_json<W: Write>(mut writer: W, output: &MealPlanOutput) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, output)?;
    writeln!(writer)?;
    Ok(())
}

/// List catalog options grouped by slot.
pub fn display_catalog(catalog: &MealCatalog) {
    for slot in MealSlot::ALL {
        let options: Vec<_> = catalog.for_slot(slot).collect();
        println!();
        println!("=== {} ({} options) ===", slot, options.len());

        for (_, entry) in options {
            let option = &entry.option;
            let mut tags = Vec::new();
            if let Some(staple) = option.staple {
                tags.push(format!("staple:{}", staple));
            }
            if let Some(pulse) = &option.pulse {
                tags.push(format!("pulse:{}", pulse));
            }
            if entry.is_vegan() {
                tags.push("vegan".to_string());
            } else if entry.is_vegetarian() {
                tags.push("vegetarian".to_string());
            }

            println!(
                "  {} - {:.0} kcal, {:.1} g protein [{}]",
                option.name,
                entry.nutrition.calories,
                entry.nutrition.protein_g,
                tags.join(", ")
            );
        }
    }
    println!();
}
