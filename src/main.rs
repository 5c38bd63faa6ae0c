use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use meal_rotation_planner_rs::catalog::{FallbackPriceProvider, MealCatalog, NutritionDatabase, PriceProvider};
use meal_rotation_planner_rs::cli::{Cli, Command, PlanArgs, ProfileArgs};
use meal_rotation_planner_rs::error::Result;
use meal_rotation_planner_rs::interface::{
    display_catalog, display_plan, display_target, prompt_profile, prompt_request, prompt_yes_no,
    write_plan_json,
};
use meal_rotation_planner_rs::models::{PlanRequest, UserProfile};
use meal_rotation_planner_rs::planner::{
    calculate_bmr, calculate_daily_target, calculate_tdee, MealPlanStrategy, PlannerConfig,
    RuleBasedPlanner, TieBreak,
};
use meal_rotation_planner_rs::state::{
    load_catalog, load_config, load_price_overrides, load_profile, save_plan,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let db = NutritionDatabase::builtin();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PlannerConfig::default(),
    };
    let catalog = match &cli.catalog {
        Some(path) => load_catalog(path, &db)?,
        None => MealCatalog::builtin(&db)?,
    };

    match cli.command.unwrap_or_default() {
        Command::Plan { profile, plan } => cmd_plan(&profile, &plan, config, &catalog),
        Command::Targets { profile } => cmd_targets(&profile, &config),
        Command::Catalog => {
            display_catalog(&catalog);
            Ok(())
        }
        Command::Interactive { seed } => cmd_interactive(seed, config, &catalog),
    }
}

fn resolve_profile(args: &ProfileArgs) -> Result<UserProfile> {
    match &args.profile {
        Some(path) => load_profile(path),
        None => args.to_profile(),
    }
}

fn with_seed(mut config: PlannerConfig, seed: Option<u64>) -> PlannerConfig {
    if let Some(seed) = seed {
        config.tie_break = TieBreak::Seeded(seed);
    }
    config
}

/// Generate and show a plan from flags or files.
fn cmd_plan(
    profile_args: &ProfileArgs,
    args: &PlanArgs,
    config: PlannerConfig,
    catalog: &MealCatalog,
) -> Result<()> {
    let profile = resolve_profile(profile_args)?;
    let request = args.to_request();

    let mut provider = FallbackPriceProvider::new();
    if let Some(path) = &args.prices {
        let overrides = load_price_overrides(path)?;
        let db = NutritionDatabase::builtin();
        for key in overrides.keys().filter(|k| db.get(k).is_none()) {
            warn!(ingredient = %key, "price override for an unknown ingredient");
        }
        provider = provider.with_live(overrides);
        info!(count = provider.live_count(), "using price overrides");
    }
    let prices = provider.snapshot(&request.location);

    let planner = RuleBasedPlanner::new(with_seed(config, args.seed));
    let output = planner.generate(&profile, &request, catalog, &prices)?;

    if args.json {
        write_plan_json(std::io::stdout().lock(), &output)?;
    } else {
        display_plan(&output);
    }

    if let Some(path) = &args.out {
        save_plan(path, &output)?;
        eprintln!("Plan saved to {}", path);
    }

    Ok(())
}

/// Print the daily target with the intermediate energy figures.
fn cmd_targets(profile_args: &ProfileArgs, config: &PlannerConfig) -> Result<()> {
    let profile = resolve_profile(profile_args)?;
    let target = calculate_daily_target(&profile, config)?;

    let bmr = calculate_bmr(profile.weight_kg, profile.height_cm, profile.age, profile.gender);
    println!("BMR:  {:.1} kcal", bmr);
    println!("TDEE: {:.1} kcal", calculate_tdee(&profile));
    display_target(&target);

    if profile.is_minor() {
        println!("Note: plans for under-18s should be reviewed by an adult or clinician.");
    }
    Ok(())
}

fn cmd_interactive(seed: Option<u64>, config: PlannerConfig, catalog: &MealCatalog) -> Result<()> {
    let profile = prompt_profile()?;
    let request: PlanRequest = prompt_request()?;

    let prices = FallbackPriceProvider::new().snapshot(&request.location);
    let planner = RuleBasedPlanner::new(with_seed(config, seed));
    let output = planner.generate(&profile, &request, catalog, &prices)?;

    display_plan(&output);

    if prompt_yes_no("Save the plan as JSON?", false)? {
        let path = "meal_plan.json";
        save_plan(path, &output)?;
        eprintln!("Plan saved to {}", path);
    }

    Ok(())
}
