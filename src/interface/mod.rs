pub mod prompts;
pub mod render;

pub use prompts::{prompt_dietary_constraints, prompt_profile, prompt_request, prompt_yes_no};
pub use render::{display_catalog, display_plan, display_target, write_plan_json};
