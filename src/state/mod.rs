mod persistence;

pub use persistence::{load_catalog, load_config, load_price_overrides, load_profile, save_plan};
