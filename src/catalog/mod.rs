pub mod meal_catalog;
pub mod nutrition_db;
pub mod prices;

pub use meal_catalog::{builtin_options, CatalogEntry, MealCatalog};
pub use nutrition_db::NutritionDatabase;
pub use prices::{fallback_prices, FallbackPriceProvider, PriceProvider, FALLBACK_SOURCE};
