//! Recipe discovery against a remote meal catalog
//!
//! The core is [`FilterPipeline`]: it combines category and area listings,
//! resolves each candidate into a full record, attaches a synthetic calorie
//! estimate and applies calorie and dietary filters.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), meal_finder::FinderError> {
//! let recipes = meal_finder::RecipeFinder::builder()
//!     .category("Seafood")
//!     .area("British")
//!     .max_calories(650)
//!     .build()
//!     .await?;
//! for recipe in recipes {
//!     println!("{} ~{:?} kcal", recipe.name, recipe.estimated_calories);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod calories;
pub mod config;
pub mod diet;
pub mod enricher;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod source;
pub mod uniffi_bindings;

pub use builder::{RecipeFinder, RecipeFinderBuilder};
pub use calories::{CalorieEstimator, FixedOffset, OffsetSource, QueuedOffsets, RandomOffset};
pub use config::FinderConfig;
pub use diet::DietMatcher;
pub use enricher::DetailEnricher;
pub use error::FinderError;
pub use model::{DietTag, FilterCriteria, Ingredient, RecipeDetail, RecipeStub};
pub use pipeline::FilterPipeline;
pub use source::{InMemorySource, MealDbSource, RecipeSource, SourceCall};

use std::sync::Arc;

use log::debug;

/// HTTP catalog source built from the loaded configuration
pub fn default_source() -> Result<MealDbSource, FinderError> {
    let config = FinderConfig::load()?;
    debug!("Using catalog at {}", config.base_url);
    MealDbSource::from_config(&config)
}

/// Runs a filtered search against the configured catalog
///
/// # Example
/// ```no_run
/// use meal_finder::{filter_recipes, DietTag, FilterCriteria};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), meal_finder::FinderError> {
/// let criteria = FilterCriteria {
///     area: Some("Indian".to_string()),
///     diets: [DietTag::Vegetarian].into_iter().collect(),
///     ..Default::default()
/// };
/// let recipes = filter_recipes(&criteria).await?;
/// # Ok(())
/// # }
/// ```
pub async fn filter_recipes(criteria: &FilterCriteria) -> Result<Vec<RecipeDetail>, FinderError> {
    let config = FinderConfig::load()?;
    let source = MealDbSource::from_config(&config)?;
    FilterPipeline::new(Arc::new(source))
        .with_concurrency(config.enrichment_concurrency)
        .run(criteria)
        .await
}

/// Fetches one random recipe from the configured catalog
pub async fn random_recipe() -> Result<Option<RecipeDetail>, FinderError> {
    default_source()?.find_random().await
}

/// Looks up a single recipe by id in the configured catalog
pub async fn lookup_recipe(id: &str) -> Result<Option<RecipeDetail>, FinderError> {
    default_source()?.find_by_id(id).await
}
