mod mealdb;
mod memory;
mod wire;

pub use mealdb::MealDbSource;
pub use memory::{InMemorySource, SourceCall};

use async_trait::async_trait;

use crate::error::FinderError;
use crate::model::{RecipeDetail, RecipeStub};

/// Remote recipe catalog
///
/// Every call is one round-trip. An empty result is `Ok(vec![])` or
/// `Ok(None)`; `Err` is reserved for transport failures.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Stubs in the given category; empty for a blank or unknown category
    async fn find_by_category(&self, category: &str) -> Result<Vec<RecipeStub>, FinderError>;

    /// Stubs from the given area; empty for a blank or unknown area
    async fn find_by_area(&self, area: &str) -> Result<Vec<RecipeStub>, FinderError>;

    /// Full record for `id`, `None` when the id is unknown
    async fn find_by_id(&self, id: &str) -> Result<Option<RecipeDetail>, FinderError>;

    /// The whole catalog
    async fn scan_all(&self) -> Result<Vec<RecipeStub>, FinderError>;

    /// A single random recipe
    async fn find_random(&self) -> Result<Option<RecipeDetail>, FinderError>;

    /// Stubs using the given main ingredient
    async fn find_by_ingredient(&self, ingredient: &str)
        -> Result<Vec<RecipeStub>, FinderError>;

    /// Names of all categories
    async fn list_categories(&self) -> Result<Vec<String>, FinderError>;

    /// Names of all areas
    async fn list_areas(&self) -> Result<Vec<String>, FinderError>;
}
