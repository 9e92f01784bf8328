//! UniFFI bindings for meal-finder
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! It wraps the async Rust API with synchronous functions that manage their own tokio runtime.

use std::fmt;
use std::time::Duration;

use crate::{FinderError, RecipeDetail, RecipeFinder, RecipeSource};

#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible recipe structure
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipe {
    pub id: String,
    pub name: String,
    pub thumbnail_url: String,
    pub category: String,
    pub area: String,
    pub instructions: String,
    /// Ingredients formatted as `"<name> (<measure>)"`
    pub ingredients: Vec<String>,
    /// Synthetic estimate, absent when the recipe was not enriched
    pub estimated_calories: Option<u32>,
}

impl From<RecipeDetail> for FfiRecipe {
    fn from(detail: RecipeDetail) -> Self {
        FfiRecipe {
            ingredients: detail.grocery_items(),
            id: detail.id,
            name: detail.name,
            thumbnail_url: detail.thumbnail_url,
            category: detail.category,
            area: detail.area,
            instructions: detail.instructions,
            estimated_calories: detail.estimated_calories,
        }
    }
}

/// Filter input as collected by a mobile UI
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiFilterCriteria {
    pub category: Option<String>,
    pub area: Option<String>,
    /// Raw text of the calorie field; blank means no ceiling
    pub max_calories: Option<String>,
    /// Diet tag names such as `"vegan"` or `"gluten-free"`
    pub diets: Vec<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiFinderError {
    TransportError { message: String },
    InvalidCriteria { message: String },
    ConfigError { message: String },
    RuntimeError { message: String },
}

impl fmt::Display for FfiFinderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiFinderError::TransportError { message } => {
                write!(f, "Transport error: {}", message)
            }
            FfiFinderError::InvalidCriteria { message } => {
                write!(f, "Invalid criteria: {}", message)
            }
            FfiFinderError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiFinderError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiFinderError {}

impl From<FinderError> for FfiFinderError {
    fn from(err: FinderError) -> Self {
        match err {
            FinderError::FetchError(e) => FfiFinderError::TransportError {
                message: e.to_string(),
            },
            FinderError::SourceError(msg) => FfiFinderError::TransportError { message: msg },
            FinderError::InvalidCriteria(msg) => FfiFinderError::InvalidCriteria { message: msg },
            FinderError::ConfigError(e) => FfiFinderError::ConfigError {
                message: e.to_string(),
            },
            FinderError::BuilderError(msg) => FfiFinderError::ConfigError { message: msg },
        }
    }
}

fn create_runtime() -> Result<tokio::runtime::Runtime, FfiFinderError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiFinderError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

/// Run a filtered search and return the matching recipes
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn filter_recipes(criteria: FfiFilterCriteria) -> Result<Vec<FfiRecipe>, FfiFinderError> {
    let rt = create_runtime()?;
    rt.block_on(async { filter_recipes_async(criteria).await })
}

async fn filter_recipes_async(
    criteria: FfiFilterCriteria,
) -> Result<Vec<FfiRecipe>, FfiFinderError> {
    let mut builder = RecipeFinder::builder();

    if let Some(category) = criteria.category {
        builder = builder.category(category);
    }

    if let Some(area) = criteria.area {
        builder = builder.area(area);
    }

    if let Some(max_calories) = criteria.max_calories {
        builder = builder.max_calories_text(max_calories);
    }

    for diet in criteria.diets {
        builder = builder.diet_name(diet);
    }

    if let Some(timeout_secs) = criteria.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }

    let recipes = builder.build().await?;
    Ok(recipes.into_iter().map(FfiRecipe::from).collect())
}

/// Fetch a random recipe; `None` if the catalog returned nothing
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn random_recipe() -> Result<Option<FfiRecipe>, FfiFinderError> {
    let rt = create_runtime()?;
    let recipe = rt.block_on(crate::random_recipe())?;
    Ok(recipe.map(FfiRecipe::from))
}

/// Look up a recipe by id; `None` if the id is unknown
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn lookup_recipe(id: String) -> Result<Option<FfiRecipe>, FfiFinderError> {
    let rt = create_runtime()?;
    let recipe = rt.block_on(crate::lookup_recipe(&id))?;
    Ok(recipe.map(FfiRecipe::from))
}

/// Category names for populating a picker
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn list_categories() -> Result<Vec<String>, FfiFinderError> {
    let rt = create_runtime()?;
    let source = crate::default_source()?;
    Ok(rt.block_on(source.list_categories())?)
}

/// Area names for populating a picker
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn list_areas() -> Result<Vec<String>, FfiFinderError> {
    let rt = create_runtime()?;
    let source = crate::default_source()?;
    Ok(rt.block_on(source.list_areas())?)
}
