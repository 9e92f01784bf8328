use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use log::warn;

use crate::calories::CalorieEstimator;
use crate::config::FinderConfig;
use crate::error::FinderError;
use crate::model::{DietTag, FilterCriteria, RecipeDetail};
use crate::pipeline::FilterPipeline;
use crate::source::{MealDbSource, RecipeSource};

/// Calorie ceiling as given by the caller
#[derive(Debug, Clone)]
enum CalorieBound {
    Value(u32),
    Text(String),
}

/// Builder for configuring and running a filtered recipe search
#[derive(Default)]
pub struct RecipeFinderBuilder {
    category: Option<String>,
    area: Option<String>,
    max_calories: Option<CalorieBound>,
    diets: BTreeSet<DietTag>,
    diet_names: Vec<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    concurrency: Option<usize>,
    source: Option<Arc<dyn RecipeSource>>,
    estimator: Option<CalorieEstimator>,
}

impl RecipeFinderBuilder {
    /// Only recipes in this category
    ///
    /// # Example
    /// ```
    /// use meal_finder::RecipeFinder;
    ///
    /// let builder = RecipeFinder::builder().category("Seafood");
    /// ```
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Only recipes from this area (region of origin)
    ///
    /// Combined with [`category`](Self::category), the category listing is
    /// narrowed to the recipes the area listing also contains.
    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Drop recipes whose estimated calories exceed `max`
    pub fn max_calories(mut self, max: u32) -> Self {
        self.max_calories = Some(CalorieBound::Value(max));
        self
    }

    /// Calorie ceiling as typed by a user
    ///
    /// Blank text means no ceiling. Anything else that is not a non-negative
    /// integer makes [`build`](Self::build) fail with `InvalidCriteria`.
    ///
    /// # Example
    /// ```
    /// use meal_finder::RecipeFinder;
    ///
    /// let criteria = RecipeFinder::builder().max_calories_text("600").criteria().unwrap();
    /// assert_eq!(criteria.max_calories, Some(600));
    ///
    /// assert!(RecipeFinder::builder().max_calories_text("lots").criteria().is_err());
    /// ```
    pub fn max_calories_text(mut self, raw: impl Into<String>) -> Self {
        self.max_calories = Some(CalorieBound::Text(raw.into()));
        self
    }

    /// Require a dietary tag; may be called repeatedly
    pub fn diet(mut self, tag: DietTag) -> Self {
        self.diets.insert(tag);
        self
    }

    /// Require a dietary tag by name, e.g. `"gluten-free"`
    ///
    /// Unknown names make [`build`](Self::build) fail with `InvalidCriteria`.
    pub fn diet_name(mut self, name: impl Into<String>) -> Self {
        self.diet_names.push(name.into());
        self
    }

    /// Catalog base URL, overriding configuration
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Timeout applied to every catalog request
    ///
    /// # Example
    /// ```
    /// use meal_finder::RecipeFinder;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeFinder::builder()
    ///     .area("Italian")
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Number of detail lookups allowed in flight at once
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = Some(limit);
        self
    }

    /// Query this source instead of the HTTP catalog
    ///
    /// `meal-finder.toml` and `MEAL_FINDER__*` are not read when a source is
    /// injected. Enrichment stays sequential unless [`concurrency`](Self::concurrency) is set.
    pub fn source(mut self, source: Arc<dyn RecipeSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Use this estimator instead of the randomized default
    pub fn estimator(mut self, estimator: CalorieEstimator) -> Self {
        self.estimator = Some(estimator);
        self
    }

    /// Validates the collected input into [`FilterCriteria`]
    ///
    /// No request is made.
    pub fn criteria(&self) -> Result<FilterCriteria, FinderError> {
        let max_calories = match &self.max_calories {
            None => None,
            Some(CalorieBound::Value(max)) => Some(*max),
            Some(CalorieBound::Text(raw)) => FilterCriteria::parse_max_calories(raw)?,
        };

        let mut diets = self.diets.clone();
        diets.extend(FilterCriteria::parse_diets(&self.diet_names)?);

        Ok(FilterCriteria {
            category: self.category.clone(),
            area: self.area.clone(),
            max_calories,
            diets,
        })
    }

    /// Build and execute the search
    ///
    /// # Errors
    /// Returns `FinderError` if:
    /// - a diet name or calorie text is invalid (before any request is made)
    /// - configuration cannot be loaded
    /// - any catalog request fails, in which case no partial results are returned
    ///
    /// # Example
    /// ```no_run
    /// # use meal_finder::RecipeFinder;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let recipes = RecipeFinder::builder()
    ///     .category("Seafood")
    ///     .max_calories(600)
    ///     .diet_name("dairy-free")
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<Vec<RecipeDetail>, FinderError> {
        let criteria = self.criteria()?;
        let pipeline = self.into_pipeline()?;
        pipeline.run(&criteria).await
    }

    fn into_pipeline(self) -> Result<FilterPipeline, FinderError> {
        let (source, config): (Arc<dyn RecipeSource>, FinderConfig) = match self.source {
            Some(source) => {
                if self.base_url.is_some() || self.timeout.is_some() {
                    warn!("base_url and timeout are ignored with an injected source");
                }
                (source, FinderConfig::default())
            }
            None => {
                let config = FinderConfig::load()?;
                let source = MealDbSource::new(
                    self.base_url.unwrap_or_else(|| config.base_url.clone()),
                    Some(self.timeout.unwrap_or(Duration::from_secs(config.timeout))),
                )?;
                (Arc::new(source), config)
            }
        };

        let mut pipeline = FilterPipeline::new(source)
            .with_concurrency(self.concurrency.unwrap_or(config.enrichment_concurrency));
        if let Some(estimator) = self.estimator {
            pipeline = pipeline.with_estimator(estimator);
        }
        Ok(pipeline)
    }
}

/// Main entry point for the builder API
pub struct RecipeFinder;

impl RecipeFinder {
    /// Creates a new builder for a filtered search
    ///
    /// # Example
    /// ```
    /// use meal_finder::RecipeFinder;
    ///
    /// let builder = RecipeFinder::builder();
    /// ```
    pub fn builder() -> RecipeFinderBuilder {
        RecipeFinderBuilder::default()
    }
}
