use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::wire::{MealsEnvelope, RawArea, RawCategory, RawMeal, RawStub};
use super::RecipeSource;
use crate::config::FinderConfig;
use crate::error::FinderError;
use crate::model::{RecipeDetail, RecipeStub};

/// [`RecipeSource`] backed by TheMealDB JSON API
pub struct MealDbSource {
    client: Client,
    base_url: String,
}

impl MealDbSource {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, FinderError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("meal-finder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                FinderError::BuilderError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &FinderConfig) -> Result<Self, FinderError> {
        Self::new(
            config.base_url.clone(),
            Some(Duration::from_secs(config.timeout)),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, FinderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let envelope: MealsEnvelope<T> = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope.into_vec())
    }

    async fn stubs(
        &self,
        endpoint: &str,
        key: &str,
        value: &str,
    ) -> Result<Vec<RecipeStub>, FinderError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Vec::new());
        }

        let stubs = self.get::<RawStub>(endpoint, &[(key, value)]).await?;
        Ok(stubs.into_iter().map(RecipeStub::from).collect())
    }

    async fn single(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<RecipeDetail>, FinderError> {
        let meals = self.get::<RawMeal>(endpoint, query).await?;
        Ok(meals.into_iter().next().map(RecipeDetail::from))
    }
}

#[async_trait]
impl RecipeSource for MealDbSource {
    async fn find_by_category(&self, category: &str) -> Result<Vec<RecipeStub>, FinderError> {
        self.stubs("filter.php", "c", category).await
    }

    async fn find_by_area(&self, area: &str) -> Result<Vec<RecipeStub>, FinderError> {
        self.stubs("filter.php", "a", area).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<RecipeDetail>, FinderError> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }
        self.single("lookup.php", &[("i", id)]).await
    }

    async fn scan_all(&self) -> Result<Vec<RecipeStub>, FinderError> {
        // search.php returns full records; only the stub fields are kept
        let meals = self.get::<RawStub>("search.php", &[("s", "")]).await?;
        Ok(meals.into_iter().map(RecipeStub::from).collect())
    }

    async fn find_random(&self) -> Result<Option<RecipeDetail>, FinderError> {
        self.single("random.php", &[]).await
    }

    async fn find_by_ingredient(&self, ingredient: &str) -> Result<Vec<RecipeStub>, FinderError> {
        self.stubs("filter.php", "i", ingredient).await
    }

    async fn list_categories(&self) -> Result<Vec<String>, FinderError> {
        let categories = self.get::<RawCategory>("list.php", &[("c", "list")]).await?;
        Ok(categories.into_iter().map(|c| c.name).collect())
    }

    async fn list_areas(&self) -> Result<Vec<String>, FinderError> {
        let areas = self.get::<RawArea>("list.php", &[("a", "list")]).await?;
        Ok(areas.into_iter().map(|a| a.name).collect())
    }
}
