use log::{debug, warn};

use crate::calories::CalorieEstimator;
use crate::error::FinderError;
use crate::model::{RecipeDetail, RecipeStub};
use crate::source::RecipeSource;

/// Resolves stubs into full records with a calorie estimate attached
pub struct DetailEnricher<'a> {
    source: &'a dyn RecipeSource,
    estimator: &'a CalorieEstimator,
}

impl<'a> DetailEnricher<'a> {
    pub fn new(source: &'a dyn RecipeSource, estimator: &'a CalorieEstimator) -> Self {
        Self { source, estimator }
    }

    /// Looks up `stub` by id
    ///
    /// Returns `Ok(None)` when the catalog no longer knows the id; the caller
    /// is expected to drop the candidate. Transport failures propagate.
    pub async fn enrich(&self, stub: &RecipeStub) -> Result<Option<RecipeDetail>, FinderError> {
        let Some(mut detail) = self.source.find_by_id(&stub.id).await? else {
            warn!("Dropping '{}' ({}): no detail record", stub.name, stub.id);
            return Ok(None);
        };

        let calories = self.estimator.estimate(&detail);
        debug!("Enriched {} '{}' ~{} kcal", detail.id, detail.name, calories);
        detail.estimated_calories = Some(calories);
        Ok(Some(detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calories::FixedOffset;
    use crate::model::Ingredient;
    use crate::source::{InMemorySource, SourceCall};

    fn recipe(id: &str, ingredients: usize) -> RecipeDetail {
        RecipeDetail {
            id: id.to_string(),
            name: format!("Recipe {}", id),
            thumbnail_url: String::new(),
            category: "Beef".to_string(),
            area: "Irish".to_string(),
            instructions: String::new(),
            ingredients: (0..ingredients)
                .map(|i| Ingredient {
                    name: format!("item {}", i),
                    measure: "1".to_string(),
                })
                .collect(),
            estimated_calories: None,
        }
    }

    #[tokio::test]
    async fn test_enrich_attaches_estimate() {
        let source = InMemorySource::with_recipes(vec![recipe("1", 3), recipe("2", 14)]);
        let estimator = CalorieEstimator::new(FixedOffset(25));
        let enricher = DetailEnricher::new(&source, &estimator);

        let lean = enricher.enrich(&recipe("1", 0).to_stub()).await.unwrap().unwrap();
        assert_eq!(lean.estimated_calories, Some(475));
        assert_eq!(lean.ingredients.len(), 3);

        let rich = enricher.enrich(&recipe("2", 0).to_stub()).await.unwrap().unwrap();
        assert_eq!(rich.estimated_calories, Some(725));
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let source = InMemorySource::new();
        let estimator = CalorieEstimator::default();
        let enricher = DetailEnricher::new(&source, &estimator);

        let result = enricher.enrich(&recipe("404", 0).to_stub()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let source = InMemorySource::new().failing_on(SourceCall::Id);
        let estimator = CalorieEstimator::default();
        let enricher = DetailEnricher::new(&source, &estimator);

        let result = enricher.enrich(&recipe("1", 0).to_stub()).await;
        assert!(result.unwrap_err().is_transport());
    }
}
