use std::collections::HashSet;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info};

use crate::calories::CalorieEstimator;
use crate::diet::DietMatcher;
use crate::enricher::DetailEnricher;
use crate::error::FinderError;
use crate::model::{FilterCriteria, RecipeDetail, RecipeStub};
use crate::source::RecipeSource;

/// Turns [`FilterCriteria`] into the list of matching recipes
///
/// The run is:
/// 1. Resolve base candidates. With a category, its listing is the base;
///    with an area as well, the base is narrowed to ids the area listing also
///    has (the category order is kept). With only an area, its listing is the
///    base. With neither, the whole catalog is scanned.
/// 2. Enrich every candidate in order, dropping ids the catalog can't resolve.
/// 3. Keep records under the calorie ceiling that satisfy every diet tag.
///
/// Any transport failure aborts the run; nothing gathered before it is returned.
pub struct FilterPipeline {
    source: Arc<dyn RecipeSource>,
    estimator: CalorieEstimator,
    matcher: DietMatcher,
    concurrency: usize,
}

impl FilterPipeline {
    pub fn new(source: Arc<dyn RecipeSource>) -> Self {
        Self {
            source,
            estimator: CalorieEstimator::default(),
            matcher: DietMatcher,
            concurrency: 1,
        }
    }

    pub fn with_estimator(mut self, estimator: CalorieEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Allows up to `limit` detail lookups in flight; 1 keeps them sequential
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    pub fn source(&self) -> &dyn RecipeSource {
        self.source.as_ref()
    }

    pub async fn run(&self, criteria: &FilterCriteria) -> Result<Vec<RecipeDetail>, FinderError> {
        let candidates = self.candidates(criteria).await?;
        if candidates.is_empty() {
            info!("No candidates for {:?}", criteria);
            return Ok(Vec::new());
        }

        let total = candidates.len();
        let detailed = self.enrich_all(candidates).await?;
        let results: Vec<RecipeDetail> = detailed
            .into_iter()
            .filter(|detail| self.keep(detail, criteria))
            .collect();

        info!("{} of {} candidates matched", results.len(), total);
        Ok(results)
    }

    async fn candidates(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<RecipeStub>, FinderError> {
        let by_category = match criteria.category() {
            Some(category) => Some(self.source.find_by_category(category).await?),
            None => None,
        };
        let by_area = match criteria.area() {
            Some(area) => Some(self.source.find_by_area(area).await?),
            None => None,
        };

        let base = match (by_category, by_area) {
            (Some(category), Some(area)) => {
                let area_ids: HashSet<&str> = area.iter().map(|s| s.id.as_str()).collect();
                category
                    .into_iter()
                    .filter(|stub| area_ids.contains(stub.id.as_str()))
                    .collect()
            }
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => self.source.scan_all().await?,
        };

        Ok(dedup_by_id(base))
    }

    async fn enrich_all(
        &self,
        stubs: Vec<RecipeStub>,
    ) -> Result<Vec<RecipeDetail>, FinderError> {
        let enricher = DetailEnricher::new(self.source.as_ref(), &self.estimator);

        if self.concurrency == 1 {
            let mut detailed = Vec::with_capacity(stubs.len());
            for stub in &stubs {
                if let Some(detail) = enricher.enrich(stub).await? {
                    detailed.push(detail);
                }
            }
            return Ok(detailed);
        }

        debug!(
            "Enriching {} candidates, {} at a time",
            stubs.len(),
            self.concurrency
        );
        // buffered() yields in input order regardless of completion order
        let resolved: Vec<Option<RecipeDetail>> = stream::iter(stubs.iter())
            .map(|stub| enricher.enrich(stub))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(resolved.into_iter().flatten().collect())
    }

    fn keep(&self, detail: &RecipeDetail, criteria: &FilterCriteria) -> bool {
        let under_ceiling = match criteria.max_calories {
            None => true,
            Some(max) => detail.estimated_calories.is_some_and(|c| c <= max),
        };
        under_ceiling && self.matcher.matches(detail, &criteria.diets)
    }
}

fn dedup_by_id(stubs: Vec<RecipeStub>) -> Vec<RecipeStub> {
    let mut seen = HashSet::new();
    stubs
        .into_iter()
        .filter(|stub| seen.insert(stub.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calories::{FixedOffset, QueuedOffsets};
    use crate::model::{DietTag, Ingredient};
    use crate::source::{InMemorySource, SourceCall};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    fn recipe(id: &str, name: &str, category: &str, area: &str) -> RecipeDetail {
        RecipeDetail {
            id: id.to_string(),
            name: name.to_string(),
            thumbnail_url: format!("https://example.com/{}.jpg", id),
            category: category.to_string(),
            area: area.to_string(),
            instructions: "Cook it.".to_string(),
            ingredients: vec![Ingredient {
                name: "Salt".to_string(),
                measure: "pinch".to_string(),
            }],
            estimated_calories: None,
        }
    }

    fn stub(id: &str, name: &str) -> RecipeStub {
        RecipeStub {
            id: id.to_string(),
            name: name.to_string(),
            thumbnail_url: String::new(),
        }
    }

    fn catalog() -> Vec<RecipeDetail> {
        vec![
            recipe("1", "Fish Pie", "Seafood", "British"),
            recipe("2", "Crab Cakes", "Seafood", "American"),
            recipe("3", "Paella", "Seafood", "Spanish"),
            recipe("4", "Chicken Curry", "Chicken", "Indian"),
            recipe("5", "Garden Salad", "Vegetarian", "British"),
            recipe("6", "Vegetable Korma", "Vegetarian", "Indian"),
        ]
    }

    fn ids(results: &[RecipeDetail]) -> Vec<&str> {
        results.iter().map(|r| r.id.as_str()).collect()
    }

    fn pipeline(source: Arc<InMemorySource>) -> FilterPipeline {
        FilterPipeline::new(source).with_estimator(CalorieEstimator::new(FixedOffset(0)))
    }

    #[tokio::test]
    async fn test_calorie_ceiling_with_category() {
        let source = Arc::new(
            InMemorySource::with_recipes(catalog())
                .with_category_listing(
                    "Seafood",
                    vec![
                        stub("1", "Fish Pie"),
                        stub("2", "Crab Cakes"),
                    ],
                ),
        );
        // Fish Pie is enriched first (450 + 170), Crab Cakes second (450 + 30)
        let pipeline = FilterPipeline::new(source)
            .with_estimator(CalorieEstimator::new(QueuedOffsets::new([170, 30])));

        let criteria = FilterCriteria {
            category: Some("Seafood".to_string()),
            max_calories: Some(500),
            ..Default::default()
        };
        let results = pipeline.run(&criteria).await.unwrap();

        assert_eq!(ids(&results), vec!["2"]);
        assert_eq!(results[0].name, "Crab Cakes");
        assert_eq!(results[0].estimated_calories, Some(480));
    }

    #[tokio::test]
    async fn test_category_and_area_intersect_in_category_order() {
        let source = Arc::new(
            InMemorySource::with_recipes(catalog())
                .with_category_listing(
                    "Seafood",
                    vec![
                        stub("3", "Paella"),
                        stub("1", "Fish Pie"),
                        stub("2", "Crab Cakes"),
                    ],
                )
                .with_area_listing(
                    "Mixed",
                    vec![
                        stub("1", "Fish Pie"),
                        stub("5", "Garden Salad"),
                        stub("3", "Paella"),
                    ],
                ),
        );

        let criteria = FilterCriteria {
            category: Some("Seafood".to_string()),
            area: Some("Mixed".to_string()),
            ..Default::default()
        };
        let results = pipeline(source.clone()).run(&criteria).await.unwrap();

        assert_eq!(ids(&results), vec!["3", "1"]);
        assert_eq!(source.call_count(SourceCall::ScanAll), 0);
    }

    #[tokio::test]
    async fn test_empty_category_with_area_is_empty() {
        let source = Arc::new(InMemorySource::with_recipes(catalog()));
        let criteria = FilterCriteria {
            category: Some("Pasta".to_string()),
            area: Some("British".to_string()),
            ..Default::default()
        };

        let results = pipeline(source.clone()).run(&criteria).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(source.call_count(SourceCall::Id), 0);
    }

    #[tokio::test]
    async fn test_area_only() {
        let source = Arc::new(InMemorySource::with_recipes(catalog()));
        let criteria = FilterCriteria {
            area: Some("Indian".to_string()),
            ..Default::default()
        };

        let results = pipeline(source.clone()).run(&criteria).await.unwrap();
        assert_eq!(ids(&results), vec!["4", "6"]);
        assert_eq!(source.call_count(SourceCall::Category), 0);
    }

    #[tokio::test]
    async fn test_no_category_or_area_scans_catalog() {
        let source = Arc::new(InMemorySource::with_recipes(catalog()));
        let results = pipeline(source.clone())
            .run(&FilterCriteria::new())
            .await
            .unwrap();

        assert_eq!(ids(&results), vec!["1", "2", "3", "4", "5", "6"]);
        assert_eq!(source.call_count(SourceCall::ScanAll), 1);
        assert_eq!(source.call_count(SourceCall::Category), 0);
        assert_eq!(source.call_count(SourceCall::Area), 0);
        assert!(results.iter().all(|r| r.estimated_calories == Some(450)));
    }

    #[tokio::test]
    async fn test_blank_category_counts_as_absent() {
        let source = Arc::new(InMemorySource::with_recipes(catalog()));
        let criteria = FilterCriteria {
            category: Some(String::new()),
            ..Default::default()
        };

        pipeline(source.clone()).run(&criteria).await.unwrap();
        assert_eq!(source.call_count(SourceCall::ScanAll), 1);
    }

    #[tokio::test]
    async fn test_vegan_excludes_chicken() {
        let source = Arc::new(InMemorySource::with_recipes(catalog()));
        let criteria = FilterCriteria {
            diets: [DietTag::Vegan].into_iter().collect(),
            ..Default::default()
        };

        let results = pipeline(source).run(&criteria).await.unwrap();
        assert!(!ids(&results).contains(&"4"));
        assert!(ids(&results).contains(&"5"));
    }

    #[tokio::test]
    async fn test_unresolvable_candidate_is_dropped() {
        let source = Arc::new(
            InMemorySource::with_recipes(catalog())
                .with_category_listing(
                    "Seafood",
                    vec![
                        stub("1", "Fish Pie"),
                        stub("404", "Ghost Stew"),
                        stub("2", "Crab Cakes"),
                    ],
                ),
        );
        let criteria = FilterCriteria {
            category: Some("Seafood".to_string()),
            ..Default::default()
        };

        let results = pipeline(source.clone()).run(&criteria).await.unwrap();
        assert_eq!(ids(&results), vec!["1", "2"]);
        assert_eq!(source.call_count(SourceCall::Id), 3);
    }

    #[tokio::test]
    async fn test_transport_failure_discards_everything() {
        let source =
            Arc::new(InMemorySource::with_recipes(catalog()).failing_on(SourceCall::Category));
        let criteria = FilterCriteria {
            category: Some("Seafood".to_string()),
            ..Default::default()
        };

        let result = pipeline(source.clone()).run(&criteria).await;
        assert!(result.unwrap_err().is_transport());
        assert_eq!(source.call_count(SourceCall::Id), 0);
    }

    #[tokio::test]
    async fn test_enrichment_failure_aborts_run() {
        let source = Arc::new(InMemorySource::with_recipes(catalog()).failing_on(SourceCall::Id));
        let result = pipeline(source.clone()).run(&FilterCriteria::new()).await;

        assert!(matches!(result, Err(FinderError::SourceError(_))));
        assert_eq!(source.call_count(SourceCall::Id), 1);
    }

    #[tokio::test]
    async fn test_duplicate_ids_appear_once() {
        let source = Arc::new(
            InMemorySource::with_recipes(catalog())
                .with_category_listing(
                    "Seafood",
                    vec![
                        stub("1", "Fish Pie"),
                        stub("2", "Crab Cakes"),
                        stub("1", "Fish Pie"),
                    ],
                ),
        );
        let criteria = FilterCriteria {
            category: Some("Seafood".to_string()),
            ..Default::default()
        };

        let results = pipeline(source).run(&criteria).await.unwrap();
        assert_eq!(ids(&results), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_enrichment_is_sequential_in_candidate_order() {
        let source = Arc::new(InMemorySource::with_recipes(catalog()));
        pipeline(source.clone())
            .run(&FilterCriteria::new())
            .await
            .unwrap();

        let looked_up: Vec<String> = source
            .calls()
            .into_iter()
            .filter(|(call, _)| *call == SourceCall::Id)
            .map(|(_, id)| id)
            .collect();
        assert_eq!(looked_up, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[tokio::test]
    async fn test_concurrent_enrichment_keeps_order() {
        let source = Arc::new(InMemorySource::with_recipes(catalog()));
        let results = pipeline(source)
            .with_concurrency(4)
            .run(&FilterCriteria::new())
            .await
            .unwrap();

        assert_eq!(ids(&results), vec!["1", "2", "3", "4", "5", "6"]);
    }

    /// Delays each id lookup so that later candidates resolve first
    struct SlowLookups {
        inner: InMemorySource,
        failing_id: Option<&'static str>,
        completed: Mutex<Vec<String>>,
    }

    impl SlowLookups {
        fn new(failing_id: Option<&'static str>) -> Self {
            Self {
                inner: InMemorySource::with_recipes(catalog()),
                failing_id,
                completed: Mutex::new(Vec::new()),
            }
        }

        fn completed(&self) -> Vec<String> {
            self.completed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecipeSource for SlowLookups {
        async fn find_by_category(&self, category: &str) -> Result<Vec<RecipeStub>, FinderError> {
            self.inner.find_by_category(category).await
        }

        async fn find_by_area(&self, area: &str) -> Result<Vec<RecipeStub>, FinderError> {
            self.inner.find_by_area(area).await
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<RecipeDetail>, FinderError> {
            let n: u64 = id.parse().unwrap();
            tokio::time::sleep(Duration::from_millis(100 - n * 15)).await;
            self.completed.lock().unwrap().push(id.to_string());
            if self.failing_id == Some(id) {
                return Err(FinderError::SourceError(format!("lookup {} timed out", id)));
            }
            self.inner.find_by_id(id).await
        }

        async fn scan_all(&self) -> Result<Vec<RecipeStub>, FinderError> {
            self.inner.scan_all().await
        }

        async fn find_random(&self) -> Result<Option<RecipeDetail>, FinderError> {
            self.inner.find_random().await
        }

        async fn find_by_ingredient(&self, name: &str) -> Result<Vec<RecipeStub>, FinderError> {
            self.inner.find_by_ingredient(name).await
        }

        async fn list_categories(&self) -> Result<Vec<String>, FinderError> {
            self.inner.list_categories().await
        }

        async fn list_areas(&self) -> Result<Vec<String>, FinderError> {
            self.inner.list_areas().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_enrichment_orders_by_candidate_not_completion() {
        let source = Arc::new(SlowLookups::new(None));
        let results = FilterPipeline::new(source.clone())
            .with_concurrency(6)
            .run(&FilterCriteria::new())
            .await
            .unwrap();

        assert_eq!(source.completed(), vec!["6", "5", "4", "3", "2", "1"]);
        assert_eq!(ids(&results), vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_enrichment_failure_discards_finished_lookups() {
        let source = Arc::new(SlowLookups::new(Some("2")));
        let result = FilterPipeline::new(source.clone())
            .with_concurrency(6)
            .run(&FilterCriteria::new())
            .await;

        assert!(matches!(result, Err(FinderError::SourceError(_))));
        // Other candidates had already resolved when the failure surfaced
        let completed = source.completed();
        assert!(completed.contains(&"1".to_string()));
        assert!(completed.contains(&"6".to_string()));
    }

    #[tokio::test]
    async fn test_repeated_runs_return_same_ids() {
        let source = Arc::new(InMemorySource::with_recipes(catalog()));
        let pipeline = FilterPipeline::new(source);
        let criteria = FilterCriteria {
            diets: [DietTag::DairyFree].into_iter().collect(),
            ..Default::default()
        };

        let first = pipeline.run(&criteria).await.unwrap();
        let second = pipeline.run(&criteria).await.unwrap();
        assert_eq!(ids(&first), ids(&second));
    }
}
