//! In-memory catalog for offline use and tests
//!
//! Listings by category and area are derived from the loaded records and can
//! be overridden, e.g. to reference ids that have no detail record. Any
//! operation can be made to fail as a transport error.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use rand::seq::SliceRandom;

use super::RecipeSource;
use crate::error::FinderError;
use crate::model::{RecipeDetail, RecipeStub};

/// Catalog operations, used to inject failures and inspect traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCall {
    Category,
    Area,
    Id,
    ScanAll,
    Random,
    Ingredient,
    ListCategories,
    ListAreas,
}

#[derive(Debug, Default)]
pub struct InMemorySource {
    recipes: Vec<RecipeDetail>,
    categories: HashMap<String, Vec<RecipeStub>>,
    areas: HashMap<String, Vec<RecipeStub>>,
    failing: HashSet<SourceCall>,
    calls: Mutex<Vec<(SourceCall, String)>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `recipes` and indexes them by their category and area fields
    pub fn with_recipes(recipes: Vec<RecipeDetail>) -> Self {
        let mut categories: HashMap<String, Vec<RecipeStub>> = HashMap::new();
        let mut areas: HashMap<String, Vec<RecipeStub>> = HashMap::new();
        for recipe in &recipes {
            if !recipe.category.is_empty() {
                categories
                    .entry(recipe.category.clone())
                    .or_default()
                    .push(recipe.to_stub());
            }
            if !recipe.area.is_empty() {
                areas
                    .entry(recipe.area.clone())
                    .or_default()
                    .push(recipe.to_stub());
            }
        }

        Self {
            recipes,
            categories,
            areas,
            ..Default::default()
        }
    }

    /// Replaces what a category lookup returns
    pub fn with_category_listing(mut self, category: &str, stubs: Vec<RecipeStub>) -> Self {
        self.categories.insert(category.to_string(), stubs);
        self
    }

    /// Replaces what an area lookup returns
    pub fn with_area_listing(mut self, area: &str, stubs: Vec<RecipeStub>) -> Self {
        self.areas.insert(area.to_string(), stubs);
        self
    }

    /// Makes every call of the given kind fail
    pub fn failing_on(mut self, call: SourceCall) -> Self {
        self.failing.insert(call);
        self
    }

    /// Calls received so far, with their argument
    pub fn calls(&self) -> Vec<(SourceCall, String)> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn call_count(&self, kind: SourceCall) -> usize {
        self.calls().iter().filter(|(call, _)| *call == kind).count()
    }

    fn record(&self, call: SourceCall, argument: &str) -> Result<(), FinderError> {
        let mut calls = match self.calls.lock() {
            Ok(calls) => calls,
            Err(poisoned) => poisoned.into_inner(),
        };
        calls.push((call, argument.to_string()));

        if self.failing.contains(&call) {
            return Err(FinderError::SourceError(format!(
                "{:?} lookup failed for '{}'",
                call, argument
            )));
        }
        Ok(())
    }

    fn listing(map: &HashMap<String, Vec<RecipeStub>>, key: &str) -> Vec<RecipeStub> {
        map.get(key.trim()).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl RecipeSource for InMemorySource {
    async fn find_by_category(&self, category: &str) -> Result<Vec<RecipeStub>, FinderError> {
        self.record(SourceCall::Category, category)?;
        Ok(Self::listing(&self.categories, category))
    }

    async fn find_by_area(&self, area: &str) -> Result<Vec<RecipeStub>, FinderError> {
        self.record(SourceCall::Area, area)?;
        Ok(Self::listing(&self.areas, area))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<RecipeDetail>, FinderError> {
        self.record(SourceCall::Id, id)?;
        Ok(self.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn scan_all(&self) -> Result<Vec<RecipeStub>, FinderError> {
        self.record(SourceCall::ScanAll, "")?;
        Ok(self.recipes.iter().map(RecipeDetail::to_stub).collect())
    }

    async fn find_random(&self) -> Result<Option<RecipeDetail>, FinderError> {
        self.record(SourceCall::Random, "")?;
        Ok(self.recipes.choose(&mut rand::thread_rng()).cloned())
    }

    async fn find_by_ingredient(&self, ingredient: &str) -> Result<Vec<RecipeStub>, FinderError> {
        self.record(SourceCall::Ingredient, ingredient)?;
        let needle = ingredient.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .recipes
            .iter()
            .filter(|r| {
                r.ingredients
                    .iter()
                    .any(|i| i.name.to_lowercase().contains(&needle))
            })
            .map(RecipeDetail::to_stub)
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<String>, FinderError> {
        self.record(SourceCall::ListCategories, "")?;
        let names: BTreeSet<&String> = self.categories.keys().collect();
        Ok(names.into_iter().cloned().collect())
    }

    async fn list_areas(&self) -> Result<Vec<String>, FinderError> {
        self.record(SourceCall::ListAreas, "")?;
        let names: BTreeSet<&String> = self.areas.keys().collect();
        Ok(names.into_iter().cloned().collect())
    }
}
