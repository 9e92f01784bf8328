//! JSON shapes returned by the meal catalog
//!
//! Every endpoint wraps its payload as `{ "meals": [...] }`, where `meals`
//! may be `null` or missing when nothing matched.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::model::{Ingredient, RecipeDetail, RecipeStub, INGREDIENT_SLOTS};

#[derive(Debug, Deserialize)]
pub(crate) struct MealsEnvelope<T> {
    pub meals: Option<Vec<T>>,
}

impl<T> MealsEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.meals.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStub {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal")]
    name: String,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
}

impl From<RawStub> for RecipeStub {
    fn from(raw: RawStub) -> Self {
        RecipeStub {
            id: raw.id,
            name: raw.name,
            thumbnail_url: raw.thumbnail.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMeal {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal")]
    name: String,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strArea", default)]
    area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    /// strIngredientN / strMeasureN and anything else we don't model
    #[serde(flatten)]
    slots: HashMap<String, Value>,
}

impl RawMeal {
    fn slot(&self, prefix: &str, index: usize) -> Option<&str> {
        self.slots
            .get(&format!("{}{}", prefix, index))
            .and_then(Value::as_str)
            .map(str::trim)
    }

    /// Collects ingredient slots in order, stopping at the first blank one
    fn ingredients(&self) -> Vec<Ingredient> {
        (1..=INGREDIENT_SLOTS)
            .map_while(|i| {
                let name = self.slot("strIngredient", i).filter(|n| !n.is_empty())?;
                Some(Ingredient {
                    name: name.to_string(),
                    measure: self.slot("strMeasure", i).unwrap_or_default().to_string(),
                })
            })
            .collect()
    }
}

impl From<RawMeal> for RecipeDetail {
    fn from(raw: RawMeal) -> Self {
        let ingredients = raw.ingredients();
        RecipeDetail {
            id: raw.id,
            name: raw.name,
            thumbnail_url: raw.thumbnail.unwrap_or_default(),
            category: raw.category.unwrap_or_default(),
            area: raw.area.unwrap_or_default(),
            instructions: raw.instructions.unwrap_or_default(),
            ingredients,
            estimated_calories: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCategory {
    #[serde(rename = "strCategory")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArea {
    #[serde(rename = "strArea")]
    pub name: String,
}
