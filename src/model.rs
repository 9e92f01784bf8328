use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FinderError;

/// Number of ingredient slots a catalog record carries
pub const INGREDIENT_SLOTS: usize = 20;

/// Minimal recipe reference returned by filtered catalog lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeStub {
    pub id: String,
    pub name: String,
    pub thumbnail_url: String,
}

/// One populated ingredient slot of a recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub name: String,
    /// Free-form quantity, empty when the catalog has none
    pub measure: String,
}

/// Full recipe record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeDetail {
    pub id: String,
    pub name: String,
    pub thumbnail_url: String,
    pub category: String,
    pub area: String,
    pub instructions: String,
    /// Ordered ingredient slots, at most [`INGREDIENT_SLOTS`] entries
    pub ingredients: Vec<Ingredient>,
    /// Synthetic estimate attached during enrichment; never a measured value
    pub estimated_calories: Option<u32>,
}

impl RecipeDetail {
    /// Returns the ingredient in 1-based `slot`, if populated
    pub fn ingredient_slot(&self, slot: usize) -> Option<&Ingredient> {
        slot.checked_sub(1).and_then(|i| self.ingredients.get(i))
    }

    /// Ingredients formatted as grocery list entries, e.g. `"Eggs (2)"`
    pub fn grocery_items(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .map(|i| format!("{} ({})", i.name, i.measure))
            .collect()
    }

    pub fn to_stub(&self) -> RecipeStub {
        RecipeStub {
            id: self.id.clone(),
            name: self.name.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
        }
    }
}

/// Dietary restriction that can be requested when filtering
///
/// Tags are matched heuristically against recipe names, see
/// [`DietMatcher`](crate::diet::DietMatcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietTag {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
}

impl DietTag {
    pub const ALL: [DietTag; 4] = [
        DietTag::Vegetarian,
        DietTag::Vegan,
        DietTag::GlutenFree,
        DietTag::DairyFree,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DietTag::Vegetarian => "vegetarian",
            DietTag::Vegan => "vegan",
            DietTag::GlutenFree => "gluten-free",
            DietTag::DairyFree => "dairy-free",
        }
    }
}

impl fmt::Display for DietTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietTag {
    type Err = FinderError;

    /// Accepts `gluten-free`, `gluten_free` and `glutenFree` spellings, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "vegetarian" => Ok(DietTag::Vegetarian),
            "vegan" => Ok(DietTag::Vegan),
            "glutenfree" => Ok(DietTag::GlutenFree),
            "dairyfree" => Ok(DietTag::DairyFree),
            _ => Err(FinderError::InvalidCriteria(format!(
                "unknown diet tag '{}'",
                s.trim()
            ))),
        }
    }
}

/// What the caller wants to narrow the catalog down to
///
/// An empty value means no filtering: the full catalog is returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    pub category: Option<String>,
    pub area: Option<String>,
    pub max_calories: Option<u32>,
    pub diets: BTreeSet<DietTag>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.area.is_none()
            && self.max_calories.is_none()
            && self.diets.is_empty()
    }

    /// Category to look up, ignoring blank values
    pub fn category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    /// Area to look up, ignoring blank values
    pub fn area(&self) -> Option<&str> {
        non_blank(self.area.as_deref())
    }

    /// Parses a user-typed calorie ceiling
    ///
    /// Blank input means "no ceiling". Anything that is not a non-negative
    /// integer is rejected.
    pub fn parse_max_calories(raw: &str) -> Result<Option<u32>, FinderError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        trimmed.parse::<u32>().map(Some).map_err(|_| {
            FinderError::InvalidCriteria(format!("malformed calorie bound '{}'", trimmed))
        })
    }

    /// Parses a list of user-supplied diet tag names
    pub fn parse_diets<I, S>(raw: I) -> Result<BTreeSet<DietTag>, FinderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter().map(|tag| tag.as_ref().parse()).collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
