use std::collections::BTreeSet;

use crate::model::{DietTag, RecipeDetail};

/// Decides whether a recipe satisfies the requested dietary tags
///
/// This is a coarse heuristic on the recipe *name*, not an ingredient-based
/// classification. All requested tags must hold (AND).
///
/// Case handling differs per tag and is kept as-is:
/// - `Vegetarian`: lowercased name contains `"vegetable"`
/// - `Vegan`: lowercased name contains neither `"chicken"` nor `"beef"`
/// - `GlutenFree`: name as given does not contain `"bread"`
/// - `DairyFree`: name as given does not contain `"cheese"`
///
/// So "Garlic Bread" passes `GlutenFree` while "garlic bread" does not.
#[derive(Debug, Default, Clone, Copy)]
pub struct DietMatcher;

impl DietMatcher {
    pub fn matches(&self, detail: &RecipeDetail, requested: &BTreeSet<DietTag>) -> bool {
        if requested.is_empty() {
            return true;
        }

        let lowered = detail.name.to_lowercase();
        requested
            .iter()
            .all(|tag| tag_holds(*tag, &detail.name, &lowered))
    }
}

fn tag_holds(tag: DietTag, name: &str, lowered: &str) -> bool {
    match tag {
        DietTag::Vegetarian => lowered.contains("vegetable"),
        DietTag::Vegan => !lowered.contains("chicken") && !lowered.contains("beef"),
        DietTag::GlutenFree => !name.contains("bread"),
        DietTag::DairyFree => !name.contains("cheese"),
    }
}
