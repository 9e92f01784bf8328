//! Basic usage of the RecipeFinder builder API
//!
//! This demo shows the common searches:
//! 1. Category + calorie ceiling
//! 2. Category narrowed by area, with diet tags
//! 3. Raw user input, validated before anything is fetched

use meal_finder::{DietTag, FinderError, RecipeFinder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Seafood under 600 kcal ===");
    let recipes = RecipeFinder::builder()
        .category("Seafood")
        .max_calories(600)
        .build()
        .await?;

    for recipe in &recipes {
        println!(
            "{} (~{} kcal)",
            recipe.name,
            recipe.estimated_calories.unwrap_or_default()
        );
    }

    println!("\n=== British desserts without dairy or bread ===");
    let recipes = RecipeFinder::builder()
        .category("Dessert")
        .area("British")
        .diet(DietTag::DairyFree)
        .diet(DietTag::GlutenFree)
        .concurrency(4)
        .build()
        .await?;

    for recipe in &recipes {
        println!("{}", recipe.name);
        for item in recipe.grocery_items() {
            println!("  - {}", item);
        }
    }

    println!("\n=== Form input ===");
    let result = RecipeFinder::builder()
        .area("Italian")
        .max_calories_text("about 500")
        .diet_name("keto")
        .build()
        .await;

    match result {
        Err(FinderError::InvalidCriteria(msg)) => println!("Rejected: {}", msg),
        Err(e) => return Err(e.into()),
        Ok(recipes) => println!("{} recipes", recipes.len()),
    }

    Ok(())
}
