//! meal-finder: search the meal catalog from the command line
//!
//! ```bash
//! # Seafood from Britain under 600 kcal without dairy
//! meal-finder filter --category Seafood --area British --max-calories 600 --diet dairy-free
//!
//! # Everything, as JSON
//! meal-finder --json filter
//!
//! meal-finder lookup 52772
//! meal-finder random
//! meal-finder ingredient chicken_breast
//! meal-finder categories
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;

use meal_finder::{
    FinderConfig, FinderError, MealDbSource, RecipeDetail, RecipeFinder, RecipeSource, RecipeStub,
};

#[derive(Parser)]
#[command(
    name = "meal-finder",
    version,
    about = "Discover recipes by category, area, calories and diet"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Catalog base URL override
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Filter the catalog; with no options the whole catalog is listed
    Filter {
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        area: Option<String>,

        /// Upper bound on the (synthetic) calorie estimate
        #[arg(long)]
        max_calories: Option<String>,

        /// vegetarian, vegan, gluten-free or dairy-free; repeatable
        #[arg(long = "diet")]
        diets: Vec<String>,

        /// Detail lookups in flight at once
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Show a random recipe
    Random,
    /// Show one recipe by id
    Lookup { id: String },
    /// List recipes using an ingredient
    Ingredient { name: String },
    /// List available categories
    Categories,
    /// List available areas
    Areas,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), FinderError> {
    let mut config = FinderConfig::load()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }
    debug!("{:?}", config);

    let source = MealDbSource::from_config(&config)?;

    match cli.command {
        Command::Filter {
            category,
            area,
            max_calories,
            diets,
            concurrency,
        } => {
            let mut builder = RecipeFinder::builder()
                .concurrency(concurrency.unwrap_or(config.enrichment_concurrency));
            if let Some(category) = category {
                builder = builder.category(category);
            }
            if let Some(area) = area {
                builder = builder.area(area);
            }
            if let Some(max_calories) = max_calories {
                builder = builder.max_calories_text(max_calories);
            }
            for diet in diets {
                builder = builder.diet_name(diet);
            }

            let recipes = builder.source(Arc::new(source)).build().await?;
            if cli.json {
                print_json(&recipes);
            } else if recipes.is_empty() {
                println!("No meals match your filters.");
            } else {
                for recipe in &recipes {
                    println!("{}", summary_line(recipe));
                }
            }
        }
        Command::Random => print_detail(source.find_random().await?, cli.json),
        Command::Lookup { id } => print_detail(source.find_by_id(&id).await?, cli.json),
        Command::Ingredient { name } => {
            print_stubs(&source.find_by_ingredient(&name).await?, cli.json)
        }
        Command::Categories => print_names(&source.list_categories().await?, cli.json),
        Command::Areas => print_names(&source.list_areas().await?, cli.json),
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn summary_line(recipe: &RecipeDetail) -> String {
    let calories = recipe
        .estimated_calories
        .map(|c| format!("~{} kcal", c))
        .unwrap_or_default();
    format!(
        "{:<8}{:<40}[{} / {}]  {}",
        recipe.id, recipe.name, recipe.category, recipe.area, calories
    )
}

fn print_detail(recipe: Option<RecipeDetail>, json: bool) {
    let Some(recipe) = recipe else {
        println!("No meal found.");
        return;
    };
    if json {
        print_json(&recipe);
        return;
    }

    println!("{} ({})", recipe.name, recipe.id);
    println!("Category: {}", recipe.category);
    println!("Area: {}", recipe.area);
    println!("Image: {}", recipe.thumbnail_url);
    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {} - {}", ingredient.name, ingredient.measure);
    }
    println!("\nInstructions:\n{}", recipe.instructions);
}

fn print_stubs(stubs: &[RecipeStub], json: bool) {
    if json {
        print_json(stubs);
    } else if stubs.is_empty() {
        println!("No meals found.");
    } else {
        for stub in stubs {
            println!("{:<8}{}", stub.id, stub.name);
        }
    }
}

fn print_names(names: &[String], json: bool) {
    if json {
        print_json(names);
    } else {
        for name in names {
            println!("{}", name);
        }
    }
}
