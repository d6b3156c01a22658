pub mod spoonacular;
pub mod usda;

use async_trait::async_trait;

use crate::error::AppError;
use crate::food::models::{FoodDetails, FoodItem, RecipeDetail, RecipeSearchParams, RecipeSummary};

// Re-export common types
pub use spoonacular::SpoonacularClient;
pub use usda::UsdaClient;

/// Recipe search and lookup upstream.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn search_recipes(&self, params: &RecipeSearchParams) -> Result<Vec<RecipeSummary>, AppError>;

    async fn get_recipe_information(&self, recipe_id: i64) -> Result<RecipeDetail, AppError>;
}

/// Food nutrition upstream.
#[async_trait]
pub trait NutritionSource: Send + Sync {
    async fn search_food(&self, query: &str, page_size: u32) -> Result<Vec<FoodItem>, AppError>;

    async fn get_food_details(&self, fdc_id: u64) -> Result<FoodDetails, AppError>;
}
