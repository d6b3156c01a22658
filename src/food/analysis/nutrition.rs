use futures::future::join_all;
use tracing::warn;

use crate::error::AppError;
use crate::food::api::NutritionSource;
use crate::food::models::{FoodDetails, IngredientComparison, NutrientSummary};

// Exact FoodData Central nutrient names. A rename upstream reads as zero.
const ENERGY: &str = "Energy";
const PROTEIN: &str = "Protein";
const CARBS: &str = "Carbohydrate, by difference";
const FAT: &str = "Total lipid (fat)";
const FIBER: &str = "Fiber, total dietary";
const SUGAR: &str = "Sugars, total including NLEA";
const SODIUM: &str = "Sodium, Na";
const CHOLESTEROL: &str = "Cholesterol";

pub fn summarize_details(details: &FoodDetails) -> NutrientSummary {
    let value = |name: &str| {
        details
            .nutrients
            .get(name)
            .and_then(|n| n.value)
            .unwrap_or(0.0)
    };

    NutrientSummary {
        calories: value(ENERGY),
        protein: value(PROTEIN),
        carbs: value(CARBS),
        fat: value(FAT),
        fiber: value(FIBER),
        sugar: value(SUGAR),
        sodium: value(SODIUM),
        cholesterol: value(CHOLESTEROL),
    }
}

/// Fetches one food and reduces it to the headline nutrients.
pub async fn summarize(source: &dyn NutritionSource, fdc_id: u64) -> Result<NutrientSummary, AppError> {
    let details = source.get_food_details(fdc_id).await?;
    Ok(summarize_details(&details))
}

/// Looks up the best match for each ingredient. A failed lookup only marks
/// its own entry; the batch always completes, in input order.
pub async fn compare_ingredients(
    source: &dyn NutritionSource,
    ingredients: &[String],
) -> Vec<IngredientComparison> {
    let lookups = ingredients.iter().map(|ingredient| async move {
        match source.search_food(ingredient, 1).await {
            Ok(foods) => {
                let data = foods.into_iter().next();
                IngredientComparison {
                    ingredient: ingredient.clone(),
                    found: data.is_some(),
                    data,
                    error: None,
                }
            }
            Err(e) => {
                warn!("Lookup for {} failed: {}", ingredient, e);
                IngredientComparison {
                    ingredient: ingredient.clone(),
                    found: false,
                    data: None,
                    error: Some(e.to_string()),
                }
            }
        }
    });

    join_all(lookups).await
}
