use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use super::RecipeSource;
use crate::error::AppError;
use crate::food::models::{
    Ingredient, InstructionSet, InstructionStep, RecipeDetail, RecipeSearchParams, RecipeSummary,
};

const SERVICE: &str = "Spoonacular";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<RecipeResponse>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RecipeResponse {
    id: Option<i64>,
    title: Option<String>,
    image: Option<String>,
    ready_in_minutes: Option<i64>,
    servings: Option<i64>,
    source_url: Option<String>,
    summary: Option<String>,
    dish_types: Option<Vec<String>>,
    diets: Option<Vec<String>>,
    cuisines: Option<Vec<String>>,
    instructions: Option<String>,
    extended_ingredients: Option<Vec<IngredientResponse>>,
    analyzed_instructions: Option<Vec<InstructionSetResponse>>,
    cheap: Option<bool>,
    very_healthy: Option<bool>,
    very_popular: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IngredientResponse {
    id: Option<i64>,
    name: Option<String>,
    original: Option<String>,
    amount: Option<f64>,
    unit: Option<String>,
    measures: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstructionSetResponse {
    name: Option<String>,
    steps: Option<Vec<StepResponse>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StepResponse {
    number: Option<i64>,
    step: Option<String>,
    ingredients: Option<Vec<Value>>,
    equipment: Option<Vec<Value>>,
}

impl RecipeResponse {
    fn into_summary(self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            title: self.title,
            image: self.image,
            ready_in_minutes: self.ready_in_minutes,
            servings: self.servings,
            source_url: self.source_url,
            summary: self.summary.unwrap_or_default(),
            dish_types: self.dish_types.unwrap_or_default(),
            diets: self.diets.unwrap_or_default(),
            cuisines: self.cuisines.unwrap_or_default(),
        }
    }

    fn into_detail(mut self) -> RecipeDetail {
        let instructions = self.instructions.take();
        let cheap = self.cheap.unwrap_or(false);
        let very_healthy = self.very_healthy.unwrap_or(false);
        let very_popular = self.very_popular.unwrap_or(false);

        let extended_ingredients = self
            .extended_ingredients
            .take()
            .unwrap_or_default()
            .into_iter()
            .map(|ingredient| Ingredient {
                id: ingredient.id,
                name: ingredient.name.unwrap_or_default(),
                original: ingredient.original.unwrap_or_default(),
                amount: ingredient.amount,
                unit: ingredient.unit.unwrap_or_default(),
                measures: ingredient.measures,
            })
            .collect();

        let analyzed_instructions = self
            .analyzed_instructions
            .take()
            .unwrap_or_default()
            .into_iter()
            .map(|set| InstructionSet {
                name: set.name.unwrap_or_default(),
                steps: set
                    .steps
                    .unwrap_or_default()
                    .into_iter()
                    .map(|step| InstructionStep {
                        number: step.number,
                        step: step.step.unwrap_or_default(),
                        ingredients: step.ingredients.unwrap_or_default(),
                        equipment: step.equipment.unwrap_or_default(),
                    })
                    .collect(),
            })
            .collect();

        RecipeDetail {
            overview: self.into_summary(),
            instructions,
            extended_ingredients,
            analyzed_instructions,
            cheap,
            very_healthy,
            very_popular,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpoonacularClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl SpoonacularClient {
    pub fn new(api_key: String, base_url: String, client: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Query string for `/recipes/complexSearch`. Optional filters are left
    /// out entirely when unset rather than sent empty.
    pub fn search_query(&self, params: &RecipeSearchParams) -> Vec<(&'static str, String)> {
        let true_str = "true".to_string();

        let mut query = vec![
            ("apiKey", self.api_key.clone()),
            ("includeIngredients", params.ingredients.join(",")),
            ("number", params.number.to_string()),
            ("addRecipeInformation", true_str.clone()),
            ("fillIngredients", true_str.clone()),
            ("instructionsRequired", true_str),
        ];

        if let Some(meal_type) = params.meal_type.as_deref().filter(|m| !m.is_empty()) {
            query.push(("type", meal_type.to_string()));
        }

        if let Some(diet) = params.diet.as_deref().filter(|d| !d.is_empty()) {
            query.push(("diet", diet.to_string()));
        }

        if !params.intolerances.is_empty() {
            query.push(("intolerances", params.intolerances.join(",")));
        }

        query
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::upstream(SERVICE, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::upstream(SERVICE, format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| {
                AppError::upstream(SERVICE, format!("JSON parse error: {}", e.without_url()))
            })
    }
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    async fn search_recipes(&self, params: &RecipeSearchParams) -> Result<Vec<RecipeSummary>, AppError> {
        let url = format!("{}/recipes/complexSearch", self.base_url);
        let query = self.search_query(params);

        let data: SearchResponse = self.get_json(&url, &query).await.map_err(|e| {
            error!("Spoonacular search failed: {}", e);
            e
        })?;

        let results = data.results.unwrap_or_default();
        debug!("Spoonacular returned {} recipes", results.len());

        Ok(results
            .into_iter()
            .map(RecipeResponse::into_summary)
            .collect())
    }

    async fn get_recipe_information(&self, recipe_id: i64) -> Result<RecipeDetail, AppError> {
        let url = format!("{}/recipes/{}/information", self.base_url, recipe_id);
        let query = [
            ("apiKey", self.api_key.clone()),
            ("includeNutrition", "false".to_string()),
        ];

        let data: RecipeResponse = self.get_json(&url, &query).await.map_err(|e| {
            error!("Failed to fetch recipe {}: {}", recipe_id, e);
            e
        })?;

        Ok(data.into_detail())
    }
}
