use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, error};

use super::NutritionSource;
use crate::error::AppError;
use crate::food::models::{DetailedNutrient, FoodDetails, FoodItem, FoodNutrientEntry};

const SERVICE: &str = "USDA FoodData Central";

/// Only the curated data tiers; branded and survey foods are too noisy.
const SEARCH_DATA_TYPES: [&str; 2] = ["Foundation", "SR Legacy"];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Option<Vec<SearchFood>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchFood {
    fdc_id: Option<u64>,
    description: Option<String>,
    data_type: Option<String>,
    brand_owner: Option<String>,
    food_nutrients: Option<Vec<SearchNutrient>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchNutrient {
    nutrient_name: Option<String>,
    value: Option<f64>,
    unit_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FoodDetailsResponse {
    fdc_id: Option<u64>,
    description: Option<String>,
    data_type: Option<String>,
    brand_owner: Option<String>,
    ingredients: Option<String>,
    serving_size: Option<f64>,
    serving_size_unit: Option<String>,
    food_nutrients: Option<Vec<FoodNutrientResponse>>,
    food_category: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FoodNutrientResponse {
    nutrient: Option<NutrientInfo>,
    amount: Option<f64>,
    derivation_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NutrientInfo {
    id: Option<u64>,
    name: Option<String>,
    unit_name: Option<String>,
}

impl From<SearchFood> for FoodItem {
    fn from(food: SearchFood) -> Self {
        let nutrients = food
            .food_nutrients
            .unwrap_or_default()
            .into_iter()
            .filter_map(|n| {
                let name = n.nutrient_name?;
                let value = n.value?;
                Some((name, FoodNutrientEntry { value, unit: n.unit_name }))
            })
            .collect();

        FoodItem {
            fdc_id: food.fdc_id,
            description: food.description,
            data_type: food.data_type,
            brand_owner: food.brand_owner,
            nutrients,
        }
    }
}

impl From<FoodDetailsResponse> for FoodDetails {
    fn from(data: FoodDetailsResponse) -> Self {
        let mut nutrients = BTreeMap::new();
        for entry in data.food_nutrients.unwrap_or_default() {
            let Some(info) = entry.nutrient else { continue };
            let Some(name) = info.name else { continue };
            nutrients.insert(
                name,
                DetailedNutrient {
                    value: entry.amount,
                    unit: info.unit_name,
                    derivation_code: entry.derivation_code,
                    nutrient_id: info.id,
                },
            );
        }

        // Foundation foods nest the category in an object, others use a bare string
        let food_category = match data.food_category {
            Some(Value::Object(category)) => category
                .get("description")
                .and_then(|d| d.as_str())
                .map(str::to_string),
            Some(Value::String(category)) => Some(category),
            _ => None,
        };

        FoodDetails {
            fdc_id: data.fdc_id,
            description: data.description,
            data_type: data.data_type,
            brand_owner: data.brand_owner,
            ingredients: data.ingredients,
            serving_size: data.serving_size,
            serving_size_unit: data.serving_size_unit,
            nutrients,
            food_category,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UsdaClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl UsdaClient {
    pub fn new(api_key: String, base_url: String, client: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn search_query(&self, query: &str, page_size: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("api_key", self.api_key.clone()),
            ("query", query.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        params.extend(SEARCH_DATA_TYPES.iter().map(|t| ("dataType", t.to_string())));
        params
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
impl NutritionSource for UsdaClient {
    async fn search_food(&self, query: &str, page_size: u32) -> Result<Vec<FoodItem>, AppError> {
        let url = format!("{}/foods/search", self.base_url);
        let params = self.search_query(query, page_size);

        let data: SearchResponse = self.get_json(&url, &params).await.map_err(|e| {
            error!("Food search for '{}' failed: {}", query, e);
            e
        })?;

        let foods = data.foods.unwrap_or_default();
        debug!("FoodData Central returned {} foods for '{}'", foods.len(), query);

        Ok(foods.into_iter().map(FoodItem::from).collect())
    }

    async fn get_food_details(&self, fdc_id: u64) -> Result<FoodDetails, AppError> {
        let url = format!("{}/food/{}", self.base_url, fdc_id);
        let params = [("api_key", self.api_key.clone())];

        let data: FoodDetailsResponse = self.get_json(&url, &params).await.map_err(|e| {
            error!("Failed to fetch food {}: {}", fdc_id, e);
            e
        })?;

        Ok(data.into())
    }
}
