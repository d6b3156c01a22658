//! Shapes returned to API clients. Built per request from upstream JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub ready_in_minutes: Option<i64>,
    pub servings: Option<i64>,
    pub source_url: Option<String>,
    pub summary: String,
    pub dish_types: Vec<String>,
    pub diets: Vec<String>,
    pub cuisines: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub overview: RecipeSummary,
    pub instructions: Option<String>,
    pub extended_ingredients: Vec<Ingredient>,
    pub analyzed_instructions: Vec<InstructionSet>,
    pub cheap: bool,
    pub very_healthy: bool,
    pub very_popular: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Option<i64>,
    pub name: String,
    pub original: String,
    pub amount: Option<f64>,
    pub unit: String,
    /// Alternate-unit data, passed through untouched.
    pub measures: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstructionSet {
    pub name: String,
    pub steps: Vec<InstructionStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstructionStep {
    pub number: Option<i64>,
    pub step: String,
    pub ingredients: Vec<Value>,
    pub equipment: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrientEntry {
    pub value: f64,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub fdc_id: Option<u64>,
    pub description: Option<String>,
    pub data_type: Option<String>,
    pub brand_owner: Option<String>,
    pub nutrients: BTreeMap<String, FoodNutrientEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedNutrient {
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub derivation_code: Option<String>,
    pub nutrient_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetails {
    pub fdc_id: Option<u64>,
    pub description: Option<String>,
    pub data_type: Option<String>,
    pub brand_owner: Option<String>,
    pub ingredients: Option<String>,
    pub serving_size: Option<f64>,
    pub serving_size_unit: Option<String>,
    pub nutrients: BTreeMap<String, DetailedNutrient>,
    pub food_category: Option<String>,
}

/// Headline nutrients of one food. Values are per 100 g as reported upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientSummary {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub sodium: f64,
    pub cholesterol: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientComparison {
    pub ingredient: String,
    pub found: bool,
    pub data: Option<FoodItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Filters accepted by the recipe search.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSearchParams {
    pub meal_type: Option<String>,
    pub ingredients: Vec<String>,
    pub diet: Option<String>,
    pub intolerances: Vec<String>,
    pub number: u32,
}

impl Default for RecipeSearchParams {
    fn default() -> Self {
        Self {
            meal_type: None,
            ingredients: Vec::new(),
            diet: None,
            intolerances: Vec::new(),
            number: 12,
        }
    }
}
