use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use validator::Validate;

use crate::error::AppError;
use crate::food::analysis::nutrition;
use crate::food::api::{NutritionSource, RecipeSource};
use crate::food::models::{
    FoodDetails, FoodItem, IngredientComparison, NutrientSummary, RecipeDetail, RecipeSearchParams,
    RecipeSummary,
};
use crate::food::translation::RecipeTranslator;
use crate::llm::{AiAnalysis, AiSuggestions, SuggestionService, UserPreferences};

/// Page size used when looking up a single ingredient.
const INGREDIENT_PAGE_SIZE: u32 = 5;

const LOGIN_PAGE: &str = "login.html";

#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<dyn RecipeSource>,
    pub nutrition: Arc<dyn NutritionSource>,
    pub suggestions: SuggestionService,
    pub translator: RecipeTranslator,
    pub static_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    meal_type: Option<String>,
    ingredients: Option<Vec<String>>,
    diet: Option<String>,
    intolerances: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    ingredients: Option<Vec<String>>,
    diet: Option<String>,
    intolerances: Option<Vec<String>>,
    meal_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompareRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Ingredient list is required"))]
    ingredients: Vec<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    success: bool,
    recipes: Vec<RecipeSummary>,
    ai_suggestions: AiAnalysis,
}

#[derive(Serialize)]
pub struct RecipeResponse {
    success: bool,
    recipe: RecipeDetail,
}

#[derive(Serialize)]
pub struct SuggestionResponse {
    success: bool,
    suggestions: AiSuggestions,
}

#[derive(Serialize)]
pub struct FoodsResponse {
    success: bool,
    foods: Vec<FoodItem>,
}

#[derive(Serialize)]
pub struct DetailsResponse {
    success: bool,
    details: FoodDetails,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    success: bool,
    summary: NutrientSummary,
}

#[derive(Serialize)]
pub struct CompareResponse {
    success: bool,
    comparisons: Vec<IngredientComparison>,
}

#[derive(Serialize)]
struct HealthResponse {
    success: bool,
    status: String,
}

type ApiResult<T> = Result<Json<T>, AppError>;

fn bad_json(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

fn bad_path(rejection: PathRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

/// Create and configure the API router
pub fn create_api(state: AppState) -> Router {
    // API clients may run on other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let login_page = ServeFile::new(state.static_dir.join(LOGIN_PAGE));
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .route_service("/", login_page)
        .route("/health", get(health_check))
        .route("/api/recipes/search", post(search_recipes))
        .route("/api/recipes/:id", get(recipe_details))
        .route("/api/ai/suggestions", post(ai_suggestions))
        .route("/api/nutrition/ingredient/:name", get(ingredient_nutrition))
        .route("/api/nutrition/details/:fdc_id", get(nutrition_details))
        .route("/api/nutrition/summary/:fdc_id", get(nutrition_summary))
        .route("/api/nutrition/compare", post(compare_nutrition))
        .fallback_service(assets)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Response {
    Json(HealthResponse {
        success: true,
        status: "Server is running and healthy".to_string(),
    })
    .into_response()
}

async fn search_recipes(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<SearchResponse> {
    let Json(request) = payload.map_err(bad_json)?;

    let params = RecipeSearchParams {
        meal_type: request.meal_type,
        ingredients: request.ingredients.unwrap_or_default(),
        diet: request.diet,
        intolerances: request.intolerances.unwrap_or_default(),
        ..Default::default()
    };

    let recipes = state.recipes.search_recipes(&params).await.map_err(|e| {
        error!("Error searching recipes: {}", e);
        e
    })?;
    info!("Found {} recipes", recipes.len());

    let preferences = UserPreferences {
        diet: params.diet,
        intolerances: params.intolerances,
        ingredients: params.ingredients,
    };
    let ai_suggestions = state.suggestions.analyze_recipes(&recipes, &preferences).await;

    Ok(Json(SearchResponse {
        success: true,
        recipes,
        ai_suggestions,
    }))
}

async fn recipe_details(
    State(state): State<AppState>,
    recipe_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<RecipeResponse> {
    let Path(recipe_id) = recipe_id.map_err(bad_path)?;

    let recipe = state
        .recipes
        .get_recipe_information(recipe_id)
        .await
        .map_err(|e| {
            error!("Error fetching recipe details: {}", e);
            e
        })?;

    let recipe = state.translator.translate_recipe(recipe).await;

    Ok(Json(RecipeResponse {
        success: true,
        recipe,
    }))
}

async fn ai_suggestions(
    State(state): State<AppState>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> ApiResult<SuggestionResponse> {
    let Json(request) = payload.map_err(bad_json)?;

    let suggestions = state
        .suggestions
        .get_personalized_suggestions(
            &request.ingredients.unwrap_or_default(),
            request.diet.as_deref(),
            &request.intolerances.unwrap_or_default(),
            request.meal_type.as_deref(),
        )
        .await;

    Ok(Json(SuggestionResponse {
        success: true,
        suggestions,
    }))
}

async fn ingredient_nutrition(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
) -> ApiResult<FoodsResponse> {
    let Path(name) = name.map_err(bad_path)?;

    let foods = state
        .nutrition
        .search_food(&name, INGREDIENT_PAGE_SIZE)
        .await
        .map_err(|e| {
            error!("Error fetching nutrition for {}: {}", name, e);
            e
        })?;

    if foods.is_empty() {
        warn!("No foods found for {}", name);
        return Err(AppError::NotFound("Ingredient not found".to_string()));
    }

    Ok(Json(FoodsResponse {
        success: true,
        foods,
    }))
}

async fn nutrition_details(
    State(state): State<AppState>,
    fdc_id: Result<Path<u64>, PathRejection>,
) -> ApiResult<DetailsResponse> {
    let Path(fdc_id) = fdc_id.map_err(bad_path)?;

    let details = state.nutrition.get_food_details(fdc_id).await.map_err(|e| {
        error!("Error fetching nutrition details: {}", e);
        e
    })?;

    Ok(Json(DetailsResponse {
        success: true,
        details,
    }))
}

async fn nutrition_summary(
    State(state): State<AppState>,
    fdc_id: Result<Path<u64>, PathRejection>,
) -> ApiResult<SummaryResponse> {
    let Path(fdc_id) = fdc_id.map_err(bad_path)?;

    let summary = nutrition::summarize(state.nutrition.as_ref(), fdc_id)
        .await
        .map_err(|e| {
            error!("Error summarizing nutrients: {}", e);
            e
        })?;

    Ok(Json(SummaryResponse {
        success: true,
        summary,
    }))
}

async fn compare_nutrition(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> ApiResult<CompareResponse> {
    let Json(request) = payload.map_err(bad_json)?;

    request
        .validate()
        .map_err(|_| AppError::Validation("Ingredient list is required".to_string()))?;

    let comparisons =
        nutrition::compare_ingredients(state.nutrition.as_ref(), &request.ingredients).await;

    Ok(Json(CompareResponse {
        success: true,
        comparisons,
    }))
}
