//! Router tests with in-process fakes standing in for every upstream.

use anyhow::anyhow;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use recipe_assistant::api::{create_api, AppState};
use recipe_assistant::error::AppError;
use recipe_assistant::food::api::{NutritionSource, RecipeSource};
use recipe_assistant::food::models::{
    DetailedNutrient, FoodDetails, FoodItem, FoodNutrientEntry, Ingredient, RecipeDetail,
    RecipeSearchParams, RecipeSummary,
};
use recipe_assistant::food::translation::RecipeTranslator;
use recipe_assistant::llm::SuggestionService;
use recipe_assistant::providers::{CompletionProvider, TranslationBackend};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct FakeRecipes {
    fail: bool,
    last_params: Mutex<Option<RecipeSearchParams>>,
}

#[async_trait]
impl RecipeSource for FakeRecipes {
    async fn search_recipes(&self, params: &RecipeSearchParams) -> Result<Vec<RecipeSummary>, AppError> {
        *self.last_params.lock().unwrap() = Some(params.clone());
        if self.fail {
            return Err(AppError::upstream("Spoonacular", "HTTP 402 Payment Required"));
        }
        Ok(vec![RecipeSummary {
            id: Some(715538),
            title: Some("Bruschetta".into()),
            dish_types: vec!["appetizer".into()],
            ..Default::default()
        }])
    }

    async fn get_recipe_information(&self, recipe_id: i64) -> Result<RecipeDetail, AppError> {
        if self.fail {
            return Err(AppError::upstream("Spoonacular", "HTTP 404 Not Found"));
        }
        Ok(RecipeDetail {
            overview: RecipeSummary {
                id: Some(recipe_id),
                title: Some("Bruschetta".into()),
                summary: "A <b>fresh</b> starter".into(),
                ..Default::default()
            },
            extended_ingredients: vec![Ingredient {
                id: Some(11529),
                name: "tomato".into(),
                original: "2 tomatoes".into(),
                amount: Some(2.0),
                unit: String::new(),
                measures: None,
            }],
            very_healthy: true,
            ..Default::default()
        })
    }
}

struct FakeFoods;

#[async_trait]
impl NutritionSource for FakeFoods {
    async fn search_food(&self, query: &str, _page_size: u32) -> Result<Vec<FoodItem>, AppError> {
        match query {
            "kale" => {
                let mut nutrients = BTreeMap::new();
                nutrients.insert(
                    "Protein".to_string(),
                    FoodNutrientEntry {
                        value: 2.92,
                        unit: Some("G".into()),
                    },
                );
                Ok(vec![FoodItem {
                    fdc_id: Some(168421),
                    description: Some("Kale, raw".into()),
                    data_type: Some("SR Legacy".into()),
                    brand_owner: None,
                    nutrients,
                }])
            }
            "outage" => Err(AppError::upstream("USDA FoodData Central", "HTTP 503")),
            _ => Ok(vec![]),
        }
    }

    async fn get_food_details(&self, fdc_id: u64) -> Result<FoodDetails, AppError> {
        let mut nutrients = BTreeMap::new();
        nutrients.insert(
            "Energy".to_string(),
            DetailedNutrient {
                value: Some(165.0),
                unit: Some("kcal".into()),
                derivation_code: None,
                nutrient_id: Some(1008),
            },
        );
        Ok(FoodDetails {
            fdc_id: Some(fdc_id),
            description: Some("Chicken, breast, roasted".into()),
            nutrients,
            food_category: Some("Poultry Products".into()),
            ..Default::default()
        })
    }
}

struct CountingModel {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionProvider for CountingModel {
    async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("Bruschetta suits a vegetarian diet.".to_string())
    }

    fn model_name(&self) -> &str {
        "counting"
    }
}

struct Bracketing;

#[async_trait]
impl TranslationBackend for Bracketing {
    async fn translate(&self, text: &str) -> anyhow::Result<String> {
        Ok(format!("[pt] {}", text))
    }
}

struct Offline;

#[async_trait]
impl TranslationBackend for Offline {
    async fn translate(&self, _text: &str) -> anyhow::Result<String> {
        Err(anyhow!("dns error"))
    }
}

struct Harness {
    app: Router,
    recipes: Arc<FakeRecipes>,
    model: Option<Arc<CountingModel>>,
}

fn harness(recipes: FakeRecipes, with_ai: bool, translator: Arc<dyn TranslationBackend>) -> Harness {
    let recipes = Arc::new(recipes);
    let model = with_ai.then(|| {
        Arc::new(CountingModel {
            calls: AtomicUsize::new(0),
        })
    });
    let provider = model.clone().map(|m| m as Arc<dyn CompletionProvider>);

    let state = AppState {
        recipes: recipes.clone(),
        nutrition: Arc::new(FakeFoods),
        suggestions: SuggestionService::new(provider, "Portuguese".into()),
        translator: RecipeTranslator::new(translator),
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
    };

    Harness {
        app: create_api(state),
        recipes,
        model,
    }
}

fn default_harness() -> Harness {
    harness(FakeRecipes::default(), true, Arc::new(Bracketing))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_search_returns_recipes_and_analysis() {
    let h = default_harness();

    let (status, body) = send(
        h.app,
        post_json(
            "/api/recipes/search",
            json!({"mealType": "appetizer", "ingredients": ["tomato", "bread"], "diet": "vegetarian"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["recipes"][0]["title"], "Bruschetta");
    assert_eq!(body["recipes"][0]["dishTypes"][0], "appetizer");
    assert_eq!(body["ai_suggestions"]["analysis"], "Bruschetta suits a vegetarian diet.");
    assert_eq!(body["ai_suggestions"]["recipes_analyzed"], 1);

    let params = h.recipes.last_params.lock().unwrap().clone().unwrap();
    assert_eq!(params.meal_type.as_deref(), Some("appetizer"));
    assert_eq!(params.ingredients, vec!["tomato".to_string(), "bread".to_string()]);
    assert!(params.intolerances.is_empty());
    assert_eq!(params.number, 12);
}

#[tokio::test]
async fn test_search_upstream_failure_is_500_envelope() {
    let h = harness(
        FakeRecipes {
            fail: true,
            ..Default::default()
        },
        true,
        Arc::new(Bracketing),
    );

    let (status, body) = send(h.app, post_json("/api/recipes/search", json!({"ingredients": []}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("HTTP 402"));
    assert_eq!(h.model.unwrap().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_malformed_body_is_400_envelope() {
    let h = default_harness();
    let request = Request::builder()
        .method("POST")
        .uri("/api/recipes/search")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(h.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_search_without_ai_key_degrades() {
    let h = harness(FakeRecipes::default(), false, Arc::new(Bracketing));

    let (status, body) = send(h.app, post_json("/api/recipes/search", json!({"ingredients": ["egg"]}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["ai_suggestions"]["analysis"]
        .as_str()
        .unwrap()
        .contains("not available"));
    assert_eq!(body["ai_suggestions"]["recommendations"], json!([]));
}

#[tokio::test]
async fn test_recipe_details_are_translated() {
    let h = default_harness();

    let (status, body) = send(h.app, get("/api/recipes/715538")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let recipe = &body["recipe"];
    assert_eq!(recipe["id"], 715538);
    assert_eq!(recipe["title"], "[pt] Bruschetta");
    assert_eq!(recipe["summary"], "[pt] A <b>fresh</b> starter");
    assert_eq!(recipe["extendedIngredients"][0]["name"], "[pt] tomato");
    assert_eq!(recipe["extendedIngredients"][0]["amount"], 2.0);
    assert_eq!(recipe["veryHealthy"], true);
}

#[tokio::test]
async fn test_recipe_details_survive_translator_outage() {
    let h = harness(FakeRecipes::default(), true, Arc::new(Offline));

    let (status, body) = send(h.app, get("/api/recipes/1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipe"]["title"], "Bruschetta");
    assert_eq!(body["recipe"]["summary"], "A <b>fresh</b> starter");
}

#[tokio::test]
async fn test_recipe_details_upstream_failure() {
    let h = harness(
        FakeRecipes {
            fail: true,
            ..Default::default()
        },
        true,
        Arc::new(Bracketing),
    );

    let (status, body) = send(h.app, get("/api/recipes/99")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_recipe_details_rejects_non_numeric_id() {
    let (status, body) = send(default_harness().app, get("/api/recipes/abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_ai_suggestions() {
    let h = default_harness();

    let (status, body) = send(
        h.app,
        post_json("/api/ai/suggestions", json!({"ingredients": ["rice"], "mealType": "dinner"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["suggestions"]["suggestions"], "Bruschetta suits a vegetarian diet.");
    assert_eq!(h.model.unwrap().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_ingredient_nutrition_found() {
    let (status, body) = send(default_harness().app, get("/api/nutrition/ingredient/kale")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["foods"][0]["fdcId"], 168421);
    assert_eq!(body["foods"][0]["nutrients"]["Protein"]["value"], 2.92);
    assert_eq!(body["foods"][0]["brandOwner"], Value::Null);
}

#[tokio::test]
async fn test_ingredient_nutrition_empty_is_404() {
    let (status, body) = send(default_harness().app, get("/api/nutrition/ingredient/xyzzynotafood")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Ingredient not found");
}

#[tokio::test]
async fn test_ingredient_nutrition_upstream_error_is_500() {
    let (status, body) = send(default_harness().app, get("/api/nutrition/ingredient/outage")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_nutrition_details_and_summary() {
    let (status, body) = send(default_harness().app, get("/api/nutrition/details/171477")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["details"]["foodCategory"], "Poultry Products");
    assert_eq!(body["details"]["nutrients"]["Energy"]["nutrientId"], 1008);

    let (status, body) = send(default_harness().app, get("/api/nutrition/summary/171477")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["calories"], 165.0);
    assert_eq!(body["summary"]["protein"], 0.0);
}

#[tokio::test]
async fn test_compare_isolates_missing_ingredient() {
    let (status, body) = send(
        default_harness().app,
        post_json("/api/nutrition/compare", json!({"ingredients": ["kale", "doesnotexist123"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let comparisons = body["comparisons"].as_array().unwrap();
    assert_eq!(comparisons.len(), 2);
    assert_eq!(comparisons[0]["ingredient"], "kale");
    assert_eq!(comparisons[0]["found"], true);
    assert_eq!(comparisons[0]["data"]["description"], "Kale, raw");
    assert_eq!(comparisons[1]["found"], false);
    assert_eq!(comparisons[1]["data"], Value::Null);
}

#[tokio::test]
async fn test_compare_records_lookup_errors() {
    let (status, body) = send(
        default_harness().app,
        post_json("/api/nutrition/compare", json!({"ingredients": ["outage", "kale"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comparisons"][0]["found"], false);
    assert!(body["comparisons"][0]["error"].as_str().unwrap().contains("HTTP 503"));
    assert_eq!(body["comparisons"][1]["found"], true);
}

#[tokio::test]
async fn test_compare_empty_list_is_400() {
    let (status, body) = send(
        default_harness().app,
        post_json("/api/nutrition/compare", json!({"ingredients": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Ingredient list is required");

    let (status, _) = send(default_harness().app, post_json("/api/nutrition/compare", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

async fn fetch_text(uri: &str) -> (StatusCode, String) {
    let response = default_harness().app.oneshot(get(uri)).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn test_login_page_and_health() {
    let (status, page) = fetch_text("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("id=\"authForm\""));
    // Credentials are handled by the page script, never by a native submit.
    assert!(page.contains("src=\"/script/auth.js\""));
    assert!(!page.contains("action="));

    let (status, body) = send(default_harness().app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_frontend_assets_are_served() {
    for uri in [
        "/script/auth.js",
        "/script/database.js",
        "/script/routeGuard.js",
        "/script/apiService.js",
        "/script/preferences.js",
        "/script/index.js",
        "/preferences.html",
        "/index.html",
    ] {
        let (status, _) = fetch_text(uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
    }

    let (_, script) = fetch_text("/script/apiService.js").await;
    assert!(script.contains("/api"));

    let (status, _) = fetch_text("/script/missing.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
