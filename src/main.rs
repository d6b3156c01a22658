use clap::Parser;
use dotenv::dotenv;
use recipe_assistant::api::{self, AppState};
use recipe_assistant::config::AppConfig;
use recipe_assistant::food::api::{SpoonacularClient, UsdaClient};
use recipe_assistant::food::translation::RecipeTranslator;
use recipe_assistant::llm::SuggestionService;
use recipe_assistant::providers::{CompletionProvider, GeminiProvider, GoogleTranslateProvider};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value = "5050")]
    port: u16,
}

fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    let recipes = SpoonacularClient::new(
        config.food.spoonacular_api_key.clone(),
        config.food.spoonacular_api_url.clone(),
        http.clone(),
    );
    let nutrition = UsdaClient::new(
        config.food.food_data_api_key.clone(),
        config.food.food_data_api_url.clone(),
        http.clone(),
    );

    let provider = config.ai.provider.api_key.clone().map(|api_key| {
        Arc::new(GeminiProvider::new(
            api_key,
            config.ai.provider.api_url.clone(),
            config.ai.model.clone(),
            http.clone(),
        )) as Arc<dyn CompletionProvider>
    });

    let translator = GoogleTranslateProvider::new(
        config.translation.api_url.clone(),
        config.translation.source.clone(),
        config.translation.target.clone(),
        http,
    );

    Ok(AppState {
        recipes: Arc::new(recipes),
        nutrition: Arc::new(nutrition),
        suggestions: SuggestionService::new(provider, config.ai.response_language.clone()),
        translator: RecipeTranslator::new(Arc::new(translator)),
        static_dir: config.static_dir.clone(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env()?;

    info!(
        "Translating recipes {} -> {}, upstream timeout {:?}",
        config.translation.source, config.translation.target, config.http_timeout
    );

    let state = build_state(&config)?;
    info!(
        "AI suggestions available: {}, serving frontend from {}",
        state.suggestions.is_available(),
        config.static_dir.display()
    );

    let app = api::create_api(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
