use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::food::config::FoodConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(String),
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: String, value: String },
}

/// Connection settings for one upstream API.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub api_url: String,
}

impl ProviderConfig {
    pub fn from_env(provider: &str) -> Self {
        let prefix = provider.to_uppercase();

        let api_key = env::var(format!("{}_API_KEY", prefix))
            .ok()
            .or_else(|| match provider {
                // The Gemini key has historically been exported as GOOGLE_API_KEY
                "gemini" => env::var("GOOGLE_API_KEY").ok(),
                _ => None,
            })
            .filter(|key| !key.trim().is_empty());

        let api_url = env::var(format!("{}_API_URL", prefix))
            .unwrap_or_else(|_| default_api_url(provider).to_string());

        Self { api_key, api_url }
    }

    /// Returns the key or a `Missing` error naming the variable to set.
    pub fn require_key(&self, provider: &str) -> Result<String, ConfigError> {
        self.api_key
            .clone()
            .ok_or_else(|| ConfigError::Missing(format!("{}_API_KEY", provider.to_uppercase())))
    }
}

fn default_api_url(provider: &str) -> &'static str {
    match provider {
        "spoonacular" => "https://api.spoonacular.com",
        "food_data" => "https://api.nal.usda.gov/fdc/v1",
        "gemini" => "https://generativelanguage.googleapis.com/v1beta",
        "translate" => "https://translate.googleapis.com/translate_a/single",
        _ => "",
    }
}

#[derive(Debug, Clone)]
pub struct TranslationConfig {
    pub api_url: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: ProviderConfig,
    pub model: String,
    pub response_language: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub food: FoodConfig,
    pub ai: AiConfig,
    pub translation: TranslationConfig,
    pub http_timeout: Duration,
    /// Frontend assets, served at the site root.
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let food = FoodConfig::from_env()?;

        let ai = AiConfig {
            provider: ProviderConfig::from_env("gemini"),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            response_language: env::var("AI_RESPONSE_LANGUAGE")
                .unwrap_or_else(|_| "Portuguese".to_string()),
        };

        let translation = TranslationConfig {
            api_url: ProviderConfig::from_env("translate").api_url,
            source: env::var("TRANSLATE_SOURCE").unwrap_or_else(|_| "en".to_string()),
            target: env::var("TRANSLATE_TARGET").unwrap_or_else(|_| "pt".to_string()),
        };

        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    name: "HTTP_TIMEOUT_SECS".to_string(),
                    value,
                })?,
            Err(_) => Duration::from_secs(20),
        };

        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        Ok(Self {
            food,
            ai,
            translation,
            http_timeout,
            static_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        assert_eq!(default_api_url("spoonacular"), "https://api.spoonacular.com");
        assert_eq!(default_api_url("food_data"), "https://api.nal.usda.gov/fdc/v1");
        assert_eq!(default_api_url("unknown"), "");
    }

    #[test]
    fn test_require_key_names_variable() {
        let config = ProviderConfig {
            api_key: None,
            api_url: String::new(),
        };
        let err = config.require_key("food_data").unwrap_err();
        assert_eq!(err.to_string(), "FOOD_DATA_API_KEY environment variable not set");
    }
}
