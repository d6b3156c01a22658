use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::food::models::RecipeSummary;
use crate::providers::traits::CompletionProvider;

/// Titles beyond this are not sent to the model.
const MAX_ANALYZED_RECIPES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipes_analyzed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AiAnalysis {
    fn advisory(message: &str) -> Self {
        Self {
            analysis: message.to_string(),
            recommendations: Some(Vec::new()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiSuggestions {
    pub suggestions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserPreferences {
    pub diet: Option<String>,
    pub intolerances: Vec<String>,
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Credential,
    RateLimit,
    Transient,
}

/// Checked in order; the first row with a matching needle wins.
const FAILURE_RULES: &[(FailureKind, &[&str])] = &[
    (FailureKind::Credential, &["api key", "authentication"]),
    (FailureKind::RateLimit, &["quota", "limit"]),
];

/// Approximate classification by sniffing the provider's error text.
/// The backend returns no structured codes we can rely on.
pub fn classify_failure(error_text: &str) -> FailureKind {
    let lowered = error_text.to_lowercase();
    FAILURE_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(kind, _)| *kind)
        .unwrap_or(FailureKind::Transient)
}

const ANALYSIS_UNAVAILABLE: &str =
    "AI is not available right now. Check your Google Gemini API key.";
const ANALYSIS_NO_RECIPES: &str = "No recipes found to analyze.";
const ANALYSIS_CREDENTIAL: &str =
    "Authentication with the AI failed. Check your Google Gemini API key.";
const ANALYSIS_RATE_LIMIT: &str = "AI usage limit reached. Please try again later.";
const ANALYSIS_TRANSIENT: &str = "Could not generate an analysis right now. Please try again.";

const SUGGESTIONS_UNAVAILABLE: &str = "AI not available. Check your Google Gemini API key.";
const SUGGESTIONS_CREDENTIAL: &str = "Authentication error. Check your API key.";
const SUGGESTIONS_RATE_LIMIT: &str = "AI usage limit reached. Please try again later.";
const SUGGESTIONS_TRANSIENT: &str = "Could not generate suggestions right now.";

fn join_or(values: &[String], fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_string()
    } else {
        values.join(", ")
    }
}

fn value_or(value: Option<&str>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Builds cooking prompts and relays the model's answer. Without a
/// configured provider every call returns a fixed advisory message.
#[derive(Clone)]
pub struct SuggestionService {
    provider: Option<Arc<dyn CompletionProvider>>,
    response_language: String,
}

impl SuggestionService {
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>, response_language: String) -> Self {
        match &provider {
            Some(p) => info!("AI suggestions enabled with model {}", p.model_name()),
            None => warn!("AI API key not configured, AI suggestions disabled"),
        }
        Self {
            provider,
            response_language,
        }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn analysis_prompt(&self, recipes: &[RecipeSummary], preferences: &UserPreferences) -> String {
        let titles: Vec<&str> = recipes
            .iter()
            .take(MAX_ANALYZED_RECIPES)
            .map(|r| r.title.as_deref().unwrap_or("Untitled"))
            .collect();
        let titles_json = serde_json::to_string_pretty(&titles).unwrap_or_default();

        format!(
            "You are a culinary assistant. Analyze the following recipes considering the user's preferences:\n\n\
             User preferences:\n\
             - Diet: {}\n\
             - Intolerances: {}\n\
             - Available ingredients: {}\n\n\
             Recipes found:\n{}\n\n\
             Please provide:\n\
             1. A brief analysis of which recipes best suit the user\n\
             2. Tips to make the most of the available ingredients\n\
             3. Suggested adjustments so the recipes better match the preferences\n\n\
             Answer in {}, clearly and concisely (150 words maximum).",
            value_or(preferences.diet.as_deref(), "None specified"),
            join_or(&preferences.intolerances, "None"),
            preferences.ingredients.join(", "),
            titles_json,
            self.response_language,
        )
    }

    pub fn suggestions_prompt(
        &self,
        ingredients: &[String],
        diet: Option<&str>,
        intolerances: &[String],
        meal_type: Option<&str>,
    ) -> String {
        format!(
            "You are a chef specialized in nutrition. Based on the following information, suggest creative recipe ideas:\n\n\
             Available ingredients: {}\n\
             Meal type: {}\n\
             Diet: {}\n\
             Intolerances: {}\n\n\
             Please provide:\n\
             1. 3 dish ideas that can be made with these ingredients\n\
             2. Flavor combination tips\n\
             3. Additional ingredients that would pair well\n\n\
             Be creative and practical. Answer in {} (200 words maximum).",
            join_or(ingredients, "None specified"),
            value_or(meal_type, "Not specified"),
            value_or(diet, "No restrictions"),
            join_or(intolerances, "None"),
            self.response_language,
        )
    }

    pub async fn analyze_recipes(
        &self,
        recipes: &[RecipeSummary],
        preferences: &UserPreferences,
    ) -> AiAnalysis {
        let Some(provider) = &self.provider else {
            return AiAnalysis::advisory(ANALYSIS_UNAVAILABLE);
        };

        if recipes.is_empty() {
            return AiAnalysis::advisory(ANALYSIS_NO_RECIPES);
        }

        let prompt = self.analysis_prompt(recipes, preferences);

        match provider.complete(&prompt).await {
            Ok(text) => AiAnalysis {
                analysis: text,
                recipes_analyzed: Some(recipes.len()),
                ..Default::default()
            },
            Err(e) => {
                let error_text = e.to_string();
                warn!("Recipe analysis failed: {}", error_text);
                let message = match classify_failure(&error_text) {
                    FailureKind::Credential => ANALYSIS_CREDENTIAL,
                    FailureKind::RateLimit => ANALYSIS_RATE_LIMIT,
                    FailureKind::Transient => ANALYSIS_TRANSIENT,
                };
                AiAnalysis {
                    analysis: message.to_string(),
                    error: Some(error_text),
                    ..Default::default()
                }
            }
        }
    }

    pub async fn get_personalized_suggestions(
        &self,
        ingredients: &[String],
        diet: Option<&str>,
        intolerances: &[String],
        meal_type: Option<&str>,
    ) -> AiSuggestions {
        let Some(provider) = &self.provider else {
            return AiSuggestions {
                suggestions: SUGGESTIONS_UNAVAILABLE.to_string(),
                error: None,
            };
        };

        let prompt = self.suggestions_prompt(ingredients, diet, intolerances, meal_type);

        match provider.complete(&prompt).await {
            Ok(text) => AiSuggestions {
                suggestions: text,
                error: None,
            },
            Err(e) => {
                let error_text = e.to_string();
                warn!("Personalized suggestions failed: {}", error_text);
                let message = match classify_failure(&error_text) {
                    FailureKind::Credential => SUGGESTIONS_CREDENTIAL,
                    FailureKind::RateLimit => SUGGESTIONS_RATE_LIMIT,
                    FailureKind::Transient => SUGGESTIONS_TRANSIENT,
                };
                AiSuggestions {
                    suggestions: message.to_string(),
                    error: Some(error_text),
                }
            }
        }
    }
}
