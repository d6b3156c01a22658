//! Recipe translation that keeps HTML markup intact.
//!
//! Tags are swapped for a placeholder before the text goes to the
//! translation backend and put back, in order, afterwards. Translation is
//! best effort: any backend failure yields the original text.

use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::warn;

use crate::food::models::{Ingredient, InstructionSet, RecipeDetail};
use crate::providers::traits::TranslationBackend;

pub const TAG_PLACEHOLDER: &str = "|||TAG|||";

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").expect("valid tag pattern");
}

#[derive(Clone)]
pub struct RecipeTranslator {
    backend: Arc<dyn TranslationBackend>,
}

impl RecipeTranslator {
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self { backend }
    }

    pub async fn translate_text(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let tags: Vec<&str> = HTML_TAG.find_iter(text).map(|m| m.as_str()).collect();
        let stripped = HTML_TAG.replace_all(text, TAG_PLACEHOLDER);

        match self.backend.translate(&stripped).await {
            Ok(translated) => restore_tags(translated, &tags),
            Err(e) => {
                warn!("Translation failed, keeping original text: {}", e);
                text.to_string()
            }
        }
    }

    pub async fn translate_optional(&self, text: Option<&str>) -> Option<String> {
        match text {
            Some(text) => Some(self.translate_text(text).await),
            None => None,
        }
    }

    async fn translate_ingredients(&self, ingredients: Vec<Ingredient>) -> Vec<Ingredient> {
        let mut translated = Vec::with_capacity(ingredients.len());
        for mut ingredient in ingredients {
            ingredient.name = self.translate_text(&ingredient.name).await;
            ingredient.original = self.translate_text(&ingredient.original).await;
            translated.push(ingredient);
        }
        translated
    }

    async fn translate_instructions(&self, sets: Vec<InstructionSet>) -> Vec<InstructionSet> {
        let mut translated = Vec::with_capacity(sets.len());
        for mut set in sets {
            for step in &mut set.steps {
                step.step = self.translate_text(&step.step).await;
            }
            translated.push(set);
        }
        translated
    }

    /// Translates every free-text field; ids, amounts, units and flags are
    /// left alone.
    pub async fn translate_recipe(&self, mut recipe: RecipeDetail) -> RecipeDetail {
        recipe.overview.title = self.translate_optional(recipe.overview.title.as_deref()).await;
        recipe.overview.summary = self.translate_text(&recipe.overview.summary).await;
        recipe.extended_ingredients = self
            .translate_ingredients(std::mem::take(&mut recipe.extended_ingredients))
            .await;
        recipe.instructions = self.translate_optional(recipe.instructions.as_deref()).await;
        recipe.analyzed_instructions = self
            .translate_instructions(std::mem::take(&mut recipe.analyzed_instructions))
            .await;
        recipe
    }
}

/// Puts tags back one-for-one. Placeholders the backend dropped leave their
/// tags unused; surplus placeholders stay in the text.
fn restore_tags(mut translated: String, tags: &[&str]) -> String {
    for tag in tags {
        translated = translated.replacen(TAG_PLACEHOLDER, tag, 1);
    }
    translated
}
