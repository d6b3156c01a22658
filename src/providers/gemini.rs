use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::providers::traits::CompletionProvider;

/// Keeps the key out of request URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    api_url: String,
    client: Client,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, api_url: String, model: String, client: Client) -> Self {
        Self {
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            client,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_url, self.model)
    }
}

/// Joins the text parts of the first candidate.
fn extract_text(response_json: &Value) -> Option<String> {
    let parts = response_json
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&json!({
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }]
            }))
            .send()
            .await
            .map_err(|e| e.without_url())?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.map_err(|e| e.without_url())?;
            return Err(anyhow!("API request failed: Status {}, Body: {}", status, error_text));
        }

        let response_json: Value = response.json().await.map_err(|e| e.without_url())?;

        if let Some(error) = response_json.get("error") {
            return Err(anyhow!("API returned error: {}", error));
        }

        extract_text(&response_json).ok_or_else(|| {
            let debug_json = serde_json::to_string(&response_json).unwrap_or_default();
            anyhow!("Invalid response format. Response JSON: {}", debug_json)
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_model() {
        let provider = GeminiProvider::new(
            "key".into(),
            "https://generativelanguage.googleapis.com/v1beta/".into(),
            "gemini-2.5-flash".into(),
            Client::new(),
        );
        assert_eq!(
            provider.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response = json!({
            "candidates": [{
                "content": {"parts": [{"text": "Try a "}, {"text": "risotto."}]}
            }]
        });
        assert_eq!(extract_text(&response).as_deref(), Some("Try a risotto."));
    }

    #[test]
    fn test_extract_text_rejects_blocked_candidate() {
        let response = json!({"candidates": [{"finishReason": "SAFETY"}]});
        assert!(extract_text(&response).is_none());
    }
}
