use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::providers::traits::TranslationBackend;

/// Client for the public Google Translate `gtx` endpoint.
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    api_url: String,
    source: String,
    target: String,
    client: Client,
}

impl GoogleTranslateProvider {
    pub fn new(api_url: String, source: String, target: String, client: Client) -> Self {
        Self {
            api_url,
            source,
            target,
            client,
        }
    }
}

/// The payload is a nested array; element 0 holds `[translated, original, ...]`
/// segments, one per sentence.
fn join_segments(json: &Value) -> Option<String> {
    let segments = json.get(0)?.as_array()?;
    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(|v| v.as_str()))
        .collect();

    if translated.is_empty() {
        None
    } else {
        Some(translated)
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslateProvider {
    async fn translate(&self, text: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.api_url)
            .header("User-Agent", "Mozilla/5.0")
            .query(&[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| e.without_url())?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Translation request failed with status: {}", status));
        }

        let json: Value = response.json().await.map_err(|e| e.without_url())?;
        join_segments(&json).ok_or_else(|| anyhow!("Unexpected translation payload"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_segments() {
        let payload = json!([
            [["Ferva a água. ", "Boil the water. ", null], ["Adicione sal.", "Add salt.", null]],
            null,
            "en"
        ]);
        assert_eq!(
            join_segments(&payload).as_deref(),
            Some("Ferva a água. Adicione sal.")
        );
    }

    #[test]
    fn test_join_segments_rejects_empty_payload() {
        assert!(join_segments(&json!([null, null, "en"])).is_none());
    }
}
