//! Gemini REST implementation of the completion capability.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::llm::{Completion, CompletionClient, GenerationParams};

const GENERATE_CONTENT_METHOD: &str = "generateContent";

/// Client for the Generative Language API. The API key travels as the `key`
/// query parameter; the request timeout comes from configuration.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(base_url: String, api_key: SecretString, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build completion http client")?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string(), api_key })
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn list_generation_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/v1beta/models", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .send()
            .await
            .context("model listing request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("model listing returned status {status}"));
        }

        let listing: ModelListing =
            response.json().await.context("model listing response was not valid JSON")?;

        let names = listing
            .models
            .into_iter()
            .filter(|model| {
                model
                    .supported_generation_methods
                    .iter()
                    .any(|method| method == GENERATE_CONTENT_METHOD)
            })
            .map(|model| model.name.trim_start_matches("models/").to_string())
            .filter(|name| !name.is_empty())
            .collect();
        Ok(names)
    }

    async fn generate(
        &self,
        model: &str,
        params: &GenerationParams,
        parts: &[String],
    ) -> Result<Completion> {
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: parts.iter().map(|text| Part { text: text.clone() }).collect(),
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                top_p: params.top_p,
                top_k: params.top_k,
                max_output_tokens: params.max_output_tokens,
            },
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&request)
            .send()
            .await
            .with_context(|| format!("generation request to {model} failed"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("{model} returned status {status}"));
        }

        let body: GenerateResponse =
            response.json().await.context("generation response was not valid JSON")?;
        Ok(body.into_completion())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ModelListing {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    fn into_completion(self) -> Completion {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content.parts.into_iter().filter_map(|part| part.text).collect::<Vec<_>>().join("")
            })
            .unwrap_or_default();
        let block_reason = self.prompt_feedback.and_then(|feedback| feedback.block_reason);
        Completion { text, block_reason }
    }
}

#[cfg(test)]
mod tests {
    use super::GenerateResponse;

    #[test]
    fn response_text_joins_candidate_parts() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {"content": {"parts": [{"text": "Hello"}, {"text": " there"}]}}
                ]
            }"#,
        )
        .expect("fixture should deserialize");

        let completion = body.into_completion();
        assert_eq!(completion.text, "Hello there");
        assert_eq!(completion.block_reason, None);
    }

    #[test]
    fn block_reason_surfaces_from_prompt_feedback() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#,
        )
        .expect("fixture should deserialize");

        let completion = body.into_completion();
        assert!(completion.text.is_empty());
        assert_eq!(completion.block_reason.as_deref(), Some("SAFETY"));
    }

    #[test]
    fn missing_fields_default_to_empty_completion() {
        let body: GenerateResponse =
            serde_json::from_str("{}").expect("fixture should deserialize");

        let completion = body.into_completion();
        assert!(completion.text.is_empty());
        assert_eq!(completion.block_reason, None);
    }
}
