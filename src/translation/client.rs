use crate::translation::Translator;
use crate::utils::{ApiConfig, CorpusPrepError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Translation over a messages-style LLM endpoint. One request per call,
/// no retries: a failed call is reported to the caller as-is.
pub struct TranslationClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: usize,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

impl TranslationClient {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let api_key = api.resolve_api_key().ok_or_else(|| {
            CorpusPrepError::ConfigError(format!(
                "no translation API key: set [api] api_key or {}",
                crate::utils::config::TRANSLATION_API_KEY_ENV
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: api.endpoint.clone(),
            model: api.model.clone(),
            api_key,
            max_tokens: api.max_tokens,
        })
    }

    async fn call_api(&self, prompt: String) -> Result<String> {
        let request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: 0.3,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CorpusPrepError::ApiError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let body: MessagesResponse = response.json().await?;
        extract_translation(body)
    }
}

impl Translator for TranslationClient {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        self.call_api(build_prompt(text, source_lang, target_lang))
            .await
    }
}

fn build_prompt(text: &str, source_lang: &str, target_lang: &str) -> String {
    format!(
        "Translate the following text from {} to {}.\n\
         Output ONLY the translation, no explanations, notes or quotation marks.\n\n{}",
        source_lang, target_lang, text
    )
}

fn extract_translation(response: MessagesResponse) -> Result<String> {
    let text = response
        .content
        .into_iter()
        .find_map(|block| {
            if block.content_type == "text" {
                block.text
            } else {
                None
            }
        })
        .ok_or_else(|| CorpusPrepError::ApiError("No text content in response".to_string()))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(CorpusPrepError::TranslationFailed(
            "empty translation".to_string(),
        ));
    }
    Ok(text.to_string())
}
