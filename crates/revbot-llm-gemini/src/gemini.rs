//! Gemini adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use revbot_config::Config;
use revbot_llm_interface::{LlmError, LlmService, Result};
use serde::Deserialize;
use serde_json::json;

use crate::errors::GeminiError;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

/// Gemini LLM service.
#[derive(Clone)]
pub struct GeminiLlmService {
    config: Config,
    client: Client,
}

impl GeminiLlmService {
    /// Creates a new Gemini adapter.
    pub fn new(config: Config) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_millis(config.llm.gemini.request_timeout))
            .build()
            .map_err(GeminiError::from)?;

        Ok(Self { config, client })
    }

    fn url(&self, model: &str, operation: &str) -> String {
        format!(
            "{}/models/{model}:{operation}",
            self.config.llm.gemini.root_url
        )
    }
}

#[async_trait]
impl LlmService for GeminiLlmService {
    #[tracing::instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate_text(&self, model: &str, prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url(model, "generateContent"))
            .header("x-goog-api-key", &self.config.llm.gemini.api_key)
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }],
            }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(GeminiError::from)?;

        let response = response
            .json::<GenerateResponse>()
            .await
            .map_err(GeminiError::from)?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| LlmError::EmptyResponse {
                model: model.into(),
            })
    }

    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    async fn embed_text(&self, model: &str, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(self.url(model, "embedContent"))
            .header("x-goog-api-key", &self.config.llm.gemini.api_key)
            .json(&json!({
                "content": { "parts": [{ "text": text }] },
                "outputDimensionality": self.config.retrieval.embedding_dimensions,
            }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(GeminiError::from)?;

        let response = response
            .json::<EmbedResponse>()
            .await
            .map_err(GeminiError::from)?;

        Ok(response.embedding.values)
    }
}
