//! LLM Api wrappers.

use async_trait::async_trait;
use revbot_config::Config;
use revbot_llm_gemini::GeminiLlmService;
use revbot_llm_interface::{LlmService, Result};

use crate::metrics::LLM_API_CALLS;

/// LLM service with metrics.
pub struct MetricsLlmService {
    inner: GeminiLlmService,
}

impl MetricsLlmService {
    /// Creates a new service.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            inner: GeminiLlmService::new(config)?,
        })
    }
}

#[async_trait]
impl LlmService for MetricsLlmService {
    async fn generate_text(&self, model: &str, prompt: &str) -> Result<String> {
        LLM_API_CALLS.inc();
        self.inner.generate_text(model, prompt).await
    }

    async fn embed_text(&self, model: &str, text: &str) -> Result<Vec<f32>> {
        LLM_API_CALLS.inc();
        self.inner.embed_text(model, text).await
    }
}
