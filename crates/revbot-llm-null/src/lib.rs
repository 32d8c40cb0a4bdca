//! Null driver for the LLM interface.

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use revbot_llm_interface::{LlmService, Result};

/// Null LLM service.
#[derive(Clone, Default)]
pub struct NullLlmService {
    _private: (),
}

impl NullLlmService {
    /// Build a null LLM service.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

#[async_trait]
impl LlmService for NullLlmService {
    #[tracing::instrument(skip(self, _prompt), ret)]
    async fn generate_text(&self, model: &str, _prompt: &str) -> Result<String> {
        Ok("{}".into())
    }

    #[tracing::instrument(skip(self, _text))]
    async fn embed_text(&self, model: &str, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![])
    }
}
