use async_trait::async_trait;

use crate::Result;

/// Text generation and embedding provider.
#[cfg_attr(any(test, feature = "testkit"), mockall::automock)]
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Generates text from a prompt.
    async fn generate_text(&self, model: &str, prompt: &str) -> Result<String>;

    /// Embeds text into a vector.
    async fn embed_text(&self, model: &str, text: &str) -> Result<Vec<f32>>;
}
