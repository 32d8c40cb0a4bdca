use serde::{Deserialize, Serialize};

/// Bounded, line-aligned slice of file content with its embedding vector.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingChunk {
    pub id: u64,
    pub repository_id: u64,
    pub file_path: String,
    pub content: String,
    pub embedding: Vec<f32>,
}
