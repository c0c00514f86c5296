//! Vector index adapter.

pub mod pinecone;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::core::errors::ChatError;

pub use pinecone::PineconeIndex;

/// A single similarity-query hit, in the index's rank order.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexMatch {
    pub id: String,
    /// Similarity score; higher is more similar.
    pub score: f32,
    #[serde(default)]
    pub metadata: Value,
}

impl IndexMatch {
    /// The `text` metadata field, or an empty string when absent.
    pub fn text(&self) -> String {
        self.metadata
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    }
}

/// External vector index: similarity query over stored embeddings.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<IndexMatch>, ChatError>;
}
