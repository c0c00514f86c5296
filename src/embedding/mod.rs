//! Embedding provider adapter.
//!
//! The wire shape of a feature-extraction response varies by provider: some
//! return a flat vector, others a singleton batch wrapping one. The shape is
//! decided once here, at the adapter boundary, as a tagged `RawEmbedding`.

pub mod hf;

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::errors::ChatError;

pub use hf::HfEmbeddingClient;

/// Raw provider output, before normalization to a flat vector.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawEmbedding {
    Flat(Vec<f32>),
    Batch(Vec<Vec<f32>>),
}

impl RawEmbedding {
    /// Normalize to exactly one flat vector.
    ///
    /// Identity on `Flat`; on `Batch` takes the first row (one level of
    /// unwrapping, never deeper). Empty input is a shape error.
    pub fn into_flat(self) -> Result<Vec<f32>, ChatError> {
        match self {
            RawEmbedding::Flat(v) => {
                if v.is_empty() {
                    return Err(ChatError::Shape(
                        "embedding response is empty".to_string(),
                    ));
                }
                Ok(v)
            }
            RawEmbedding::Batch(rows) => {
                let first = rows.into_iter().next().ok_or_else(|| {
                    ChatError::Shape("embedding batch is empty".to_string())
                })?;
                if first.is_empty() {
                    return Err(ChatError::Shape(
                        "embedding batch row is empty".to_string(),
                    ));
                }
                Ok(first)
            }
        }
    }
}

/// External embedding provider: maps text to a raw embedding response.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<RawEmbedding, ChatError>;
}
