use thiserror::Error;

use crate::core::errors::ChatError;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load configuration: {0}")]
    Config(#[source] ChatError),

    #[error("Failed to initialize embedding client: {0}")]
    Embedding(#[source] ChatError),

    #[error("Failed to connect to vector index: {0}")]
    Index(#[source] ChatError),

    #[error("Failed to initialize LLM provider: {0}")]
    Llm(#[source] ChatError),
}
