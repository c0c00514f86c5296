use std::sync::Arc;

use crate::core::config::{AppPaths, Settings};
use crate::embedding::HfEmbeddingClient;
use crate::index::PineconeIndex;
use crate::llm::{GroqProvider, LlmProvider};
use crate::rag::Retriever;

pub mod error;

use error::InitializationError;

/// Global application state shared across all routes.
///
/// Contains:
/// - Paths and loaded settings
/// - The retriever (embedding client + vector index)
/// - The LLM chat provider
#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub retriever: Arc<Retriever>,
    pub llm: Arc<dyn LlmProvider>,
}

impl AppState {
    /// Initializes the application state.
    ///
    /// Loads settings, builds the embedding client, resolves the vector
    /// index from the control plane (validating its dimension), and builds
    /// the chat provider. Any failure here refuses startup rather than
    /// running against an unreachable or misconfigured index.
    pub async fn initialize() -> Result<Arc<Self>, InitializationError> {
        let paths = Arc::new(AppPaths::new());

        let settings =
            Settings::load(&paths.config_path()).map_err(InitializationError::Config)?;

        let embedder = HfEmbeddingClient::new(
            settings.hf_token.clone(),
            settings.embedding.model.clone(),
        )
        .map_err(InitializationError::Embedding)?;

        let index = PineconeIndex::connect(
            settings.pinecone_api_key.clone(),
            &settings.index.name,
            settings.retrieval.dimension,
        )
        .await
        .map_err(InitializationError::Index)?;

        let retriever = Arc::new(Retriever::new(
            Arc::new(embedder),
            Arc::new(index),
            settings.retrieval.clone(),
        ));

        let llm = Arc::new(
            GroqProvider::new(settings.groq_api_key.clone(), settings.llm.model.clone())
                .map_err(InitializationError::Llm)?,
        );

        Ok(Arc::new(AppState {
            paths,
            settings,
            retriever,
            llm,
        }))
    }
}
