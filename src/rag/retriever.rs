use std::sync::Arc;

use crate::core::config::settings::RetrievalSettings;
use crate::core::errors::ChatError;
use crate::embedding::Embedder;
use crate::index::VectorIndex;

/// Converts a user query into the ordered list of relevant text snippets.
///
/// Stateless orchestration over the embedding provider and the vector index:
/// embed the query, normalize the response to a flat vector, run the
/// similarity search, and keep the `text` metadata of every match scoring
/// strictly above the relevance threshold, in the index's rank order.
/// Failures from either outbound call propagate to the caller untouched.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    settings: RetrievalSettings,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        settings: RetrievalSettings,
    ) -> Self {
        Self {
            embedder,
            index,
            settings,
        }
    }

    /// Retrieve with the configured default top-k.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<String>, ChatError> {
        self.retrieve_top_k(query, self.settings.top_k).await
    }

    /// Retrieve the `text` of up to `top_k` matches above the threshold.
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<String>, ChatError> {
        let vector = self.embedder.embed(query).await?.into_flat()?;

        // Fail fast on a mismatched vector instead of letting the index
        // silently truncate or pad.
        if vector.len() != self.settings.dimension {
            return Err(ChatError::Shape(format!(
                "embedding has {} dimensions, index expects {}",
                vector.len(),
                self.settings.dimension
            )));
        }

        let matches = self.index.query(&vector, top_k).await?;

        let snippets = matches
            .iter()
            .filter(|m| m.score > self.settings.score_threshold)
            .map(|m| m.text())
            .collect::<Vec<_>>();

        tracing::debug!(
            "retrieved {} of {} matches above threshold {}",
            snippets.len(),
            matches.len(),
            self.settings.score_threshold
        );

        Ok(snippets)
    }
}
