use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{IndexMatch, VectorIndex};
use crate::core::errors::ChatError;

const PINECONE_CONTROL_PLANE: &str = "https://api.pinecone.io";

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: String,
    dimension: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}

/// Pinecone data-plane client for one index.
///
/// The index host is resolved from the control plane when connecting, so an
/// unreachable or misconfigured index is caught at startup instead of on the
/// first user turn.
#[derive(Clone)]
pub struct PineconeIndex {
    client: Client,
    api_key: String,
    host: String,
}

impl PineconeIndex {
    /// Resolve the named index and validate its dimension against the
    /// configured embedding dimension.
    pub async fn connect(
        api_key: String,
        index_name: &str,
        expected_dimension: usize,
    ) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ChatError::provider)?;

        let url = format!("{}/indexes/{}", PINECONE_CONTROL_PLANE, index_name);
        let res = client
            .get(&url)
            .header("Api-Key", &api_key)
            .send()
            .await
            .map_err(|e| {
                ChatError::Config(format!("failed to reach Pinecone control plane: {}", e))
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ChatError::Config(format!(
                "index '{}' is not available ({}): {}",
                index_name, status, body
            )));
        }

        let description: IndexDescription = res.json().await.map_err(|e| {
            ChatError::Config(format!("unexpected index description: {}", e))
        })?;

        if description.dimension != expected_dimension {
            return Err(ChatError::Config(format!(
                "index '{}' has dimension {} but the embedding model produces {}",
                index_name, description.dimension, expected_dimension
            )));
        }

        tracing::info!(
            "Connected to index '{}' at {} (dimension {})",
            index_name,
            description.host,
            description.dimension
        );

        Ok(Self {
            client,
            api_key,
            host: description.host,
        })
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<IndexMatch>, ChatError> {
        let url = format!("https://{}/query", self.host.trim_start_matches("https://"));

        let body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });

        let res = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ChatError::provider)?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ChatError::Provider(format!(
                "similarity query failed ({}): {}",
                status, body
            )));
        }

        let payload: QueryResponse = res.json().await.map_err(ChatError::provider)?;
        Ok(payload.matches)
    }
}
