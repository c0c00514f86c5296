use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::{Embedder, RawEmbedding};
use crate::core::errors::ChatError;

const HF_INFERENCE_BASE: &str = "https://router.huggingface.co/hf-inference/models";

/// HuggingFace Inference API client for the feature-extraction pipeline.
#[derive(Clone)]
pub struct HfEmbeddingClient {
    client: Client,
    token: String,
    model: String,
}

impl HfEmbeddingClient {
    pub fn new(token: String, model: String) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ChatError::provider)?;

        Ok(Self {
            client,
            token,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/pipeline/feature-extraction",
            HF_INFERENCE_BASE, self.model
        )
    }
}

#[async_trait]
impl Embedder for HfEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<RawEmbedding, ChatError> {
        let res = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.token)
            .json(&json!({ "inputs": text }))
            .send()
            .await
            .map_err(ChatError::provider)?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ChatError::Provider(format!(
                "embedding request failed ({}): {}",
                status, body
            )));
        }

        res.json::<RawEmbedding>()
            .await
            .map_err(|e| ChatError::Shape(format!("unexpected embedding response: {}", e)))
    }
}
