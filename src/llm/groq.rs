use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::LlmProvider;
use super::types::ChatMessage;
use crate::core::errors::ChatError;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai";

/// Groq chat-completions client (OpenAI-compatible wire format).
#[derive(Clone)]
pub struct GroqProvider {
    base_url: String,
    client: Client,
    api_key: String,
    model: String,
}

impl GroqProvider {
    pub fn new(api_key: String, model: String) -> Result<Self, ChatError> {
        Self::with_base_url(GROQ_BASE_URL.to_string(), api_key, model)
    }

    pub fn with_base_url(
        base_url: String,
        api_key: String,
        model: String,
    ) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(ChatError::provider)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let body = json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ChatError::provider)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ChatError::Provider(format!(
                "chat completion failed ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ChatError::provider)?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ChatError::Provider("chat completion response had no content".to_string())
            })?
            .to_string();

        Ok(content)
    }
}
