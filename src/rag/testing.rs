//! Fake provider implementations shared by the retrieval and turn tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::core::errors::ChatError;
use crate::embedding::{Embedder, RawEmbedding};
use crate::index::{IndexMatch, VectorIndex};
use crate::llm::{ChatMessage, LlmProvider};

pub struct FakeEmbedder {
    pub response: RawEmbedding,
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, _text: &str) -> Result<RawEmbedding, ChatError> {
        Ok(self.response.clone())
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<RawEmbedding, ChatError> {
        Err(ChatError::Provider("embedding service down".to_string()))
    }
}

pub struct FakeIndex {
    pub matches: Vec<IndexMatch>,
}

#[async_trait]
impl VectorIndex for FakeIndex {
    async fn query(&self, _vector: &[f32], top_k: usize) -> Result<Vec<IndexMatch>, ChatError> {
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }
}

/// Records the exact message list of each chat call and replies with a
/// canned string.
pub struct FakeLlm {
    pub reply: String,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    fn name(&self) -> &str {
        "fake"
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

pub struct FailingLlm;

#[async_trait]
impl LlmProvider for FailingLlm {
    fn name(&self) -> &str {
        "failing"
    }

    async fn chat(&self, _messages: &[ChatMessage]) -> Result<String, ChatError> {
        Err(ChatError::Provider("completion service down".to_string()))
    }
}

pub fn index_match(id: &str, score: f32, text: Option<&str>) -> IndexMatch {
    IndexMatch {
        id: id.to_string(),
        score,
        metadata: match text {
            Some(t) => json!({ "text": t }),
            None => json!({}),
        },
    }
}
