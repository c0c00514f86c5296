use async_trait::async_trait;

use super::types::ChatMessage;
use crate::core::errors::ChatError;

/// External LLM chat provider.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "groq")
    fn name(&self) -> &str;

    /// chat completion over the full ordered message list
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;
}
