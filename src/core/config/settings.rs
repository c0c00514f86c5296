use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::errors::ChatError;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a retrieval-augmented chatbot for alumni information.
Rules:
1. Use the retrieved context to answer if relevant.
2. Keep answers short and direct.
3. If context is missing, use general knowledge or say \"I don't have enough information\".
4. Do not invent facts.
";

/// Retrieval tuning values. Threshold and top-k are deployment knobs,
/// not invariants; treat the defaults as a starting point.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalSettings {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            score_threshold: default_score_threshold(),
            dimension: default_dimension(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexSettings {
    #[serde(default = "default_index_name")]
    pub name: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            name: default_index_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_chat_model")]
    pub model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            welcome_message: default_welcome_message(),
        }
    }
}

/// Application settings: tunables from `config.yml`, secrets from the
/// environment. A missing secret is a fatal configuration error.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub index: IndexSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub chat: ChatSettings,

    #[serde(skip)]
    pub hf_token: String,
    #[serde(skip)]
    pub pinecone_api_key: String,
    #[serde(skip)]
    pub groq_api_key: String,
}

impl Settings {
    pub fn load(config_path: &Path) -> Result<Self, ChatError> {
        let mut settings = if config_path.exists() {
            let contents = fs::read_to_string(config_path).map_err(|e| {
                ChatError::Config(format!(
                    "failed to read {}: {}",
                    config_path.display(),
                    e
                ))
            })?;
            serde_yaml::from_str::<Settings>(&contents).map_err(|e| {
                ChatError::Config(format!(
                    "failed to parse {}: {}",
                    config_path.display(),
                    e
                ))
            })?
        } else {
            Settings::default()
        };

        if settings.retrieval.top_k == 0 {
            return Err(ChatError::Config(
                "retrieval.top_k must be a positive integer".to_string(),
            ));
        }
        if settings.retrieval.dimension == 0 {
            return Err(ChatError::Config(
                "retrieval.dimension must be a positive integer".to_string(),
            ));
        }

        settings.hf_token = require_env("HF_TOKEN")?;
        settings.pinecone_api_key = require_env("PINECONE_API_KEY")?;
        settings.groq_api_key = require_env("GROQ_API_KEY")?;

        if let Ok(name) = env::var("INDEX_NAME") {
            if !name.trim().is_empty() {
                settings.index.name = name;
            }
        }

        Ok(settings)
    }
}

fn require_env(key: &str) -> Result<String, ChatError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ChatError::Config(format!(
            "required environment variable {} is not set",
            key
        ))),
    }
}

fn default_top_k() -> usize {
    3
}

fn default_score_threshold() -> f32 {
    0.3
}

fn default_dimension() -> usize {
    384
}

fn default_embedding_model() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

fn default_index_name() -> String {
    "mongo-sync-index".to_string()
}

fn default_chat_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_welcome_message() -> String {
    "Welcome! How may I assist you today?".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment_values() {
        let settings = Settings::default();
        assert_eq!(settings.retrieval.top_k, 3);
        assert_eq!(settings.retrieval.score_threshold, 0.3);
        assert_eq!(settings.retrieval.dimension, 384);
        assert_eq!(settings.index.name, "mongo-sync-index");
    }

    #[test]
    fn yaml_overrides_retrieval_tunables() {
        let yaml = "retrieval:\n  top_k: 5\n  score_threshold: 0.5\nindex:\n  name: test-index\n";

        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.retrieval.top_k, 5);
        assert_eq!(settings.retrieval.score_threshold, 0.5);
        assert_eq!(settings.retrieval.dimension, 384);
        assert_eq!(settings.index.name, "test-index");
    }

    #[test]
    fn load_reads_file_and_env_secrets() {
        env::set_var("HF_TOKEN", "hf-test");
        env::set_var("PINECONE_API_KEY", "pc-test");
        env::set_var("GROQ_API_KEY", "groq-test");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "retrieval:\n  top_k: 7\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.retrieval.top_k, 7);
        assert_eq!(settings.hf_token, "hf-test");
        assert_eq!(settings.pinecone_api_key, "pc-test");
        assert_eq!(settings.groq_api_key, "groq-test");
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "retrieval:\n  top_k: 0\n").unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, ChatError::Config(_)));
    }
}
