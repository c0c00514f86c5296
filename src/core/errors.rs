use thiserror::Error;

/// Error surfaced by the retrieval and completion pipeline.
///
/// `Provider` and `Shape` propagate to the turn handler without retries;
/// `Config` is fatal at startup.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("embedding shape error: {0}")]
    Shape(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl ChatError {
    pub fn provider<E: std::fmt::Display>(err: E) -> Self {
        ChatError::Provider(err.to_string())
    }

    pub fn config<E: std::fmt::Display>(err: E) -> Self {
        ChatError::Config(err.to_string())
    }
}
