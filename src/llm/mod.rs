pub mod groq;
pub mod provider;
pub mod types;

pub use groq::GroqProvider;
pub use provider::LlmProvider;
pub use types::ChatMessage;
