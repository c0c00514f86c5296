//! Retrieval-augmented generation core.
//!
//! This module provides:
//! - `Retriever`: embeds a query, runs the similarity search, and filters
//!   hits by the relevance threshold
//! - `compose_context_message`: wraps retrieved snippets into the auxiliary
//!   system turn injected before the LLM call

mod prompt;
mod retriever;

pub use prompt::compose_context_message;
pub use retriever::Retriever;

#[cfg(test)]
pub(crate) mod testing;
