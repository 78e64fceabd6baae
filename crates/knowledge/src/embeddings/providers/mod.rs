//! Embedding provider implementations.

pub mod hash;
pub mod ollama;

pub use hash::HashingProvider;
pub use ollama::OllamaProvider;
