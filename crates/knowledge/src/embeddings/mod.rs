//! Embedding providers.
//!
//! The encoder maps text to fixed-dimension dense vectors. Providers are
//! selected by configuration; the hashing provider is the local default
//! and the ollama provider supplies neural semantic embeddings.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
