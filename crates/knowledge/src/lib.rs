//! Knowledge retrieval and query answering for Krishi.
//!
//! This crate holds the retrieval pipeline: a fixed agricultural
//! knowledge base, embedding providers, an exact inner-product vector
//! index, and the query engine that combines offline retrieval with
//! optional AI augmentation.

pub mod augment;
pub mod corpus;
pub mod embeddings;
pub mod engine;
pub mod retriever;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

pub use augment::Augmenter;
pub use corpus::KnowledgeBase;
pub use embeddings::{create_provider, EmbeddingProvider};
pub use engine::{QueryEngine, DEFAULT_TOP_K};
pub use retriever::Retriever;
pub use types::{AiAnswer, Document, QueryAnswer, QueryRecord, QueryStore, SearchResult};
pub use vector_index::VectorIndex;
