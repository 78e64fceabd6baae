//! Core types for retrieval and augmentation.

use krishi_core::AppResult;
use serde::{Deserialize, Serialize};

/// A single knowledge-base statement.
///
/// Documents are identified by their stable position in the knowledge base
/// and are immutable after index construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Statement text
    pub text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A retrieved document with its similarity score.
///
/// Scores are raw inner products over normalized vectors and are reported
/// without clamping; opposite vectors can score below zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub document: Document,
    pub score: f32,
}

/// Outcome of the AI augmentation step.
///
/// `Unavailable` covers both "service not configured" and "service call
/// failed"; neither is an error for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AiAnswer {
    Text(String),
    Unavailable,
}

impl AiAnswer {
    /// The generated text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            AiAnswer::Text(text) => Some(text),
            AiAnswer::Unavailable => None,
        }
    }

    /// Consume into an optional string, for persistence.
    pub fn into_text(self) -> Option<String> {
        match self {
            AiAnswer::Text(text) => Some(text),
            AiAnswer::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, AiAnswer::Unavailable)
    }
}

/// The assembled answer for one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAnswer {
    /// The original query text
    pub query: String,

    /// Retrieved statements joined with single spaces; empty when the
    /// knowledge base produced no results
    pub offline_response: String,

    /// Optional AI-augmented answer
    pub ai_response: AiAnswer,
}

/// A query and its answers, as handed to the persistence collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub user_id: String,
    pub query: String,
    pub offline_response: String,
    pub ai_response: Option<String>,
}

/// Persistence collaborator for query history.
///
/// Implementations durably record each query with a store-assigned
/// timestamp. The core only writes; it never reads records back.
pub trait QueryStore: Send + Sync {
    fn record(&self, record: &QueryRecord) -> AppResult<()>;
}
