//! AI augmentation over retrieved context.
//!
//! Layers a generated answer on top of the offline results. This is a
//! best-effort enhancement: when the generation service is unconfigured
//! or a call fails, the answer is simply absent.

use crate::types::{AiAnswer, SearchResult};
use krishi_llm::{GenerationRequest, TextGenerator};
use std::sync::Arc;

/// Optional augmentation component.
///
/// Holds no generator when the external service is unconfigured; in that
/// state `generate` returns `Unavailable` without any network activity.
pub struct Augmenter {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl Augmenter {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    /// True when a generation client is configured.
    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Generate an answer grounded in the retrieved context.
    ///
    /// Makes exactly one attempt. Any failure is logged and surfaces as
    /// `Unavailable`; the caller never sees it as an error.
    pub async fn generate(&self, query: &str, offline_results: &[SearchResult]) -> AiAnswer {
        let Some(generator) = &self.generator else {
            tracing::debug!("Generation service not configured, skipping AI answer");
            return AiAnswer::Unavailable;
        };

        let prompt = build_prompt(query, offline_results);
        let request = GenerationRequest::new(prompt);

        match generator.generate(&request).await {
            Ok(text) => AiAnswer::Text(text),
            Err(e) => {
                tracing::error!("AI generation failed: {}", e);
                AiAnswer::Unavailable
            }
        }
    }
}

/// Build the grounding prompt from retrieved context and the query.
///
/// Context is the retrieved statements in retrieval order, one per line.
fn build_prompt(query: &str, offline_results: &[SearchResult]) -> String {
    let context: Vec<&str> = offline_results
        .iter()
        .map(|result| result.document.text.as_str())
        .collect();

    format!(
        "You are an agricultural expert assistant. Based on the following context \
         and the user's query, provide a helpful, accurate response.\n\n\
         Context:\n{}\n\n\
         User Query: {}\n\n\
         Please provide a comprehensive answer that addresses the user's \
         agricultural question.",
        context.join("\n"),
        query
    )
}
