//! Offline retrieval over the knowledge base.

use crate::corpus::KnowledgeBase;
use crate::embeddings::EmbeddingProvider;
use crate::types::SearchResult;
use crate::vector_index::{l2_normalized, VectorIndex};
use krishi_core::AppResult;
use std::sync::Arc;

/// Embedding-based retriever over a fixed knowledge base.
///
/// Built once at startup; read-only thereafter, so concurrent queries need
/// no locking. Normalization of both stored and query vectors happens
/// here, not in the index.
pub struct Retriever {
    provider: Arc<dyn EmbeddingProvider>,
    index: VectorIndex,
    base: KnowledgeBase,
}

impl Retriever {
    /// Embed every statement, normalize, and build the index.
    pub async fn build(
        provider: Arc<dyn EmbeddingProvider>,
        base: KnowledgeBase,
    ) -> AppResult<Self> {
        let texts: Vec<String> = base.documents().iter().map(|d| d.text.clone()).collect();

        let embeddings = provider.embed_batch(&texts).await?;
        let normalized: Vec<Vec<f32>> = embeddings.iter().map(|v| l2_normalized(v)).collect();

        let index = VectorIndex::build(normalized)?;

        tracing::info!(
            "Built retrieval index: {} documents, {} dimensions, provider '{}'",
            index.len(),
            index.dimensions(),
            provider.provider_name()
        );

        Ok(Self {
            provider,
            index,
            base,
        })
    }

    /// Return the `top_k` most similar documents with their scores.
    ///
    /// Results are ordered by non-increasing score, ties by document
    /// position. A `top_k` of zero or an empty knowledge base yields an
    /// empty sequence, never an error.
    pub async fn search_offline(&self, query: &str, top_k: usize) -> AppResult<Vec<SearchResult>> {
        if top_k == 0 || self.base.is_empty() {
            return Ok(Vec::new());
        }

        let embedding = self.provider.embed(query).await?;
        let query_vector = l2_normalized(&embedding);

        let hits = self.index.search(&query_vector, top_k);

        // Positions outside the knowledge base are dropped defensively;
        // index and base are built from the same snapshot, so this should
        // never trigger.
        let results: Vec<SearchResult> = hits
            .into_iter()
            .filter_map(|(position, score)| {
                self.base.get(position).map(|document| SearchResult {
                    document: document.clone(),
                    score,
                })
            })
            .collect();

        tracing::debug!(
            "Retrieved {} documents for query ({} requested)",
            results.len(),
            top_k
        );

        Ok(results)
    }

    /// The knowledge base this retriever was built from.
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::HashingProvider;

    fn test_base() -> KnowledgeBase {
        KnowledgeBase::from_statements([
            "Rice requires consistent water supply and grows best in warm, humid conditions.",
            "Wheat is a cool-season crop that needs well-drained soil and moderate rainfall.",
            "Drip irrigation is more efficient than flood irrigation for water conservation.",
        ])
    }

    async fn test_retriever() -> Retriever {
        let provider = Arc::new(HashingProvider::new(384));
        Retriever::build(provider, test_base()).await.unwrap()
    }

    #[tokio::test]
    async fn test_returns_min_of_k_and_base_size() {
        let retriever = test_retriever().await;

        let results = retriever.search_offline("irrigation", 10).await.unwrap();
        assert_eq!(results.len(), 3);

        let results = retriever.search_offline("irrigation", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_self_similarity_is_top_result() {
        let retriever = test_retriever().await;
        let statement =
            "Drip irrigation is more efficient than flood irrigation for water conservation.";

        let results = retriever.search_offline(statement, 3).await.unwrap();

        assert_eq!(results[0].document.text, statement);
        assert!(
            (results[0].score - 1.0).abs() < 1e-3,
            "self-similarity should be ~1.0, got {}",
            results[0].score
        );
    }

    #[tokio::test]
    async fn test_scores_non_increasing() {
        let retriever = test_retriever().await;
        let results = retriever
            .search_offline("water for rice", 3)
            .await
            .unwrap();

        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_idempotent_for_same_query() {
        let retriever = test_retriever().await;

        let first = retriever.search_offline("water supply", 3).await.unwrap();
        let second = retriever.search_offline("water supply", 3).await.unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.document, b.document);
            assert_eq!(a.score, b.score);
        }
    }

    #[tokio::test]
    async fn test_zero_top_k_yields_empty() {
        let retriever = test_retriever().await;
        let results = retriever.search_offline("rice", 0).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_empty_base_yields_empty() {
        let provider = Arc::new(HashingProvider::new(384));
        let retriever = Retriever::build(provider, KnowledgeBase::default())
            .await
            .unwrap();

        let results = retriever.search_offline("rice", 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_is_not_an_error() {
        let retriever = test_retriever().await;
        let results = retriever.search_offline("", 3).await.unwrap();
        // The zero query vector scores 0 against everything; all documents
        // still come back in position order.
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.score == 0.0));
    }
}
