//! Query orchestration.
//!
//! The boundary operation: retrieve offline context, attempt AI
//! augmentation, and hand the assembled pair to the persistence
//! collaborator.

use crate::augment::Augmenter;
use crate::retriever::Retriever;
use crate::types::{QueryAnswer, QueryRecord, QueryStore};
use krishi_core::AppResult;

/// Default number of documents retrieved per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Process-wide query engine.
///
/// Constructed once at startup over the immutable retriever; safe to
/// share across concurrent queries.
pub struct QueryEngine {
    retriever: Retriever,
    augmenter: Augmenter,
    top_k: usize,
}

impl QueryEngine {
    pub fn new(retriever: Retriever, augmenter: Augmenter) -> Self {
        Self {
            retriever,
            augmenter,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Override the retrieval depth.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer a query: offline retrieval plus optional AI augmentation.
    ///
    /// The offline response is always present when the knowledge base is
    /// non-empty; the AI response is present or explicitly absent. Errors
    /// below this boundary (encoder, index) propagate to the caller.
    pub async fn answer(&self, query: &str) -> AppResult<QueryAnswer> {
        let offline_results = self.retriever.search_offline(query, self.top_k).await?;

        let offline_response = offline_results
            .iter()
            .map(|result| result.document.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let ai_response = self.augmenter.generate(query, &offline_results).await;

        Ok(QueryAnswer {
            query: query.to_string(),
            offline_response,
            ai_response,
        })
    }

    /// Answer a query and record it through the persistence collaborator.
    pub async fn handle(
        &self,
        user_id: &str,
        query: &str,
        store: &dyn QueryStore,
    ) -> AppResult<QueryAnswer> {
        let answer = self.answer(query).await?;

        store.record(&QueryRecord {
            user_id: user_id.to_string(),
            query: answer.query.clone(),
            offline_response: answer.offline_response.clone(),
            ai_response: answer.ai_response.clone().into_text(),
        })?;

        Ok(answer)
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::KnowledgeBase;
    use crate::embeddings::providers::HashingProvider;
    use krishi_core::{AppError, AppResult};
    use krishi_llm::{GenerationRequest, TextGenerator};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct FixedGenerator {
        calls: AtomicUsize,
        outcome: Result<String, String>,
    }

    #[async_trait::async_trait]
    impl TextGenerator for FixedGenerator {
        fn provider_name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, _request: &GenerationRequest) -> AppResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone().map_err(AppError::Llm)
        }
    }

    #[derive(Default)]
    struct CapturingStore {
        records: Mutex<Vec<QueryRecord>>,
    }

    impl QueryStore for CapturingStore {
        fn record(&self, record: &QueryRecord) -> AppResult<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    async fn engine_with(augmenter: Augmenter) -> QueryEngine {
        let provider = Arc::new(HashingProvider::new(384));
        let base = KnowledgeBase::from_statements([
            "Rice requires consistent water supply and grows best in warm, humid conditions.",
            "Wheat is a cool-season crop that needs well-drained soil and moderate rainfall.",
            "Pests like aphids can be controlled with neem oil or insecticidal soap.",
            "Mulching helps retain soil moisture and suppress weed growth.",
        ]);
        let retriever = Retriever::build(provider, base).await.unwrap();
        QueryEngine::new(retriever, augmenter)
    }

    #[tokio::test]
    async fn test_answer_joins_documents_with_spaces() {
        let engine = engine_with(Augmenter::new(None)).await;
        let answer = engine.answer("rice water").await.unwrap();

        // Three documents, space-separated: exactly two joining spaces
        // beyond the statement texts themselves.
        assert!(!answer.offline_response.is_empty());
        assert_eq!(answer.offline_response.matches(". ").count(), 2);
        assert!(answer.ai_response.is_unavailable());
    }

    #[tokio::test]
    async fn test_offline_answer_survives_generation_failure() {
        let generator = Arc::new(FixedGenerator {
            calls: AtomicUsize::new(0),
            outcome: Err("timeout".to_string()),
        });
        let engine = engine_with(Augmenter::new(Some(generator))).await;

        let answer = engine.answer("rice water").await.unwrap();

        assert!(!answer.offline_response.is_empty());
        assert!(answer.ai_response.is_unavailable());
    }

    #[tokio::test]
    async fn test_successful_generation_is_returned() {
        let generator = Arc::new(FixedGenerator {
            calls: AtomicUsize::new(0),
            outcome: Ok("Flood the paddy early.".to_string()),
        });
        let engine = engine_with(Augmenter::new(Some(generator))).await;

        let answer = engine.answer("rice water").await.unwrap();

        assert_eq!(answer.ai_response.text(), Some("Flood the paddy early."));
    }

    #[tokio::test]
    async fn test_handle_records_query() {
        let engine = engine_with(Augmenter::new(None)).await;
        let store = CapturingStore::default();

        let answer = engine.handle("ramesh", "rice water", &store).await.unwrap();

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, "ramesh");
        assert_eq!(records[0].query, "rice water");
        assert_eq!(records[0].offline_response, answer.offline_response);
        assert_eq!(records[0].ai_response, None);
    }

    #[tokio::test]
    async fn test_empty_base_yields_empty_offline_response() {
        let provider = Arc::new(HashingProvider::new(384));
        let retriever = Retriever::build(provider, KnowledgeBase::default())
            .await
            .unwrap();
        let engine = QueryEngine::new(retriever, Augmenter::new(None));

        let answer = engine.answer("anything").await.unwrap();
        assert_eq!(answer.offline_response, "");
    }
}
