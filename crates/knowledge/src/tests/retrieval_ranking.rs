//! End-to-end ranking tests over the builtin knowledge base.
//!
//! These run the real pipeline: hashing provider, normalized index,
//! retriever, and query engine, with no network access.

use crate::augment::Augmenter;
use crate::corpus::KnowledgeBase;
use crate::embeddings::providers::HashingProvider;
use crate::engine::QueryEngine;
use crate::retriever::Retriever;
use std::sync::Arc;

const PEST_QUERY: &str = "How to control pests in rice crop?";

async fn builtin_retriever() -> Retriever {
    let provider = Arc::new(HashingProvider::new(384));
    Retriever::build(provider, KnowledgeBase::builtin())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_pest_query_surfaces_pest_control_statements() {
    let retriever = builtin_retriever().await;
    let results = retriever.search_offline(PEST_QUERY, 3).await.unwrap();

    assert_eq!(results.len(), 3);

    // The lexical encoder puts both pest-control statements in the top
    // three for this query.
    let top_texts: Vec<&str> = results.iter().map(|r| r.document.text.as_str()).collect();
    assert!(
        top_texts.iter().any(|t| t.contains("aphids")),
        "aphid statement missing from top 3: {:?}",
        top_texts
    );
    assert!(
        top_texts.iter().any(|t| t.contains("Companion planting")),
        "companion planting statement missing from top 3: {:?}",
        top_texts
    );
}

#[tokio::test]
async fn test_pest_query_keeps_rice_statement_near_the_top() {
    let retriever = builtin_retriever().await;
    let results = retriever.search_offline(PEST_QUERY, 5).await.unwrap();

    assert!(results
        .iter()
        .any(|r| r.document.text.starts_with("Rice requires")));
}

#[tokio::test]
async fn test_result_count_is_min_of_k_and_base_size() {
    let retriever = builtin_retriever().await;

    let results = retriever.search_offline(PEST_QUERY, 100).await.unwrap();
    assert_eq!(results.len(), 15);

    let results = retriever.search_offline(PEST_QUERY, 3).await.unwrap();
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_scores_are_non_increasing_over_full_base() {
    let retriever = builtin_retriever().await;
    let results = retriever.search_offline(PEST_QUERY, 15).await.unwrap();

    for pair in results.windows(2) {
        assert!(
            pair[0].score >= pair[1].score,
            "out of order: {} before {}",
            pair[0].score,
            pair[1].score
        );
    }
}

#[tokio::test]
async fn test_exact_statement_query_ranks_itself_first() {
    let retriever = builtin_retriever().await;
    let statement = "Drip irrigation is more efficient than flood irrigation for water conservation.";

    let results = retriever.search_offline(statement, 1).await.unwrap();

    assert_eq!(results[0].document.text, statement);
    assert!((results[0].score - 1.0).abs() < 1e-3);
}

#[tokio::test]
async fn test_engine_answers_offline_without_generation_service() {
    let retriever = builtin_retriever().await;
    let engine = QueryEngine::new(retriever, Augmenter::new(None));

    let answer = engine.answer(PEST_QUERY).await.unwrap();

    assert_eq!(answer.query, PEST_QUERY);
    assert!(!answer.offline_response.is_empty());
    assert!(answer.ai_response.is_unavailable());

    // Wire shape: absent AI answer serializes to null.
    let json = serde_json::to_value(&answer).unwrap();
    assert_eq!(json["ai_response"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_engine_offline_response_joins_top_three_statements() {
    let retriever = builtin_retriever().await;
    let engine = QueryEngine::new(retriever, Augmenter::new(None));

    let answer = engine.answer(PEST_QUERY).await.unwrap();
    let separate = engine
        .retriever()
        .search_offline(PEST_QUERY, 3)
        .await
        .unwrap();

    let expected = separate
        .iter()
        .map(|r| r.document.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(answer.offline_response, expected);
}
