//! Crate-level tests exercising the full retrieval pipeline.

mod retrieval_ranking;
