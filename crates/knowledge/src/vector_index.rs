//! In-memory exact vector index.
//!
//! Brute-force inner-product search over a fixed set of vectors. The
//! knowledge base is small and static, so exact search is the deliberate
//! choice here; the top-k and tie-break contract below depends on it.
//!
//! The index stores vectors exactly as given and never normalizes them.
//! Callers must L2-normalize both stored vectors and queries for inner
//! product to equal cosine similarity.

use krishi_core::{AppError, AppResult};

/// Immutable, exact nearest-neighbor index over dense vectors.
#[derive(Debug)]
pub struct VectorIndex {
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl VectorIndex {
    /// Build an index from a sequence of vectors.
    ///
    /// All vectors must share one dimensionality. An empty sequence yields
    /// an empty, searchable index.
    pub fn build(vectors: Vec<Vec<f32>>) -> AppResult<Self> {
        let dimensions = vectors.first().map(|v| v.len()).unwrap_or(0);

        for (position, vector) in vectors.iter().enumerate() {
            if vector.len() != dimensions {
                return Err(AppError::Knowledge(format!(
                    "Vector at position {} has dimension {}, expected {}",
                    position,
                    vector.len(),
                    dimensions
                )));
            }
        }

        Ok(Self {
            vectors,
            dimensions,
        })
    }

    /// Search for the `top_k` vectors with the largest inner product
    /// against the query.
    ///
    /// Returns `min(top_k, len)` pairs of `(position, score)` in
    /// non-increasing score order; ties keep insertion order. Scores are
    /// raw inner products, not clamped.
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<(usize, f32)> {
        if top_k == 0 || self.vectors.is_empty() {
            return Vec::new();
        }

        if query.len() != self.dimensions {
            tracing::warn!(
                "Query dimension {} does not match index dimension {}",
                query.len(),
                self.dimensions
            );
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| (position, dot(query, vector)))
            .collect();

        // Stable sort keeps insertion order for equal scores.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        scored
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Inner product of two equal-length vectors.
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Return an L2-normalized copy of a vector.
///
/// A zero vector is returned unchanged; there is no direction to scale.
pub fn l2_normalized(vector: &[f32]) -> Vec<f32> {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter().map(|x| x / norm).collect()
    } else {
        vector.to_vec()
    }
}
