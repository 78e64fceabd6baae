//! Feature-hashing embedding provider.

use crate::embeddings::provider::EmbeddingProvider;
use krishi_core::AppResult;

/// FNV-1a 64-bit parameters.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Weight of a whole-token feature.
const TOKEN_WEIGHT: f32 = 1.0;

/// Weight of a token-prefix feature. The 4-character prefix acts as a
/// crude stem so that "control" and "controlled" share a feature.
const PREFIX_WEIGHT: f32 = 0.5;

/// Prefix length for the stem feature.
const PREFIX_CHARS: usize = 4;

/// Common words excluded from feature extraction.
const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them", "can", "how", "like", "most", "than", "more", "when",
    "where", "what",
];

/// Local, deterministic embedding provider using signed feature hashing.
///
/// Each content token contributes a whole-token feature and a prefix
/// feature; features are hashed into a fixed number of signed buckets and
/// the result is L2-normalized. Not semantically accurate like neural
/// embedding models, but consistent and content-dependent, which makes it
/// suitable for offline operation and tests. Infallible for any UTF-8
/// input; empty or all-stop-word text yields the zero vector.
#[derive(Debug)]
pub struct HashingProvider {
    dimensions: usize,
}

impl HashingProvider {
    /// Create a new hashing provider with the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimensions];

        let lower = text.to_lowercase();
        for token in lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| t.len() > 2 && !STOP_WORDS.contains(t))
        {
            let prefix: String = token.chars().take(PREFIX_CHARS).collect();

            self.bump(&mut embedding, 0, token, TOKEN_WEIGHT);
            self.bump(&mut embedding, 1, &prefix, PREFIX_WEIGHT);
        }

        // Normalize to unit length; the zero vector stays zero.
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }

        embedding
    }

    /// Add a signed feature for `(kind, feature)` into its hashed bucket.
    fn bump(&self, embedding: &mut [f32], kind: u64, feature: &str, weight: f32) {
        let hash = hash_feature(kind, feature);
        let index = ((hash >> 1) % self.dimensions as u64) as usize;
        let sign = if hash & 1 == 0 { 1.0 } else { -1.0 };
        embedding[index] += sign * weight;
    }
}

/// FNV-1a hash of a feature string, seeded by the feature kind.
fn hash_feature(kind: u64, feature: &str) -> u64 {
    let mut hash = FNV_OFFSET ^ kind.wrapping_mul(FNV_PRIME);
    for byte in feature.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashingProvider {
    fn provider_name(&self) -> &str {
        "hash"
    }

    fn model_name(&self) -> &str {
        "feature-hash-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}
