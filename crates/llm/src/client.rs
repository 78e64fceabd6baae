//! Text-generation client abstraction and request types.

use krishi_core::AppResult;
use serde::{Deserialize, Serialize};

/// Decoding configuration sent with every generation request.
///
/// The defaults are fixed application-wide: greedy decoding with bounded
/// output length and a mild repetition penalty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    pub decoding_method: String,
    pub max_new_tokens: u32,
    pub min_new_tokens: u32,
    pub temperature: f64,
    pub repetition_penalty: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            decoding_method: "greedy".to_string(),
            max_new_tokens: 300,
            min_new_tokens: 50,
            temperature: 0.7,
            repetition_penalty: 1.1,
        }
    }
}

/// A single text-generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The assembled prompt
    pub input: String,

    /// Decoding configuration
    pub parameters: GenerationParams,
}

impl GenerationRequest {
    /// Create a request with the application-wide default parameters.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            parameters: GenerationParams::default(),
        }
    }

    /// Replace the decoding parameters.
    pub fn with_parameters(mut self, parameters: GenerationParams) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Trait for text-generation providers.
///
/// Implementations perform a single bounded attempt per call: no retries,
/// no backoff. Failures are reported as errors and the caller decides how
/// to degrade.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Get the provider name (e.g., "watsonx").
    fn provider_name(&self) -> &str;

    /// Generate text for the request and return the generated string.
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String>;
}
