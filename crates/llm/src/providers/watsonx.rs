//! watsonx.ai text-generation provider.
//!
//! Wire protocol: `POST {base_url}/ml/v1/text/generation?version=2023-05-29`
//! with bearer authentication. A 200 response carries
//! `{ "results": [ { "generated_text": ... } ] }`.

use crate::client::{GenerationParams, GenerationRequest, TextGenerator};
use krishi_core::config::WatsonxSettings;
use krishi_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Generation endpoint path, relative to the instance base URL.
const GENERATION_PATH: &str = "/ml/v1/text/generation";

/// API version pinned as a query parameter.
const API_VERSION: &str = "2023-05-29";

/// Fixed model identifier for all generation requests.
const MODEL_ID: &str = "ibm/granite-3-8b-instruct";

/// Request timeout in seconds. The generation call is the only operation
/// in the application that may block for a non-trivial duration.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// watsonx.ai API request format.
#[derive(Debug, Serialize)]
struct WatsonxRequest<'a> {
    input: &'a str,
    parameters: &'a GenerationParams,
    model_id: &'a str,
    project_id: &'a str,
}

/// watsonx.ai API response format.
#[derive(Debug, Deserialize)]
struct WatsonxResponse {
    results: Vec<WatsonxResult>,
}

#[derive(Debug, Deserialize)]
struct WatsonxResult {
    generated_text: String,
}

/// watsonx.ai text-generation client.
pub struct WatsonxClient {
    /// Instance base URL, without trailing slash
    base_url: String,

    /// Bearer API key
    api_key: String,

    /// Project identifier sent with every request
    project_id: String,

    /// HTTP client with a bounded request timeout
    client: reqwest::Client,
}

impl WatsonxClient {
    /// Create a new client from complete watsonx settings.
    ///
    /// The settings must already have passed the credential gate; this
    /// constructor does not re-check them.
    pub fn new(settings: &WatsonxSettings) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: settings.url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            project_id: settings.project_id.clone(),
            client,
        })
    }

    fn generation_url(&self) -> String {
        format!(
            "{}{}?version={}",
            self.base_url, GENERATION_PATH, API_VERSION
        )
    }
}

#[async_trait::async_trait]
impl TextGenerator for WatsonxClient {
    fn provider_name(&self) -> &str {
        "watsonx"
    }

    async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        let body = WatsonxRequest {
            input: &request.input,
            parameters: &request.parameters,
            model_id: MODEL_ID,
            project_id: &self.project_id,
        };

        let url = self.generation_url();
        tracing::debug!("Sending generation request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to watsonx: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "watsonx API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: WatsonxResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse watsonx response: {}", e)))?;

        let text = parsed
            .results
            .into_iter()
            .next()
            .map(|r| r.generated_text)
            .ok_or_else(|| AppError::Llm("watsonx response contained no results".to_string()))?;

        tracing::debug!("Received {} generated characters from watsonx", text.len());

        Ok(text)
    }
}
