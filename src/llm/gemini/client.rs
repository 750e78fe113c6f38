// src/llm/gemini/client.rs
// Google Gemini API client (non-streaming, text in / text out)

use crate::http::{MODEL_TIMEOUT, create_shared_client};
use crate::llm::gemini::conversion::{build_request, extract_text};
use crate::llm::gemini::types::GeminiResponse;
use crate::llm::http_client::LlmHttpClient;
use crate::llm::logging::{log_completion, log_usage};
use crate::llm::provider::{ModelCapability, ModelError, SamplingConfig};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    http: LlmHttpClient,
}

impl GeminiClient {
    /// Create a new Gemini client with the default model
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, crate::config::env::DEFAULT_MODEL.to_string())
    }

    /// Create a new Gemini client with custom model
    pub fn with_model(api_key: String, model: String) -> Self {
        Self::with_http_client(api_key, model, create_shared_client(), MODEL_TIMEOUT)
    }

    /// Create a new Gemini client with a shared HTTP client
    pub fn with_http_client(
        api_key: String,
        model: String,
        client: reqwest::Client,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key,
            model,
            http: LlmHttpClient::from_client(client, timeout),
        }
    }

    /// Allow extra HTTP attempts on transient provider failures
    pub fn with_transport_retries(mut self, retries: u32) -> Self {
        self.http = self.http.with_retries(retries);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_API_BASE, self.model)
    }
}

#[async_trait]
impl ModelCapability for GeminiClient {

    fn model_name(&self) -> String {
        self.model.clone()
    }

    #[instrument(skip(self, segments, sampling), fields(request_id, model = %self.model, segment_count = segments.len()))]
    async fn generate(
        &self,
        segments: &[String],
        sampling: &SamplingConfig,
    ) -> Result<String, ModelError> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        Span::current().record("request_id", request_id.as_str());

        info!(
            request_id = %request_id,
            segment_count = segments.len(),
            model = %self.model,
            "Starting Gemini generation request"
        );

        let request = build_request(segments, sampling);
        let body = serde_json::to_string(&request)
            .map_err(|e| ModelError::Envelope(format!("failed to encode request: {}", e)))?;
        debug!(request_id = %request_id, "Gemini request: {}", body);

        let url = self.endpoint();

        // Gemini authenticates via the x-goog-api-key header, not Bearer
        let response_body = self
            .http
            .execute_request_with_retry(&request_id, body, |client, body| {
                client
                    .post(&url)
                    .header("Content-Type", "application/json")
                    .header("x-goog-api-key", &self.api_key)
                    .body(body)
            })
            .await?;

        let duration_ms = start_time.elapsed().as_millis() as u64;

        let data: GeminiResponse = serde_json::from_str(&response_body)
            .map_err(|e| ModelError::Envelope(format!("failed to parse Gemini response: {}", e)))?;

        if let Some(reason) = data
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            warn!(request_id = %request_id, block_reason = reason, "Gemini blocked the prompt");
        }

        let content = extract_text(&data);

        if let Some(ref usage) = data.usage_metadata {
            log_usage(&request_id, "Gemini", usage);
        }

        log_completion(
            &request_id,
            "Gemini",
            duration_ms,
            content.len(),
            data.candidates.first().and_then(|c| c.finish_reason.as_deref()),
        );

        Ok(content)
    }
}
