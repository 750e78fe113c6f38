// src/llm/http_client.rs
// Shared HTTP execution for model providers

use reqwest::Client;
use std::time::Duration;
use tracing::warn;

use super::ModelError;

/// Default extra attempts for transient failures (429, 5xx, connect).
/// Zero keeps capability failures fatal on first occurrence.
const DEFAULT_MAX_RETRIES: u32 = 0;
/// Default base backoff duration between retries (doubles each attempt)
const DEFAULT_BASE_BACKOFF_MS: u64 = 500;

/// HTTP client wrapper that classifies failures into `ModelError`
pub struct LlmHttpClient {
    client: Client,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl LlmHttpClient {
    /// Create from an existing reqwest::Client
    pub fn from_client(client: Client, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff: Duration::from_millis(DEFAULT_BASE_BACKOFF_MS),
        }
    }

    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Execute an HTTP request, retrying transient failures up to `max_retries` times.
    ///
    /// The `build_request` closure is called on each attempt with the reqwest Client
    /// and the request body, allowing callers to customize URL, headers, and auth.
    /// Returns the response body as text on success.
    pub async fn execute_request_with_retry<F>(
        &self,
        request_id: &str,
        body: String,
        build_request: F,
    ) -> Result<String, ModelError>
    where
        F: Fn(&Client, String) -> reqwest::RequestBuilder,
    {
        let mut attempts = 0;
        let mut backoff = self.base_backoff;

        loop {
            let result = self.execute_once(build_request(&self.client, body.clone())).await;

            match result {
                Err(e) if attempts < self.max_retries && e.is_transient() => {
                    warn!(
                        request_id = %request_id,
                        error = %e,
                        "Transient model error, retrying in {:?}...",
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempts += 1;
                    backoff *= 2;
                }
                other => return other,
            }
        }
    }

    async fn execute_once(&self, request: reqwest::RequestBuilder) -> Result<String, ModelError> {
        let response = request
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| self.classify_reqwest(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ModelError::from_status(status.as_u16(), error_body));
        }

        response.text().await.map_err(|e| self.classify_reqwest(e))
    }

    fn classify_reqwest(&self, e: reqwest::Error) -> ModelError {
        if e.is_timeout() {
            ModelError::Timeout(self.request_timeout.as_secs())
        } else {
            ModelError::Transport(e.to_string())
        }
    }
}
