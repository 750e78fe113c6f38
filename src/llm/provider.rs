// src/llm/provider.rs
// Generative-model capability abstraction

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Variable holding the Gemini API key
pub const GEMINI_KEY_VAR: &str = "GEMINI_API_KEY";

/// Sampling parameters sent with every generation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl SamplingConfig {
    /// Low-temperature settings used for classification
    pub const CLASSIFICATION: SamplingConfig = SamplingConfig {
        temperature: 0.2,
        top_p: 0.95,
        max_output_tokens: 2000,
    };
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::CLASSIFICATION
    }
}

/// Capability-level failures. These are distinct from "the model answered
/// but we could not read it", which is handled by the classifier.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model credentials not configured ({0} is unset)")]
    NotConfigured(&'static str),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("quota exceeded: {0}")]
    Quota(String),

    #[error("model call timed out after {0}s")]
    Timeout(u64),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unreadable API envelope: {0}")]
    Envelope(String),
}

impl ModelError {
    /// Classify a non-success HTTP status returned by a provider
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Auth(body),
            429 => Self::Quota(body),
            _ => Self::Api { status, body },
        }
    }

    /// True for failures worth another HTTP attempt
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Quota(_) | Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Trait for generative-model capabilities: ordered prompt segments in,
/// raw text out. An empty string means the model produced no candidate text.
#[async_trait]
pub trait ModelCapability: Send + Sync {
    async fn generate(
        &self,
        segments: &[String],
        sampling: &SamplingConfig,
    ) -> Result<String, ModelError>;

    fn model_name(&self) -> String;
}

/// Stand-in used when no API key is configured; every call fails with
/// `NotConfigured` so the server can still start and report health.
pub struct UnconfiguredModel;

#[async_trait]
impl ModelCapability for UnconfiguredModel {
    async fn generate(
        &self,
        _segments: &[String],
        _sampling: &SamplingConfig,
    ) -> Result<String, ModelError> {
        Err(ModelError::NotConfigured(GEMINI_KEY_VAR))
    }

    fn model_name(&self) -> String {
        "unconfigured".to_string()
    }
}
