// src/classifier/invoke.rs
// Model invocation with a bounded retry on unreadable output

use std::time::Duration;
use tracing::{debug, warn};

use super::parse::parse_response;
use super::types::{Classification, FallbackResult};
use crate::llm::{ModelCapability, ModelError, SamplingConfig};

/// Total attempts (not retries) before falling back
pub const MAX_PARSE_ATTEMPTS: u32 = 3;

/// Call the model and parse its answer, retrying only when the answer cannot
/// be parsed. Capability failures (auth, quota, transport, timeout) are
/// returned immediately. After `MAX_PARSE_ATTEMPTS` unreadable answers the
/// fixed fallback for `sanitized_text` is returned.
pub async fn invoke(
    model: &dyn ModelCapability,
    segments: &[String],
    sanitized_text: &str,
    timeout: Duration,
) -> Result<Classification, ModelError> {
    let sampling = SamplingConfig::CLASSIFICATION;

    for attempt in 1..=MAX_PARSE_ATTEMPTS {
        let raw = tokio::time::timeout(timeout, model.generate(segments, &sampling))
            .await
            .map_err(|_| ModelError::Timeout(timeout.as_secs()))??;

        match parse_response(&raw) {
            Ok(analysis) => {
                debug!(attempt, keys = analysis.len(), "Model output parsed");
                return Ok(Classification::Model(analysis));
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = MAX_PARSE_ATTEMPTS,
                    error = %e,
                    raw_len = raw.len(),
                    "Unreadable model output"
                );
            }
        }
    }

    warn!("Model output unreadable after {} attempts, returning fallback", MAX_PARSE_ATTEMPTS);
    Ok(Classification::Fallback(FallbackResult::for_message(sanitized_text)))
}
