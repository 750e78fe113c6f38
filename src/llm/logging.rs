// src/llm/logging.rs
// Shared model logging helpers

use tracing::info;

use super::gemini::types::UsageMetadata;

/// Log usage statistics for a model call.
pub fn log_usage(request_id: &str, provider: &str, usage: &UsageMetadata) {
    info!(
        request_id = %request_id,
        prompt_tokens = usage.prompt_token_count.unwrap_or(0),
        completion_tokens = usage.candidates_token_count.unwrap_or(0),
        total_tokens = usage.total_token_count.unwrap_or(0),
        "{} usage stats", provider
    );
}

/// Log completion summary for a model call.
pub fn log_completion(
    request_id: &str,
    provider: &str,
    duration_ms: u64,
    content_len: usize,
    finish_reason: Option<&str>,
) {
    info!(
        request_id = %request_id,
        duration_ms = duration_ms,
        content_len = content_len,
        finish_reason = finish_reason.unwrap_or("unknown"),
        "{} generation complete", provider
    );
}
