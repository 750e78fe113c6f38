// src/llm/gemini/conversion.rs
// Translation between prompt segments and Gemini request/response shapes

use crate::llm::SamplingConfig;
use crate::llm::gemini::types::{
    GeminiContent, GeminiPart, GeminiRequest, GeminiResponse, GenerationConfig,
};

/// Build a single-turn request. Empty segments are skipped because the
/// API rejects empty text parts; the relative order of the rest is kept.
pub fn build_request(segments: &[String], sampling: &SamplingConfig) -> GeminiRequest {
    let parts = segments
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| GeminiPart {
            text: Some(s.clone()),
            thought: false,
        })
        .collect();

    GeminiRequest {
        contents: vec![GeminiContent {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: GenerationConfig {
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            max_output_tokens: sampling.max_output_tokens,
        },
    }
}

/// Extract answer text from the first candidate (non-thought parts only).
/// Returns an empty string when the response carries no usable text,
/// e.g. a safety block or an empty candidate list.
pub fn extract_text(response: &GeminiResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter(|p| !p.thought)
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}
