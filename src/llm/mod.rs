// src/llm/mod.rs
// Generative-model capability clients

mod gemini;
mod http_client;
mod logging;
mod provider;

pub use gemini::GeminiClient;
pub use provider::{GEMINI_KEY_VAR, ModelCapability, ModelError, SamplingConfig, UnconfiguredModel};
