// src/llm/gemini/mod.rs
// Google Gemini API client

mod client;
mod conversion;
pub mod types;

pub use client::GeminiClient;
