// src/classifier/parse.rs
// Extract the JSON object from raw model output

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use thiserror::Error;

/// A ```json fenced block; only the first one is used
static JSON_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\n(.*?)\n```").expect("valid regex"));

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("model returned no text")]
    Empty,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Parse model output. A fenced ```json block wins; when there is none the
/// whole text must be JSON. Either way the result must be an object.
pub fn parse_response(raw: &str) -> Result<Map<String, Value>, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let candidate = match JSON_FENCE_RE.captures(raw).and_then(|c| c.get(1)) {
        Some(block) => block.as_str(),
        None => raw,
    };

    match serde_json::from_str::<Value>(candidate)? {
        Value::Object(map) => Ok(map),
        other => Err(ParseError::NotAnObject(kind(&other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
