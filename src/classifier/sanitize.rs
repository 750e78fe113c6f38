// src/classifier/sanitize.rs
// Input sanitization applied before any external use of the text

use regex::Regex;
use std::sync::LazyLock;

/// Maximum number of characters forwarded to the model
pub const MAX_INPUT_CHARS: usize = 2000;

/// Structural delimiters stripped from user text
static UNSAFE_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[<>{};]").expect("valid regex"));

/// Strip `< > { } ;` and keep the first `MAX_INPUT_CHARS` characters.
pub fn sanitize(text: &str) -> String {
    let cleaned = UNSAFE_CHARS_RE.replace_all(text, "");
    cleaned.chars().take(MAX_INPUT_CHARS).collect()
}
