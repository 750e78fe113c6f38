// src/classifier/validation.rs
// Optional strict input checks (links, shell-like commands, length)

use regex::Regex;
use std::sync::LazyLock;

use super::sanitize::MAX_INPUT_CHARS;

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:http|ftp|https)://").expect("valid regex"));

/// Command tokens matched on word boundaries so "alarm" or "warm" pass
static DANGEROUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:sudo|rm|drop\s+table)\b").expect("valid regex"));

/// Returns `None` if valid, or the rejection reason.
pub fn validate_message(text: &str) -> Option<&'static str> {
    if text.chars().count() > MAX_INPUT_CHARS {
        return Some("Message too long (max 2000 chars)");
    }

    if LINK_RE.is_match(text) {
        return Some("Links not allowed");
    }

    if DANGEROUS_RE.is_match(text) {
        return Some("Potentially dangerous content");
    }

    None
}
