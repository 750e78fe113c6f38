// src/classifier/types.rs
// Request and result shapes for classification

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Loosely validated location bag. Address and coordinates may both be set;
/// the address wins when formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Location {
    /// Non-blank address, if any
    pub fn address(&self) -> Option<&str> {
        non_blank(&self.address)
    }

    pub fn city(&self) -> Option<&str> {
        non_blank(&self.city)
    }

    pub fn country(&self) -> Option<&str> {
        non_blank(&self.country)
    }

    /// Both coordinates, when both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Inbound classification request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassificationRequest {
    /// Missing text is treated as empty and rejected as too short
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub context: Option<serde_json::Map<String, serde_json::Value>>,
    /// Wall-clock time as written by the client; any offset is dropped
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default)]
    pub location: Option<Location>,
}

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse an ISO-8601 timestamp with or without a UTC offset
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 timestamp: {}", s))),
    }
}

/// Fixed degraded output returned when the model's answer cannot be read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackResult {
    pub understood_message: String,
    pub classification_status: String,
    pub risk_level: String,
    pub actions: Vec<FallbackAction>,
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackAction {
    pub action_type: String,
}

impl FallbackResult {
    pub fn for_message(sanitized: &str) -> Self {
        Self {
            understood_message: sanitized.to_string(),
            classification_status: "REQUIRES_REVIEW".to_string(),
            risk_level: "HIGH".to_string(),
            actions: vec![FallbackAction {
                action_type: "MANUAL_REVIEW_REQUIRED".to_string(),
            }],
            response: "This text requires human review for proper classification".to_string(),
        }
    }
}

/// Outcome of a classification: the model's own JSON object, or the fallback
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Classification {
    Model(serde_json::Map<String, serde_json::Value>),
    Fallback(FallbackResult),
}

impl Classification {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Classification::Fallback(_))
    }

    /// Label used in the `x-classification-status` response header
    pub fn status_label(&self) -> &'static str {
        match self {
            Classification::Model(_) => "model",
            Classification::Fallback(_) => "fallback",
        }
    }
}
