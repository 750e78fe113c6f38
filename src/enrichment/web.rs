// src/enrichment/web.rs
// Best-effort web context for the prompt

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::gate::should_augment;

const PUBLIC_APIS_URL: &str = "https://api.publicapis.org/entries";
const BRAVE_SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";

/// Words taken from the message when it is long enough
const TERM_WORDS: usize = 3;
/// Characters taken from short messages
const TERM_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub terms: String,
    /// Free-form place description appended by providers that support it
    pub locality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub hits: usize,
    pub top_snippet: Option<String>,
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("search API returned status {0}")]
    Status(u16),

    #[error("web lookup disabled")]
    Disabled,
}

/// Trait for search providers
#[async_trait]
pub trait SearchCapability: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, SearchError>;
    fn provider_name(&self) -> &str;
}

/// Coarse search terms: the first three words of longer messages,
/// otherwise the first 30 characters.
pub fn search_terms(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > TERM_WORDS {
        words[..TERM_WORDS].join(" ")
    } else {
        text.chars().take(TERM_CHARS).collect::<String>().trim().to_string()
    }
}

/// Strip the "Location:" / "GPS Coordinates:" label from a location context
fn locality_from(location_context: &str) -> Option<String> {
    let rest = location_context
        .split_once(": ")
        .map(|(_, rest)| rest)
        .unwrap_or(location_context)
        .trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

/// Gate + search + message rendering. Never fails: any problem yields "".
pub struct WebLookup {
    capability: Arc<dyn SearchCapability>,
    timeout: Duration,
}

impl WebLookup {
    pub fn new(capability: Arc<dyn SearchCapability>, timeout: Duration) -> Self {
        Self {
            capability,
            timeout,
        }
    }

    pub async fn lookup(&self, text: &str, location_context: &str) -> String {
        if !should_augment(text) {
            return String::new();
        }

        let terms = search_terms(text);
        if terms.is_empty() {
            return String::new();
        }

        let query = SearchQuery {
            terms,
            locality: locality_from(location_context),
        };

        let outcome = match tokio::time::timeout(self.timeout, self.capability.search(&query)).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(SearchError::Disabled)) => return String::new(),
            Ok(Err(e)) => {
                warn!(provider = self.capability.provider_name(), error = %e, "Web lookup failed");
                return String::new();
            }
            Err(_) => {
                warn!(
                    provider = self.capability.provider_name(),
                    timeout_secs = self.timeout.as_secs(),
                    "Web lookup timed out"
                );
                return String::new();
            }
        };

        debug!(
            provider = self.capability.provider_name(),
            terms = %query.terms,
            hits = outcome.hits,
            "Web lookup complete"
        );

        if outcome.hits == 0 {
            return format!("Web context: No specific information found for '{}'", query.terms);
        }

        match outcome.top_snippet.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(snippet) => format!(
                "Web context: Found related information for '{}': {}",
                query.terms, snippet
            ),
            None => format!("Web context: Found related information for '{}'", query.terms),
        }
    }
}

// ============================================================================
// Public API directory (placeholder integration)
// ============================================================================

#[derive(Deserialize)]
struct PublicApisResponse {
    #[serde(default)]
    count: usize,
    #[serde(default)]
    entries: Option<Vec<PublicApiEntry>>,
}

#[derive(Deserialize)]
struct PublicApiEntry {
    #[serde(rename = "Description", default)]
    description: Option<String>,
}

/// Title lookup against the public API directory
pub struct PublicApisSearch {
    http: Client,
    base_url: String,
}

impl PublicApisSearch {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, PUBLIC_APIS_URL.to_string())
    }

    pub fn with_base_url(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl SearchCapability for PublicApisSearch {
    async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, SearchError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("title", query.terms.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }

        let body: PublicApisResponse = response.json().await?;
        let entries = body.entries.unwrap_or_default();

        Ok(SearchOutcome {
            hits: body.count.max(entries.len()),
            top_snippet: entries.into_iter().find_map(|e| e.description),
        })
    }

    fn provider_name(&self) -> &str {
        "PublicApis"
    }
}

// ============================================================================
// Brave web search
// ============================================================================

#[derive(Deserialize)]
struct BraveSearchResponse {
    web: Option<BraveWebResults>,
}

#[derive(Deserialize)]
struct BraveWebResults {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Deserialize)]
struct BraveResult {
    #[serde(default)]
    description: Option<String>,
}

/// Brave search client
pub struct BraveSearch {
    api_key: String,
    http: Client,
}

impl BraveSearch {
    pub fn new(api_key: String, http: Client) -> Self {
        Self { api_key, http }
    }

    fn query_string(query: &SearchQuery) -> String {
        match &query.locality {
            Some(locality) => format!("{} {}", query.terms, locality),
            None => query.terms.clone(),
        }
    }
}

#[async_trait]
impl SearchCapability for BraveSearch {
    async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, SearchError> {
        let q = Self::query_string(query);
        let response = self
            .http
            .get(BRAVE_SEARCH_URL)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .query(&[("q", q.as_str()), ("count", "5"), ("safesearch", "moderate")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }

        let body: BraveSearchResponse = response.json().await?;
        let results = body.web.map(|w| w.results).unwrap_or_default();

        Ok(SearchOutcome {
            hits: results.len(),
            top_snippet: results.into_iter().find_map(|r| r.description),
        })
    }

    fn provider_name(&self) -> &str {
        "Brave"
    }
}

/// Used when web augmentation is switched off
pub struct DisabledSearch;

#[async_trait]
impl SearchCapability for DisabledSearch {
    async fn search(&self, _query: &SearchQuery) -> Result<SearchOutcome, SearchError> {
        Err(SearchError::Disabled)
    }

    fn provider_name(&self) -> &str {
        "Disabled"
    }
}
