// src/http.rs
// Shared HTTP client for all outbound capability calls

use std::time::Duration;

/// Default timeout for a single model call
pub const MODEL_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for best-effort enrichment lookups (web search, geocoding)
pub const ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// User agent sent to every outbound service (Nominatim requires one)
pub const USER_AGENT: &str = concat!("beacon/", env!("CARGO_PKG_VERSION"));

/// Create the shared HTTP client with appropriate defaults.
///
/// Built once at startup and cloned into every capability. Per-request
/// timeouts are layered on top by the callers.
pub fn create_shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(MODEL_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(10)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
