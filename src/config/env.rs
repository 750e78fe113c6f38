// src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use std::time::Duration;
use tracing::{debug, info, warn, Level};

use crate::classifier::MAX_PARSE_ATTEMPTS;
use crate::error::{BeaconError, Result};
use crate::http::{ENRICHMENT_TIMEOUT, MODEL_TIMEOUT};
use crate::llm::GEMINI_KEY_VAR;

/// Default Gemini model used for classification
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Headroom above the pipeline budget for everything that is not a wait
pub const REQUEST_MARGIN: Duration = Duration::from_secs(10);

/// Worst-case time one classification may take: the enrichment lookups run
/// to their timeout, then every parse attempt runs to the model timeout.
pub fn pipeline_budget(model_timeout: Duration, web_timeout: Duration) -> Duration {
    model_timeout.saturating_mul(MAX_PARSE_ATTEMPTS) + web_timeout
}

/// Router timeout used when BEACON_REQUEST_TIMEOUT_SECS is unset
pub fn default_request_timeout(model_timeout: Duration, web_timeout: Duration) -> Duration {
    pipeline_budget(model_timeout, web_timeout) + REQUEST_MARGIN
}

/// Log level from BEACON_LOG_LEVEL alone, so the subscriber can be
/// installed before the rest of the configuration is read
pub fn log_level_from_env() -> Level {
    parse_level(read_key(&env_source, "BEACON_LOG_LEVEL").as_deref())
}

fn parse_level(raw: Option<&str>) -> Level {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(Level::INFO)
}

/// API keys loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Gemini/Google API key (GEMINI_API_KEY or GOOGLE_API_KEY)
    pub gemini: Option<String>,
    /// Brave Search API key (BRAVE_API_KEY)
    pub brave: Option<String>,
}

impl ApiKeys {
    fn from_source(source: &dyn Fn(&str) -> Option<String>) -> Self {
        let gemini = read_key(source, GEMINI_KEY_VAR).or_else(|| read_key(source, "GOOGLE_API_KEY"));
        let brave = read_key(source, "BRAVE_API_KEY");

        let keys = Self { gemini, brave };
        keys.log_status();
        keys
    }

    /// Check if the model capability can be reached
    pub fn has_model(&self) -> bool {
        self.gemini.is_some()
    }

    /// Check if genuine web search is available (requires Brave key)
    pub fn has_web_search(&self) -> bool {
        self.brave.is_some()
    }

    /// Log which API keys are available (without exposing values)
    fn log_status(&self) {
        let available = self.available();
        if available.is_empty() {
            warn!("No API keys configured - classification requests will fail");
        } else {
            debug!(keys = ?available, "API keys loaded");
        }
    }

    fn available(&self) -> Vec<&'static str> {
        let mut available = Vec::new();
        if self.gemini.is_some() {
            available.push("Gemini");
        }
        if self.brave.is_some() {
            available.push("Brave Search");
        }
        available
    }

    /// Get a summary of available providers
    pub fn summary(&self) -> String {
        let available = self.available();
        if available.is_empty() {
            "None".to_string()
        } else {
            available.join(", ")
        }
    }
}

/// Outcome of checking an `EnvConfig`. Errors block startup, warnings
/// only mean degraded behavior.
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn fail(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// `BeaconError::Config` naming every error, or the validation itself
    /// (warnings included) when startup may proceed
    pub fn into_result(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(BeaconError::Config(self.errors.join("; ")))
        }
    }

    /// One line per finding, errors first
    pub fn report(&self) -> String {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return "Configuration OK".to_string();
        }

        self.errors
            .iter()
            .map(|e| format!("error: {}", e))
            .chain(self.warnings.iter().map(|w| format!("warning: {}", w)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// API keys for the model and search capabilities
    pub api_keys: ApiKeys,
    /// Gemini model name (BEACON_MODEL)
    pub model: String,
    /// Per-call model timeout (BEACON_MODEL_TIMEOUT_SECS)
    pub model_timeout: Duration,
    /// Extra HTTP attempts on 429/5xx/connect failures (BEACON_MODEL_TRANSPORT_RETRIES)
    pub model_transport_retries: u32,
    /// Web augmentation on/off (BEACON_WEB_LOOKUP)
    pub web_lookup: bool,
    /// Web lookup timeout (BEACON_WEB_TIMEOUT_SECS)
    pub web_timeout: Duration,
    /// Reverse geocoding of bare coordinates (BEACON_GEOCODING)
    pub geocoding: bool,
    /// Reject links and shell-like input before classification (BEACON_STRICT_INPUT)
    pub strict_input: bool,
    /// Whole-request timeout applied by the router (BEACON_REQUEST_TIMEOUT_SECS).
    /// Defaults to the pipeline budget plus `REQUEST_MARGIN`.
    pub request_timeout: Duration,
    /// Log level (BEACON_LOG_LEVEL); unparsable values are kept for validation
    pub log_level: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            api_keys: ApiKeys::default(),
            model: DEFAULT_MODEL.to_string(),
            model_timeout: MODEL_TIMEOUT,
            model_transport_retries: 0,
            web_lookup: true,
            web_timeout: ENRICHMENT_TIMEOUT,
            geocoding: true,
            strict_input: false,
            request_timeout: default_request_timeout(MODEL_TIMEOUT, ENRICHMENT_TIMEOUT),
            log_level: "info".to_string(),
        }
    }
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");
        Self::from_source(&env_source)
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_source(source: &dyn Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let model_timeout =
            parse_secs(source, "BEACON_MODEL_TIMEOUT_SECS").unwrap_or(defaults.model_timeout);
        let web_timeout =
            parse_secs(source, "BEACON_WEB_TIMEOUT_SECS").unwrap_or(defaults.web_timeout);

        Self {
            api_keys: ApiKeys::from_source(source),
            model: read_key(source, "BEACON_MODEL").unwrap_or(defaults.model),
            model_timeout,
            model_transport_retries: source("BEACON_MODEL_TRANSPORT_RETRIES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.model_transport_retries),
            web_lookup: parse_bool(source, "BEACON_WEB_LOOKUP").unwrap_or(defaults.web_lookup),
            web_timeout,
            geocoding: parse_bool(source, "BEACON_GEOCODING").unwrap_or(defaults.geocoding),
            strict_input: parse_bool(source, "BEACON_STRICT_INPUT")
                .unwrap_or(defaults.strict_input),
            request_timeout: parse_secs(source, "BEACON_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| default_request_timeout(model_timeout, web_timeout)),
            log_level: read_key(source, "BEACON_LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    /// Longest a single classification may legitimately take
    pub fn pipeline_budget(&self) -> Duration {
        pipeline_budget(self.model_timeout, self.web_timeout)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::default();

        if !self.api_keys.has_model() {
            validation.warn(
                "No model API key configured. Set GEMINI_API_KEY; /classify will answer 503.",
            );
        }

        if self.web_lookup && !self.api_keys.has_web_search() {
            validation.warn(
                "BRAVE_API_KEY not set. Web context falls back to the public API directory.",
            );
        }

        if self.log_level.trim().parse::<Level>().is_err() {
            validation.warn(format!(
                "Unknown BEACON_LOG_LEVEL '{}'. Valid options: trace, debug, info, warn, error",
                self.log_level
            ));
        }

        if self.model_timeout.is_zero() {
            validation.fail("BEACON_MODEL_TIMEOUT_SECS must be greater than zero");
        }

        let budget = self.pipeline_budget();
        if self.request_timeout < budget {
            validation.fail(format!(
                "BEACON_REQUEST_TIMEOUT_SECS ({}s) is below the classification budget ({}s = {} attempts x {}s model timeout + {}s web timeout); slow answers would be cut off before the fallback",
                self.request_timeout.as_secs(),
                budget.as_secs(),
                MAX_PARSE_ATTEMPTS,
                self.model_timeout.as_secs(),
                self.web_timeout.as_secs()
            ));
        }

        validation
    }
}

fn env_source(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Read a single key, filtering empty values
fn read_key(source: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    source(name).filter(|k| !k.trim().is_empty())
}

fn parse_bool(source: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<bool> {
    let value = source(name)?.to_lowercase();
    match value.trim() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(var = name, value = %value, "Unrecognized boolean, using default");
            None
        }
    }
}

fn parse_secs(source: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<Duration> {
    source(name)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    // ============================================================================
    // ApiKeys
    // ============================================================================

    #[test]
    fn test_api_keys_summary() {
        let keys = ApiKeys::default();
        assert!(!keys.has_model());
        assert!(!keys.has_web_search());
        assert_eq!(keys.summary(), "None");
    }

    #[test]
    fn test_google_key_is_accepted_as_gemini_key() {
        let source = source_from(&[("GOOGLE_API_KEY", "g-key")]);
        let keys = ApiKeys::from_source(&source);
        assert_eq!(keys.gemini.as_deref(), Some("g-key"));
        assert_eq!(keys.summary(), "Gemini");
    }

    #[test]
    fn test_gemini_key_wins_over_google_key() {
        let source = source_from(&[("GEMINI_API_KEY", "primary"), ("GOOGLE_API_KEY", "secondary")]);
        let keys = ApiKeys::from_source(&source);
        assert_eq!(keys.gemini.as_deref(), Some("primary"));
    }

    #[test]
    fn test_blank_key_is_ignored() {
        let source = source_from(&[("GEMINI_API_KEY", "   ")]);
        assert!(!ApiKeys::from_source(&source).has_model());
    }

    // ============================================================================
    // EnvConfig
    // ============================================================================

    #[test]
    fn test_defaults_when_environment_empty() {
        let config = EnvConfig::from_source(&source_from(&[]));
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.model_timeout, MODEL_TIMEOUT);
        assert_eq!(config.model_transport_retries, 0);
        assert!(config.web_lookup);
        assert!(config.geocoding);
        assert!(!config.strict_input);
        assert_eq!(config.request_timeout, Duration::from_secs(3 * 30 + 5 + 10));
        assert_eq!(parse_level(Some(&config.log_level)), Level::INFO);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let source = source_from(&[
            ("BEACON_MODEL", "gemini-2.5-flash"),
            ("BEACON_MODEL_TIMEOUT_SECS", "12"),
            ("BEACON_MODEL_TRANSPORT_RETRIES", "2"),
            ("BEACON_WEB_LOOKUP", "off"),
            ("BEACON_WEB_TIMEOUT_SECS", "3"),
            ("BEACON_GEOCODING", "no"),
            ("BEACON_STRICT_INPUT", "1"),
            ("BEACON_LOG_LEVEL", "debug"),
        ]);
        let config = EnvConfig::from_source(&source);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.model_timeout, Duration::from_secs(12));
        assert_eq!(config.model_transport_retries, 2);
        assert!(!config.web_lookup);
        assert_eq!(config.web_timeout, Duration::from_secs(3));
        assert!(!config.geocoding);
        assert!(config.strict_input);
        assert_eq!(config.request_timeout, Duration::from_secs(3 * 12 + 3 + 10));
        assert_eq!(parse_level(Some(&config.log_level)), Level::DEBUG);
    }

    #[test]
    fn test_unparsable_values_fall_back_to_defaults() {
        let source = source_from(&[
            ("BEACON_MODEL_TIMEOUT_SECS", "soon"),
            ("BEACON_WEB_LOOKUP", "maybe"),
        ]);
        let config = EnvConfig::from_source(&source);
        assert_eq!(config.model_timeout, MODEL_TIMEOUT);
        assert!(config.web_lookup);
    }

    // ============================================================================
    // Validation
    // ============================================================================

    #[test]
    fn test_validation_no_keys() {
        let validation = EnvConfig::default().validate();
        assert!(validation.is_valid()); // Warnings don't make it invalid
        assert!(validation.warnings.iter().any(|w| w.contains("GEMINI_API_KEY")));
    }

    #[test]
    fn test_validation_zero_model_timeout_is_error() {
        let config = EnvConfig {
            model_timeout: Duration::ZERO,
            ..EnvConfig::default()
        };
        let validation = config.validate();
        assert!(!validation.is_valid());
        assert!(validation.report().starts_with("error: "));
    }

    #[test]
    fn test_validation_bad_log_level_warns() {
        let config = EnvConfig {
            log_level: "loud".to_string(),
            ..EnvConfig::default()
        };
        let validation = config.validate();
        assert!(validation.warnings.iter().any(|w| w.contains("loud")));
    }

    #[test]
    fn test_report_ok() {
        assert_eq!(ConfigValidation::default().report(), "Configuration OK");
    }

    #[test]
    fn test_default_request_timeout_covers_every_attempt() {
        let config = EnvConfig::default();
        assert!(config.request_timeout >= config.pipeline_budget());
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_request_timeout_below_budget_is_error() {
        let source = source_from(&[("BEACON_REQUEST_TIMEOUT_SECS", "60")]);
        let validation = EnvConfig::from_source(&source).validate();
        assert!(!validation.is_valid());
        assert!(validation.errors[0].contains("95s"));

        let err = validation.into_result().unwrap_err();
        assert!(matches!(err, BeaconError::Config(ref msg) if msg.contains("BEACON_REQUEST_TIMEOUT_SECS")));
    }

    #[test]
    fn test_explicit_request_timeout_is_kept() {
        let source = source_from(&[("BEACON_REQUEST_TIMEOUT_SECS", "300")]);
        assert_eq!(
            EnvConfig::from_source(&source).request_timeout,
            Duration::from_secs(300)
        );
    }

    #[test]
    fn test_warnings_do_not_block_startup() {
        let validation = EnvConfig::default().validate();
        assert!(!validation.warnings.is_empty());
        let validation = validation.into_result().unwrap();
        assert!(validation.report().contains("warning: "));
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_level(None), Level::INFO);
        assert_eq!(parse_level(Some(" warn ")), Level::WARN);
        assert_eq!(parse_level(Some("loud")), Level::INFO);
    }
}
