// src/web/state.rs
// Web server state management

use std::sync::Arc;
use tracing::info;

use crate::classifier::Classifier;
use crate::config::EnvConfig;
use crate::enrichment::{
    BraveSearch, DisabledSearch, Geocoder, LocationInfo, NoGeocoder, NominatimGeocoder,
    PublicApisSearch, SearchCapability, WebLookup,
};
use crate::http::create_shared_client;
use crate::llm::{GeminiClient, ModelCapability, UnconfiguredModel};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Full classification pipeline, shared read-only by every request
    pub classifier: Arc<Classifier>,
}

impl AppState {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }

    /// Wire capabilities from configuration over one pooled HTTP client
    pub fn from_config(config: &EnvConfig) -> Self {
        let http = create_shared_client();

        let model: Arc<dyn ModelCapability> = match &config.api_keys.gemini {
            Some(key) => Arc::new(
                GeminiClient::with_http_client(
                    key.clone(),
                    config.model.clone(),
                    http.clone(),
                    config.model_timeout,
                )
                .with_transport_retries(config.model_transport_retries),
            ),
            None => Arc::new(UnconfiguredModel),
        };

        let search: Arc<dyn SearchCapability> = match (&config.api_keys.brave, config.web_lookup) {
            (_, false) => Arc::new(DisabledSearch),
            (Some(key), true) => Arc::new(BraveSearch::new(key.clone(), http.clone())),
            (None, true) => Arc::new(PublicApisSearch::new(http.clone())),
        };

        let geocoder: Arc<dyn Geocoder> = if config.geocoding {
            Arc::new(NominatimGeocoder::new(http))
        } else {
            Arc::new(NoGeocoder)
        };

        info!(
            model = %model.model_name(),
            search = search.provider_name(),
            geocoder = geocoder.provider_name(),
            strict_input = config.strict_input,
            "Capabilities configured"
        );

        let classifier = Classifier::new(
            model,
            WebLookup::new(search, config.web_timeout),
            LocationInfo::new(geocoder, config.web_timeout),
        )
        .with_model_timeout(config.model_timeout)
        .with_strict_input(config.strict_input);

        Self::new(classifier)
    }
}
