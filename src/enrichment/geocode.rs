// src/enrichment/geocode.rs
// Reverse geocoding for bare GPS coordinates

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const NOMINATIM_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Describe a coordinate pair; `None` when nothing useful is known
    async fn describe(&self, latitude: f64, longitude: f64) -> Option<String>;
    fn provider_name(&self) -> &str;
}

#[derive(Deserialize)]
struct NominatimResponse {
    display_name: Option<String>,
}

/// OpenStreetMap Nominatim reverse lookup
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, NOMINATIM_REVERSE_URL.to_string())
    }

    pub fn with_base_url(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn describe(&self, latitude: f64, longitude: f64) -> Option<String> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("zoom", "16".to_string()),
            ])
            .send()
            .await
            .map_err(|e| debug!(error = %e, "Nominatim request failed"))
            .ok()?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Nominatim returned an error status");
            return None;
        }

        let body: NominatimResponse = response
            .json()
            .await
            .map_err(|e| debug!(error = %e, "Nominatim response unreadable"))
            .ok()?;

        body.display_name.filter(|name| !name.trim().is_empty())
    }

    fn provider_name(&self) -> &str {
        "Nominatim"
    }
}

/// Used when geocoding is switched off
pub struct NoGeocoder;

#[async_trait]
impl Geocoder for NoGeocoder {
    async fn describe(&self, _latitude: f64, _longitude: f64) -> Option<String> {
        None
    }

    fn provider_name(&self) -> &str {
        "Disabled"
    }
}

/// Timeout-bounded geocoding that collapses every failure to ""
pub struct LocationInfo {
    geocoder: Arc<dyn Geocoder>,
    timeout: Duration,
}

impl LocationInfo {
    pub fn new(geocoder: Arc<dyn Geocoder>, timeout: Duration) -> Self {
        Self { geocoder, timeout }
    }

    pub async fn lookup(&self, latitude: f64, longitude: f64) -> String {
        match tokio::time::timeout(self.timeout, self.geocoder.describe(latitude, longitude)).await {
            Ok(Some(description)) => format!("Near {}", description.trim()),
            Ok(None) => String::new(),
            Err(_) => {
                warn!(
                    provider = self.geocoder.provider_name(),
                    timeout_secs = self.timeout.as_secs(),
                    "Geocoding timed out"
                );
                String::new()
            }
        }
    }
}
