// src/enrichment/mod.rs
// Best-effort prompt enrichment (web context, reverse geocoding).
// Nothing in here returns an error to the caller: every failure becomes "".

pub mod gate;
pub mod geocode;
pub mod web;

pub use gate::should_augment;
pub use geocode::{Geocoder, LocationInfo, NoGeocoder, NominatimGeocoder};
pub use web::{
    BraveSearch, DisabledSearch, PublicApisSearch, SearchCapability, SearchError, SearchOutcome,
    SearchQuery, WebLookup,
};
