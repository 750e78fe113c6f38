// src/classifier/mod.rs
// Classification pipeline: sanitize, gather context, prompt, invoke

pub mod context;
pub mod invoke;
pub mod parse;
pub mod prompt;
pub mod sanitize;
pub mod types;
pub mod validation;

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument};

use crate::enrichment::{LocationInfo, WebLookup};
use crate::error::{BeaconError, Result};
use crate::http::MODEL_TIMEOUT;
use crate::llm::ModelCapability;

pub use invoke::{MAX_PARSE_ATTEMPTS, invoke};
pub use parse::{ParseError, parse_response};
pub use types::{Classification, ClassificationRequest, FallbackResult, Location};

/// Minimum meaningful message length, checked before and after sanitizing
pub const MIN_TEXT_CHARS: usize = 5;

pub const TOO_SHORT_MESSAGE: &str = "Text is too short for classification";

/// The whole classification path for one request. Holds only shared,
/// read-only capabilities so one instance serves every request.
pub struct Classifier {
    model: Arc<dyn ModelCapability>,
    web: WebLookup,
    location_info: LocationInfo,
    model_timeout: Duration,
    strict_input: bool,
}

impl Classifier {
    pub fn new(model: Arc<dyn ModelCapability>, web: WebLookup, location_info: LocationInfo) -> Self {
        Self {
            model,
            web,
            location_info,
            model_timeout: MODEL_TIMEOUT,
            strict_input: false,
        }
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    /// Reject links and command-like content before anything else runs
    pub fn with_strict_input(mut self, strict: bool) -> Self {
        self.strict_input = strict;
        self
    }

    pub fn model_name(&self) -> String {
        self.model.model_name()
    }

    #[instrument(skip(self, request), fields(user_id = request.user_id.as_deref().unwrap_or("-")))]
    pub async fn classify(&self, request: &ClassificationRequest) -> Result<Classification> {
        if is_too_short(&request.text) {
            return Err(BeaconError::InvalidInput(TOO_SHORT_MESSAGE.to_string()));
        }

        if self.strict_input
            && let Some(reason) = validation::validate_message(&request.text)
        {
            return Err(BeaconError::InvalidInput(reason.to_string()));
        }

        let sanitized = sanitize::sanitize(&request.text);
        if is_too_short(&sanitized) {
            return Err(BeaconError::InvalidInput(TOO_SHORT_MESSAGE.to_string()));
        }

        let started = Instant::now();
        let location = request.location.as_ref();
        let time_ctx = context::format_time(request.timestamp.as_ref());
        let plain_location = context::format_location(location, "");

        let geocode = async {
            match context::coordinates_for_lookup(location) {
                Some((lat, lon)) => self.location_info.lookup(lat, lon).await,
                None => String::new(),
            }
        };
        let (web_ctx, geocode_note) =
            tokio::join!(self.web.lookup(&sanitized, &plain_location), geocode);

        let location_ctx = if geocode_note.is_empty() {
            plain_location
        } else {
            context::format_location(location, &geocode_note)
        };

        let segments = prompt::build_prompt(
            prompt::SYSTEM_PROMPT,
            &sanitized,
            &time_ctx,
            &location_ctx,
            &web_ctx,
        );

        let result = invoke(self.model.as_ref(), &segments, &sanitized, self.model_timeout).await?;

        info!(
            model = %self.model.model_name(),
            status = result.status_label(),
            has_web_context = !web_ctx.is_empty(),
            has_location = !location_ctx.is_empty(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Classification complete"
        );

        Ok(result)
    }
}

fn is_too_short(text: &str) -> bool {
    text.trim().chars().count() < MIN_TEXT_CHARS
}
