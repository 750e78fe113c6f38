// src/error.rs
// Standardized error types for Beacon

use thiserror::Error;

use crate::llm::ModelError;

/// Main error type for the classification pipeline
#[derive(Error, Debug)]
pub enum BeaconError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Startup refused: one or more configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Listener bind or serve failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Result using BeaconError
pub type Result<T> = std::result::Result<T, BeaconError>;

impl BeaconError {
    /// True when the caller sent something we refuse to process
    pub fn is_client_error(&self) -> bool {
        matches!(self, BeaconError::InvalidInput(_))
    }
}
