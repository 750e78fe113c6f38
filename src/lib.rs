// src/lib.rs
// Beacon - emergency text classification service

pub mod classifier;
pub mod config;
pub mod dispatch;
pub mod enrichment;
pub mod error;
pub mod http;
pub mod llm;
pub mod web;

pub use error::{BeaconError, Result};
