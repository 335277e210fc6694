//! Registry client module
//!
//! Provides the HTTP client for the tribal registry.

mod client;
mod types;

pub use client::{validate_registry_url, RegistryClient, HEALTH_PATH, REQUEST_TIMEOUT_SECS};
pub use types::*;
