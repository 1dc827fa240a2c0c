// Application state module
// Read-only state shared across all request handler tasks

use std::sync::Arc;

use super::types::Config;
use crate::icons::IconResolver;

/// Application state
///
/// Everything here is immutable after startup, so concurrent request
/// handlers share it through `Arc` without any locking.
pub struct AppState {
    pub config: Config,
    pub resolver: Arc<dyn IconResolver>,
    /// Deployment region for the version banner, detected once at startup
    pub region: Option<String>,
}

impl AppState {
    pub fn new(config: Config, resolver: Arc<dyn IconResolver>, region: Option<String>) -> Self {
        Self {
            config,
            resolver,
            region,
        }
    }
}
