// --- File: crates/togethernow_common/src/state.rs ---
use std::sync::Arc;
use togethernow_config::AppConfig;
use togethernow_store::DocumentStore;

use crate::error::TogetherError;
use crate::services::IdentityService;

/// The backends every feature router talks to.
#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityService>,
}

/// Application state shared across all routes.
///
/// Initialization of the backends may fail (missing key file, bad
/// credentials). The server still starts in that case; routes needing the
/// backends answer with an error and `/health` reports the reason.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    services: Result<Services, String>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, services: Services) -> Self {
        Self {
            config,
            services: Ok(services),
        }
    }

    /// State for a server whose backends failed to initialize.
    pub fn failed(config: Arc<AppConfig>, reason: impl Into<String>) -> Self {
        Self {
            config,
            services: Err(reason.into()),
        }
    }

    pub fn services(&self) -> Result<&Services, TogetherError> {
        self.services
            .as_ref()
            .map_err(|reason| TogetherError::Unavailable(reason.clone()))
    }

    /// Why initialization failed, if it did.
    pub fn init_error(&self) -> Option<&str> {
        self.services.as_ref().err().map(String::as_str)
    }
}
