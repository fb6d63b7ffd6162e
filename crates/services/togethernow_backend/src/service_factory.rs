// --- File: crates/services/togethernow_backend/src/service_factory.rs ---
//! Builds the services behind the routes from the configuration.
//!
//! `firebase` talks to Firebase Auth and Cloud Firestore; `local` keeps
//! everything in memory for offline development.

use std::sync::Arc;
use togethernow_auth::LocalIdentityService;
use togethernow_common::{log_error, log_result, AppState, Services, TogetherError};
use togethernow_config::{AppConfig, BackendKind};
use togethernow_store::MemoryStore;
use tracing::{info, warn};

use crate::seed::seed_demo_events;

/// In-memory store and identity provider.
pub fn local_services(config: &AppConfig) -> Services {
    Services {
        store: Arc::new(MemoryStore::new()),
        identity: Arc::new(LocalIdentityService::new(&config.local_identity)),
    }
}

/// Connects to the configured backend.
///
/// # Errors
///
/// Fails when the Firebase credentials cannot be loaded.
pub async fn connect_services(config: &AppConfig) -> Result<Services, TogetherError> {
    match config.backend {
        BackendKind::Firebase => {
            info!("Initializing Firebase services...");
            togethernow_firebase::connect(&config.firebase)
                .await
                .map_err(|e| TogetherError::ConfigError(e.to_string()))
        }
        BackendKind::Local => {
            warn!("Using the local in-memory backend; data is lost on restart");
            Ok(local_services(config))
        }
    }
}

/// The application state for the server.
///
/// Never fails: if the backend cannot be initialized the state records why,
/// `/health` reports it and data routes answer with an error.
pub async fn build_state(config: Arc<AppConfig>) -> AppState {
    let services = match connect_services(&config).await {
        Ok(services) => services,
        Err(e) => {
            log_error(&e, "Backend initialization failed");
            let reason = match e {
                TogetherError::ConfigError(reason) => reason,
                other => other.to_string(),
            };
            return AppState::failed(config, reason);
        }
    };

    if config.seed_demo_data {
        if config.backend == BackendKind::Local {
            let _ = log_result(
                seed_demo_events(services.store.as_ref()).await,
                "Seeded demo events",
                "Failed to seed demo events",
            );
        } else {
            warn!("seed_demo_data only applies to the local backend; use the seed_data binary");
        }
    }

    AppState::new(config, services)
}
