//! Service-account credentials.
//!
//! The key is taken from `firebase.credentials` (the JSON itself, usually
//! injected from `FIREBASE_CREDENTIALS`) when set, otherwise read from
//! `firebase.key_path`.

use std::path::Path;
use togethernow_config::FirebaseConfig;
use tracing::info;
use yup_oauth2::{parse_service_account_key, read_service_account_key, ServiceAccountKey};

use crate::error::FirebaseError;

/// Loads the service-account key named by the configuration.
///
/// # Errors
///
/// `FirebaseError::ConfigError` if neither source is configured or the key
/// cannot be read or parsed.
pub async fn load_service_account(config: &FirebaseConfig) -> Result<ServiceAccountKey, FirebaseError> {
    if let Some(json) = config.credentials.as_deref().filter(|s| !s.trim().is_empty()) {
        info!("Using Firebase credentials from configuration");
        return parse_service_account_key(json)
            .map_err(|e| FirebaseError::ConfigError(format!("Invalid service account JSON: {}", e)));
    }

    let key_path = config
        .key_path
        .as_deref()
        .ok_or_else(|| FirebaseError::ConfigError("Missing key_path in FirebaseConfig".to_string()))?;

    info!("Reading Firebase service account key from {}", key_path);
    read_service_account_key(Path::new(key_path))
        .await
        .map_err(|e| FirebaseError::ConfigError(format!("Cannot read {}: {}", key_path, e)))
}

/// The project id from the configuration, falling back to the key's.
pub fn resolve_project_id(
    config: &FirebaseConfig,
    key: Option<&ServiceAccountKey>,
) -> Result<String, FirebaseError> {
    config
        .project_id
        .clone()
        .filter(|p| !p.is_empty())
        .or_else(|| key.and_then(|k| k.project_id.clone()))
        .ok_or_else(|| FirebaseError::ConfigError("Missing Firebase project id".to_string()))
}
