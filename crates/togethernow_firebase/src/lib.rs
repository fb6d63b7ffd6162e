//! Firebase integration for TogetherNow
//!
//! REST clients for the two Firebase products the backend uses:
//!
//! * **Firebase Authentication**: ID-token verification, custom-token
//!   minting, account creation and password sign-in
//!   ([`FirebaseIdentityService`]).
//! * **Cloud Firestore**: a `DocumentStore` over the Firestore v1 REST API
//!   ([`FirestoreStore`]).
//!
//! Both authenticate with OAuth2 access tokens minted for the service
//! account, see [`auth`].

pub mod auth;
pub mod credentials;
pub mod custom_token;
pub mod error;
pub mod firestore;
pub mod id_token;
pub mod identity;

pub use auth::{AccessTokenProvider, ServiceAccountTokenProvider, StaticTokenProvider};
pub use custom_token::CustomTokenSigner;
pub use error::FirebaseError;
pub use firestore::FirestoreStore;
pub use identity::FirebaseIdentityService;

use std::sync::Arc;
use togethernow_common::{shared_client, Services};
use togethernow_config::FirebaseConfig;
use tracing::{info, warn};

/// Builds the Firebase-backed services from configuration.
///
/// With `firebase.access_token` set (emulators) the service-account key is
/// optional; without a key, custom tokens cannot be minted.
///
/// # Errors
///
/// Returns an error if the key cannot be loaded or no project id is known.
pub async fn connect(config: &FirebaseConfig) -> Result<Services, FirebaseError> {
    let static_token = config.access_token.as_deref().filter(|t| !t.is_empty());
    let (key, tokens): (_, Arc<dyn AccessTokenProvider>) = match static_token {
        Some(token) => {
            let key = credentials::load_service_account(config)
                .await
                .map_err(|e| warn!("Continuing without a service account key: {}", e))
                .ok();
            let tokens: Arc<dyn AccessTokenProvider> = Arc::new(StaticTokenProvider::new(token));
            (key, tokens)
        }
        None => {
            let key = credentials::load_service_account(config).await?;
            let tokens: Arc<dyn AccessTokenProvider> =
                Arc::new(ServiceAccountTokenProvider::new(key.clone()));
            (Some(key), tokens)
        }
    };

    let project_id = credentials::resolve_project_id(config, key.as_ref())?;
    let signer = key
        .as_ref()
        .map(CustomTokenSigner::from_service_account)
        .transpose()?;

    let store = FirestoreStore::new(config, project_id.clone(), tokens.clone())?;
    let identity =
        FirebaseIdentityService::new(shared_client(), config, project_id.clone(), tokens, signer)?;

    info!("Firebase services ready for project {}", project_id);
    Ok(Services {
        store: Arc::new(store),
        identity: Arc::new(identity),
    })
}
