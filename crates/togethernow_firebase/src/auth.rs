//! OAuth2 access tokens for the Firebase REST APIs.
//!
//! Tokens come from the service account via yup-oauth2 and are cached until
//! shortly before they expire. Emulators accept any bearer token, which is
//! what [`StaticTokenProvider`] is for.

use std::time::{Duration, Instant};
use togethernow_common::services::BoxFuture;
use tokio::sync::RwLock;
use tracing::debug;
use yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey};

use crate::error::FirebaseError;

/// Scopes needed by Firestore and the Identity Toolkit admin API.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/userinfo.email",
];

/// Google access tokens live one hour; refresh well before that.
const TOKEN_REUSE: Duration = Duration::from_secs(45 * 60);

/// Source of bearer tokens for outgoing requests.
pub trait AccessTokenProvider: Send + Sync {
    fn access_token(&self) -> BoxFuture<'_, String, FirebaseError>;
}

/// A fixed token.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl AccessTokenProvider for StaticTokenProvider {
    fn access_token(&self) -> BoxFuture<'_, String, FirebaseError> {
        let token = self.token.clone();
        Box::pin(async move { Ok(token) })
    }
}

/// Tokens minted for a service account.
pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    cached: RwLock<Option<(String, Instant)>>,
}

impl ServiceAccountTokenProvider {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            cached: RwLock::new(None),
        }
    }

    async fn fetch(&self) -> Result<String, FirebaseError> {
        let auth = ServiceAccountAuthenticator::builder(self.key.clone())
            .build()
            .await
            .map_err(|e| FirebaseError::AuthError(e.to_string()))?;

        let token = auth
            .token(SCOPES)
            .await
            .map_err(|e| FirebaseError::AuthError(e.to_string()))?;

        match token.token() {
            Some(token) => Ok(token.to_string()),
            None => Err(FirebaseError::AuthError("No token available".to_string())),
        }
    }
}

impl AccessTokenProvider for ServiceAccountTokenProvider {
    fn access_token(&self) -> BoxFuture<'_, String, FirebaseError> {
        Box::pin(async move {
            if let Some((token, fetched)) = self.cached.read().await.as_ref() {
                if fetched.elapsed() < TOKEN_REUSE {
                    return Ok(token.clone());
                }
            }

            let mut cached = self.cached.write().await;
            // Another task may have refreshed while we waited for the lock.
            if let Some((token, fetched)) = cached.as_ref() {
                if fetched.elapsed() < TOKEN_REUSE {
                    return Ok(token.clone());
                }
            }

            debug!("Requesting a new access token for {}", self.key.client_email);
            let token = self.fetch().await?;
            *cached = Some((token.clone(), Instant::now()));
            Ok(token)
        })
    }
}
