//! Firebase Authentication as an `IdentityService`.
//!
//! Accounts are created through the Identity Toolkit admin API (OAuth
//! bearer token) and passwords checked with `accounts:signInWithPassword`
//! (web API key), the same endpoint the browser SDK uses.

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use togethernow_common::{
    services::BoxFuture, AuthUser, IdentityError, IdentityService, NewAccount,
};
use togethernow_config::FirebaseConfig;
use tracing::{info, warn};

use crate::auth::AccessTokenProvider;
use crate::custom_token::CustomTokenSigner;
use crate::error::{api_error, FirebaseError};
use crate::id_token::IdTokenVerifier;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
}

pub struct FirebaseIdentityService {
    client: Client,
    auth_endpoint: Url,
    project_id: String,
    api_key: Option<String>,
    tokens: Arc<dyn AccessTokenProvider>,
    verifier: IdTokenVerifier,
    signer: Option<CustomTokenSigner>,
}

impl FirebaseIdentityService {
    pub fn new(
        client: Client,
        config: &FirebaseConfig,
        project_id: impl Into<String>,
        tokens: Arc<dyn AccessTokenProvider>,
        signer: Option<CustomTokenSigner>,
    ) -> Result<Self, FirebaseError> {
        let auth_endpoint = Url::parse(&config.auth_endpoint).map_err(|e| {
            FirebaseError::ConfigError(format!(
                "Invalid auth_endpoint {}: {}",
                config.auth_endpoint, e
            ))
        })?;
        let project_id = project_id.into();
        Ok(Self {
            verifier: IdTokenVerifier::new(client.clone(), &config.jwks_url, &project_id),
            client,
            auth_endpoint,
            project_id,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            tokens,
            signer,
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, FirebaseError> {
        let mut url = self.auth_endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FirebaseError::ConfigError(format!("{} cannot be a base URL", self.auth_endpoint))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn create_account(&self, account: &NewAccount) -> Result<String, FirebaseError> {
        let url = self.url(&["v1", "projects", self.project_id.as_str(), "accounts"])?;
        let token = self.tokens.access_token().await?;

        let mut body = json!({ "email": account.email, "password": account.password });
        if let Some(name) = &account.display_name {
            body["displayName"] = json!(name);
        }

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let created: AccountResponse = response.json().await?;
        info!("Created account {}", created.local_id);
        Ok(created.local_id)
    }

    async fn check_password(&self, email: &str, password: &str) -> Result<String, IdentityError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| IdentityError::Config("FIREBASE_API_KEY is not set".to_string()))?;
        let mut url = self.url(&["v1", "accounts:signInWithPassword"])?;
        url.query_pairs_mut().append_pair("key", api_key);

        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            warn!("Password sign-in failed: {}", err);
            return Err(IdentityError::InvalidCredentials);
        }
        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;
        Ok(account.local_id)
    }
}

/// Identity Toolkit answers with codes such as `EMAIL_EXISTS` or
/// `WEAK_PASSWORD : Password should be at least 6 characters`.
fn describe_rejection(code: &str) -> String {
    let (code, detail) = match code.split_once(" : ") {
        Some((code, detail)) => (code.trim(), Some(detail.trim())),
        None => (code.trim(), None),
    };
    match (code, detail) {
        ("EMAIL_EXISTS", _) => "The email address is already in use by another account".to_string(),
        ("INVALID_EMAIL", _) => "The email address is badly formatted".to_string(),
        ("WEAK_PASSWORD", Some(detail)) => detail.to_string(),
        ("WEAK_PASSWORD", None) => "Password should be at least 6 characters".to_string(),
        ("MISSING_PASSWORD", _) => "A password is required".to_string(),
        (other, _) => other.to_string(),
    }
}

impl IdentityService for FirebaseIdentityService {
    fn verify_id_token<'a>(&'a self, token: &'a str) -> BoxFuture<'a, AuthUser, IdentityError> {
        Box::pin(async move { Ok(self.verifier.verify(token).await?) })
    }

    fn create_user<'a>(&'a self, account: &'a NewAccount) -> BoxFuture<'a, String, IdentityError> {
        Box::pin(async move {
            self.create_account(account).await.map_err(|e| match e {
                FirebaseError::ApiError { status, message } if status < 500 => {
                    IdentityError::Rejected(describe_rejection(&message))
                }
                other => other.into(),
            })
        })
    }

    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, String, IdentityError> {
        Box::pin(self.check_password(email, password))
    }

    fn create_custom_token<'a>(&'a self, uid: &'a str) -> BoxFuture<'a, String, IdentityError> {
        Box::pin(async move {
            let signer = self.signer.as_ref().ok_or_else(|| {
                IdentityError::Config("No service account key to sign custom tokens".to_string())
            })?;
            signer
                .sign(uid)
                .map_err(|e| IdentityError::Unavailable(e.to_string()))
        })
    }
}
