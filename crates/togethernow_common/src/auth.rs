// --- File: crates/togethernow_common/src/auth.rs ---
//! The authenticated caller of a protected route.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::error::TogetherError;
use crate::state::AppState;

/// Claims of a verified ID token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthUser {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: None,
            email: None,
        }
    }

    /// The token's `name` claim, or `fallback`.
    pub fn display_name(&self, fallback: &str) -> String {
        self.name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// The token from an `Authorization` header, with or without `Bearer `.
pub fn token_from_header(value: &str) -> Option<&str> {
    let value = value.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = TogetherError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = Arc::<AppState>::from_ref(state);

        let services = app.services().map_err(|e| {
            warn!("Rejecting {}: {}", parts.uri.path(), e);
            TogetherError::Unauthorized
        })?;

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(token_from_header)
            .ok_or(TogetherError::Unauthorized)?;

        services
            .identity
            .verify_id_token(token)
            .await
            .map_err(|e| {
                warn!("Token verification failed for {}: {}", parts.uri.path(), e);
                TogetherError::Unauthorized
            })
    }
}
