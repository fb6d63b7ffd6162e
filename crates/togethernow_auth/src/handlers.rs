// --- File: crates/togethernow_auth/src/handlers.rs ---
use axum::{extract::State, http::StatusCode, response::Response};
use std::sync::Arc;
use togethernow_common::{validation_error, with_status, ApiResult, AppState, JsonBody};
use tracing::debug;

use crate::logic::{authenticate_user, register_user, LoginRequest, SignupRequest};
use crate::recaptcha::RecaptchaVerifier;

/// Shared state of the auth routes.
#[derive(Clone)]
pub struct AuthState {
    pub app: Arc<AppState>,
    pub recaptcha: RecaptchaVerifier,
}

/// Handler for `POST /auth/signup`.
pub async fn signup_handler(
    State(state): State<Arc<AuthState>>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> ApiResult<Response> {
    if !state.recaptcha.verify(request.captcha_token.as_deref()).await {
        return Err(validation_error("Invalid CAPTCHA"));
    }
    let services = state.app.services()?;

    debug!("Signing up {:?}", request.email);
    let token = register_user(services, &request).await?;
    Ok(with_status(StatusCode::CREATED, token))
}

/// Handler for `POST /auth/login`.
pub async fn login_handler(
    State(state): State<Arc<AuthState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<Response> {
    if !state.recaptcha.verify(request.captcha_token.as_deref()).await {
        return Err(validation_error("Invalid CAPTCHA"));
    }
    let services = state.app.services()?;

    let token = authenticate_user(services, &request).await?;
    Ok(with_status(StatusCode::OK, token))
}
