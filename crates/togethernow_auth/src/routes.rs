// --- File: crates/togethernow_auth/src/routes.rs ---
use axum::{routing::post, Router};
use std::sync::Arc;
use togethernow_common::AppState;

use crate::handlers::{login_handler, signup_handler, AuthState};
use crate::recaptcha::RecaptchaVerifier;

/// Creates a router containing the sign-up and login routes.
pub fn routes(app: Arc<AppState>) -> Router {
    let recaptcha = RecaptchaVerifier::new(&app.config.recaptcha);
    let state = Arc::new(AuthState { app, recaptcha });

    Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .with_state(state)
}
