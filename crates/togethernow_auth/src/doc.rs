// --- File: crates/togethernow_auth/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]

use crate::logic::{LoginRequest, SignupRequest, TokenResponse};
use utoipa::OpenApi;

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body(content = SignupRequest, example = json!({
        "email": "ada@example.com",
        "password": "secret1",
        "name": "Ada",
        "captcha_token": "03AFcWeA..."
    })),
    responses(
        (status = 201, description = "Account created", body = TokenResponse),
        (status = 400, description = "Invalid CAPTCHA, missing fields or rejected by Firebase",
         example = json!({"error": "Invalid CAPTCHA"})),
        (status = 500, description = "Backend failed to initialize")
    ),
    tag = "Auth"
)]
fn doc_signup() {}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body(content = LoginRequest, example = json!({
        "email": "ada@example.com",
        "password": "secret1",
        "captcha_token": "03AFcWeA..."
    })),
    responses(
        (status = 200, description = "Custom token for signInWithCustomToken", body = TokenResponse),
        (status = 400, description = "Invalid CAPTCHA"),
        (status = 401, description = "Wrong email or password",
         example = json!({"error": "Invalid email or password"}))
    ),
    tag = "Auth"
)]
fn doc_login() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_signup, doc_login),
    components(schemas(SignupRequest, LoginRequest, TokenResponse)),
    tags((name = "Auth", description = "Account creation and login"))
)]
pub struct AuthApiDoc;
