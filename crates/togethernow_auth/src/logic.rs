// --- File: crates/togethernow_auth/src/logic.rs ---
use serde::{Deserialize, Serialize};
use togethernow_common::{
    log_result, models::collections, models::UserProfile, now_timestamp, validation_error,
    NewAccount, Services, TogetherError,
};
use togethernow_store::{to_fields, CollectionRef, SetMode};
use tracing::info;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Body of `POST /auth/signup`.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub captcha_token: Option<String>,
}

/// Body of `POST /auth/login`.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub captcha_token: Option<String>,
}

/// A custom token for `signInWithCustomToken`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TokenResponse {
    pub token: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Creates the account and its profile document, returning a custom token.
///
/// A failed profile write is logged and otherwise ignored: the account
/// exists at that point and the client can still sign in.
pub async fn register_user(
    services: &Services,
    request: &SignupRequest,
) -> Result<TokenResponse, TogetherError> {
    let (Some(email), Some(password)) = (non_empty(&request.email), non_empty(&request.password))
    else {
        return Err(validation_error("Email and password required"));
    };

    let account = NewAccount {
        email: email.trim().to_string(),
        password: password.to_string(),
        display_name: request.name.clone(),
    };
    let uid = services.identity.create_user(&account).await?;
    let token = services.identity.create_custom_token(&uid).await?;

    let profile = UserProfile {
        name: request.name.clone(),
        email: Some(account.email.clone()),
        created_at: Some(now_timestamp()),
        bio: String::new(),
        title: String::new(),
    };
    let _ = log_result(
        write_profile(services, &uid, &profile).await,
        &format!("Created profile for {}", uid),
        "Error creating user doc",
    );

    Ok(TokenResponse { token })
}

async fn write_profile(
    services: &Services,
    uid: &str,
    profile: &UserProfile,
) -> Result<(), TogetherError> {
    let doc = CollectionRef::root(collections::USERS)?.doc(uid)?;
    services
        .store
        .set(&doc, to_fields(profile)?, SetMode::Overwrite)
        .await?;
    Ok(())
}

/// Checks the password and returns a custom token for the account.
pub async fn authenticate_user(
    services: &Services,
    request: &LoginRequest,
) -> Result<TokenResponse, TogetherError> {
    let invalid = || TogetherError::InvalidCredentials("Invalid email or password".to_string());
    let email = non_empty(&request.email).ok_or_else(invalid)?;
    let password = non_empty(&request.password).ok_or_else(invalid)?;

    let uid = services
        .identity
        .sign_in_with_password(email.trim(), password)
        .await?;
    let token = services.identity.create_custom_token(&uid).await?;
    info!("User {} logged in", uid);
    Ok(TokenResponse { token })
}
