use serde::Deserialize;
use thiserror::Error;
use togethernow_common::IdentityError;
use togethernow_store::StoreError;

/// Errors that can occur when talking to Firebase.
#[derive(Error, Debug)]
pub enum FirebaseError {
    /// Error while obtaining an OAuth2 access token
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error during HTTP request to a Firebase API
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Missing or unusable configuration
    #[error("Missing configuration: {0}")]
    ConfigError(String),

    /// Non-success answer from a Firebase API
    #[error("Firebase API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// A token could not be signed or failed verification
    #[error("Token error: {0}")]
    TokenError(String),

    /// A response body that does not have the expected shape
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl From<jsonwebtoken::errors::Error> for FirebaseError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        FirebaseError::TokenError(err.to_string())
    }
}

impl From<serde_json::Error> for FirebaseError {
    fn from(err: serde_json::Error) -> Self {
        FirebaseError::InvalidResponse(err.to_string())
    }
}

impl From<FirebaseError> for StoreError {
    fn from(err: FirebaseError) -> Self {
        match err {
            FirebaseError::ApiError { status: 404, message } => StoreError::NotFound(message),
            FirebaseError::ApiError { status, message } => StoreError::Backend { status, message },
            FirebaseError::RequestError(e) => StoreError::Connection(e.to_string()),
            FirebaseError::InvalidResponse(m) => StoreError::Serialization(m),
            other => StoreError::Other(other.to_string()),
        }
    }
}

impl From<FirebaseError> for IdentityError {
    fn from(err: FirebaseError) -> Self {
        match err {
            FirebaseError::TokenError(m) => IdentityError::InvalidToken(m),
            FirebaseError::ConfigError(m) => IdentityError::Config(m),
            FirebaseError::ApiError { status, message } if status < 500 => {
                IdentityError::Rejected(message)
            }
            other => IdentityError::Unavailable(other.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct GoogleErrorBody {
    error: GoogleErrorDetail,
}

#[derive(Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

/// Turns a non-success response into `FirebaseError::ApiError`, using the
/// `{"error": {"message": ...}}` envelope Google APIs answer with.
pub(crate) async fn api_error(response: reqwest::Response) -> FirebaseError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleErrorBody>(&text)
        .map(|body| body.error.message)
        .unwrap_or(text);
    FirebaseError::ApiError { status, message }
}
