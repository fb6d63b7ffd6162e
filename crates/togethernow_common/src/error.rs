// --- File: crates/togethernow_common/src/error.rs ---
use std::fmt;
use thiserror::Error;
use togethernow_store::StoreError;

use crate::services::IdentityError;

/// The error type returned by every TogetherNow route.
///
/// The `Display` text of client-facing variants is the message sent in the
/// `{"error": ...}` response body, so keep those messages user-readable.
#[derive(Error, Debug)]
pub enum TogetherError {
    /// Missing or invalid ID token
    #[error("Unauthorized")]
    Unauthorized,

    /// Error occurred during validation of the request
    #[error("{0}")]
    ValidationError(String),

    /// Wrong email or password
    #[error("{0}")]
    InvalidCredentials(String),

    /// The caller may not perform this action
    #[error("{0}")]
    PermissionDenied(String),

    /// Error occurred due to a resource not being found
    #[error("{0}")]
    NotFoundError(String),

    /// The identity provider rejected the request (e.g. email already in use)
    #[error("{0}")]
    IdentityError(String),

    /// Firebase could not be initialized at startup
    #[error("Backend failed to initialize: {0}")]
    Unavailable(String),

    /// Error occurred during an HTTP request to an external service
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred during a datastore operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for TogetherError {
    fn status_code(&self) -> u16 {
        match self {
            TogetherError::Unauthorized => 401,
            TogetherError::ValidationError(_) => 400,
            TogetherError::InvalidCredentials(_) => 401,
            TogetherError::PermissionDenied(_) => 403,
            TogetherError::NotFoundError(_) => 404,
            TogetherError::IdentityError(_) => 400,
            TogetherError::Unavailable(_) => 500,
            TogetherError::HttpError(_) => 502,
            TogetherError::DatabaseError(_) => 500,
            TogetherError::ConfigError(_) => 500,
            TogetherError::InternalError(_) => 500,
        }
    }
}

impl From<StoreError> for TogetherError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidPath(message) => TogetherError::ValidationError(message),
            StoreError::NotFound(_) => TogetherError::NotFoundError("Not found".to_string()),
            other => TogetherError::DatabaseError(other.to_string()),
        }
    }
}

impl From<IdentityError> for TogetherError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidToken(_) => TogetherError::Unauthorized,
            IdentityError::InvalidCredentials => {
                TogetherError::InvalidCredentials("Invalid email or password".to_string())
            }
            IdentityError::Rejected(message) => TogetherError::IdentityError(message),
            IdentityError::Unavailable(message) => TogetherError::HttpError(message),
            IdentityError::Config(message) => TogetherError::ConfigError(message),
        }
    }
}

impl From<reqwest::Error> for TogetherError {
    fn from(err: reqwest::Error) -> Self {
        TogetherError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for TogetherError {
    fn from(err: serde_json::Error) -> Self {
        TogetherError::ValidationError(err.to_string())
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> TogetherError {
    TogetherError::ValidationError(message.to_string())
}

pub fn permission_denied() -> TogetherError {
    TogetherError::PermissionDenied("Permission denied".to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> TogetherError {
    TogetherError::NotFoundError(message.to_string())
}

