// --- File: crates/togethernow_common/src/lib.rs ---

// Declare modules within this crate
pub mod auth; // Authenticated caller extractor
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod json; // JSON request bodies
pub mod logging; // Logging utilities
pub mod models; // Stored documents and response summaries
pub mod services; // Service abstractions
pub mod state; // Shared application state

// Re-export error types and utilities for easier access
pub use error::{
    not_found, permission_denied, validation_error, HttpStatusCode, TogetherError,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::{create_client, shared_client, HTTP_CLIENT},
    message, status, with_status, ApiResult, IntoHttpResponse,
};

// Re-export logging utilities for easier access
pub use logging::{init, log_error, log_result};

pub use auth::AuthUser;
pub use json::JsonBody;
pub use models::now_timestamp;
pub use services::{IdentityError, IdentityService, NewAccount};
pub use state::{AppState, Services};
