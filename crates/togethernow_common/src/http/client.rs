// --- File: crates/togethernow_common/src/http/client.rs ---
use once_cell::sync::Lazy;
use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A shared HTTP client for calls to Google APIs.
/// Configured with a default timeout; falls back to a default client if the
/// builder fails.
pub static HTTP_CLIENT: Lazy<Client> =
    Lazy::new(|| create_client(DEFAULT_TIMEOUT_SECS).unwrap_or_default());

/// Creates a new HTTP client with the given timeout.
///
/// # Arguments
///
/// * `timeout_secs` - The timeout in seconds for the client
pub fn create_client(timeout_secs: u64) -> Result<Client, ReqwestError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// A clone of the shared client (clones share the connection pool).
pub fn shared_client() -> Client {
    HTTP_CLIENT.clone()
}
