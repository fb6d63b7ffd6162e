// --- File: crates/togethernow_common/src/services.rs ---
//! Service abstractions for the identity provider.
//!
//! Route handlers talk to accounts and tokens through [`IdentityService`] so
//! that Firebase can be swapped for the in-process provider in development
//! and tests. Persistence goes through `togethernow_store::DocumentStore`.

use thiserror::Error;

pub use togethernow_store::BoxFuture;

use crate::auth::AuthUser;

/// Errors returned by an [`IdentityService`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdentityError {
    /// The presented ID token is malformed, expired or not for this project
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Email/password sign-in failed
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The provider refused the request, e.g. `EMAIL_EXISTS`
    #[error("{0}")]
    Rejected(String),

    /// The provider could not be reached or answered unexpectedly
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),

    /// Missing key material or API key
    #[error("Identity configuration error: {0}")]
    Config(String),
}

/// A new email/password account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Account and token operations of an identity provider.
pub trait IdentityService: Send + Sync {
    /// Verify an ID token presented by a client and return its subject.
    fn verify_id_token<'a>(&'a self, token: &'a str) -> BoxFuture<'a, AuthUser, IdentityError>;

    /// Create an account and return its uid.
    fn create_user<'a>(&'a self, account: &'a NewAccount) -> BoxFuture<'a, String, IdentityError>;

    /// Check an email/password pair and return the account's uid.
    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, String, IdentityError>;

    /// Mint a custom token the client exchanges for an ID token.
    fn create_custom_token<'a>(&'a self, uid: &'a str) -> BoxFuture<'a, String, IdentityError>;
}
