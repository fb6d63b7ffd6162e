use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use yup_oauth2::ServiceAccountKey;

use crate::error::FirebaseError;

/// Audience of custom tokens, fixed by Firebase Authentication.
pub const CUSTOM_TOKEN_AUDIENCE: &str =
    "https://identitytoolkit.googleapis.com/google.identity.identitytoolkit.v1.IdentityToolkit";

/// Custom tokens are valid for at most one hour.
const CUSTOM_TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct CustomTokenClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
    uid: &'a str,
}

/// Signs custom tokens with the service account's private key.
pub struct CustomTokenSigner {
    client_email: String,
    key: EncodingKey,
}

impl CustomTokenSigner {
    pub fn from_service_account(key: &ServiceAccountKey) -> Result<Self, FirebaseError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| FirebaseError::ConfigError(format!("Invalid private key: {}", e)))?;
        Ok(Self {
            client_email: key.client_email.clone(),
            key: encoding_key,
        })
    }

    /// A token the client exchanges for an ID token via `signInWithCustomToken`.
    pub fn sign(&self, uid: &str) -> Result<String, FirebaseError> {
        if uid.is_empty() || uid.len() > 128 {
            return Err(FirebaseError::TokenError(
                "uid must be 1 to 128 characters".to_string(),
            ));
        }
        let iat = Utc::now().timestamp();
        let claims = CustomTokenClaims {
            iss: &self.client_email,
            sub: &self.client_email,
            aud: CUSTOM_TOKEN_AUDIENCE,
            iat,
            exp: iat + CUSTOM_TOKEN_LIFETIME_SECS,
            uid,
        };
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.key)?)
    }
}
