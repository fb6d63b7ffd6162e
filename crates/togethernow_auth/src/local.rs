// --- File: crates/togethernow_auth/src/local.rs ---
//! An in-process identity provider for offline development and tests.
//!
//! Accounts live in memory with salted SHA-256 password digests. Tokens are
//! HS256 JWTs signed with `local_identity.token_secret`; the same token
//! serves as custom token and as ID token, so a client can use what
//! `/auth/login` returns directly in the `Authorization` header.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use togethernow_common::{
    services::BoxFuture, AuthUser, IdentityError, IdentityService, NewAccount,
};
use togethernow_config::LocalIdentityConfig;
use tokio::sync::RwLock;
use tracing::{debug, info};

const ISSUER: &str = "togethernow-local";
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Serialize, Deserialize)]
struct LocalClaims {
    iss: String,
    sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone)]
struct LocalAccount {
    uid: String,
    email: String,
    display_name: Option<String>,
    salt: String,
    digest: String,
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Accounts keyed by normalized email.
pub struct LocalIdentityService {
    accounts: RwLock<HashMap<String, LocalAccount>>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: i64,
}

impl LocalIdentityService {
    pub fn new(config: &LocalIdentityConfig) -> Self {
        info!("Using the local identity provider");
        Self {
            accounts: RwLock::new(HashMap::new()),
            encoding_key: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            token_ttl_secs: config.token_ttl_secs,
        }
    }

    /// Signs a token for an arbitrary user, account or not.
    pub fn issue_token(&self, user: &AuthUser) -> Result<String, IdentityError> {
        let iat = Utc::now().timestamp();
        let claims = LocalClaims {
            iss: ISSUER.to_string(),
            sub: user.uid.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            iat,
            exp: iat + self.token_ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| IdentityError::Unavailable(e.to_string()))
    }

    fn validate(&self, account: &NewAccount) -> Result<(), IdentityError> {
        let email = account.email.trim();
        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(IdentityError::Rejected(
                "The email address is badly formatted".to_string(),
            ));
        }
        if account.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::Rejected(
                "Password should be at least 6 characters".to_string(),
            ));
        }
        Ok(())
    }
}

impl IdentityService for LocalIdentityService {
    fn verify_id_token<'a>(&'a self, token: &'a str) -> BoxFuture<'a, AuthUser, IdentityError> {
        Box::pin(async move {
            let mut validation = Validation::new(Algorithm::HS256);
            validation.set_issuer(&[ISSUER]);
            validation.set_required_spec_claims(&["exp", "iss", "sub"]);

            let claims = decode::<LocalClaims>(token, &self.decoding_key, &validation)
                .map_err(|e| IdentityError::InvalidToken(e.to_string()))?
                .claims;
            if claims.sub.is_empty() {
                return Err(IdentityError::InvalidToken("empty subject".to_string()));
            }
            Ok(AuthUser {
                uid: claims.sub,
                name: claims.name,
                email: claims.email,
            })
        })
    }

    fn create_user<'a>(&'a self, account: &'a NewAccount) -> BoxFuture<'a, String, IdentityError> {
        Box::pin(async move {
            self.validate(account)?;
            let key = normalize_email(&account.email);

            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(&key) {
                return Err(IdentityError::Rejected(
                    "The email address is already in use by another account".to_string(),
                ));
            }

            let uid = uuid::Uuid::new_v4().simple().to_string()[..28].to_string();
            let salt = uuid::Uuid::new_v4().simple().to_string();
            accounts.insert(
                key,
                LocalAccount {
                    uid: uid.clone(),
                    email: account.email.trim().to_string(),
                    display_name: account.display_name.clone(),
                    digest: password_digest(&salt, &account.password),
                    salt,
                },
            );
            debug!("Created local account {}", uid);
            Ok(uid)
        })
    }

    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, String, IdentityError> {
        Box::pin(async move {
            let accounts = self.accounts.read().await;
            match accounts.get(&normalize_email(email)) {
                Some(account) if password_digest(&account.salt, password) == account.digest => {
                    Ok(account.uid.clone())
                }
                _ => Err(IdentityError::InvalidCredentials),
            }
        })
    }

    fn create_custom_token<'a>(&'a self, uid: &'a str) -> BoxFuture<'a, String, IdentityError> {
        Box::pin(async move {
            let user = {
                let accounts = self.accounts.read().await;
                match accounts.values().find(|a| a.uid == uid) {
                    Some(account) => AuthUser {
                        uid: account.uid.clone(),
                        name: account.display_name.clone(),
                        email: Some(account.email.clone()),
                    },
                    None => AuthUser::new(uid),
                }
            };
            self.issue_token(&user)
        })
    }
}
