//! Verification of Firebase ID tokens.
//!
//! ID tokens are RS256 JWTs signed by one of Google's rotating secure-token
//! keys. The key set is fetched from `jwks_url` and kept for as long as the
//! response's `Cache-Control: max-age` allows. An unknown `kid` triggers a
//! refetch at most once per `MIN_REFETCH_INTERVAL`.

use jsonwebtoken::{decode, decode_header, jwk::Jwk, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use reqwest::{header::CACHE_CONTROL, Client};
use serde::Deserialize;
use std::time::{Duration, Instant};
use togethernow_common::AuthUser;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{api_error, FirebaseError};

pub const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

const DEFAULT_KEY_TTL: Duration = Duration::from_secs(3600);
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

struct CachedKeys {
    set: JwkSet,
    fetched_at: Instant,
    expires_at: Instant,
}

impl CachedKeys {
    /// Answers from the cache, or `None` when a refetch is due.
    fn lookup(&self, kid: &str, now: Instant) -> Option<Result<Jwk, FirebaseError>> {
        if self.expires_at <= now {
            return None;
        }
        match self.set.find(kid) {
            Some(jwk) => Some(Ok(jwk.clone())),
            None if now.duration_since(self.fetched_at) < MIN_REFETCH_INTERVAL => {
                Some(Err(unknown_key(kid)))
            }
            None => None,
        }
    }
}

fn unknown_key(kid: &str) -> FirebaseError {
    FirebaseError::TokenError(format!("unknown key id {}", kid))
}

/// Checks ID tokens issued for one Firebase project.
pub struct IdTokenVerifier {
    client: Client,
    jwks_url: String,
    project_id: String,
    keys: RwLock<Option<CachedKeys>>,
}

impl IdTokenVerifier {
    pub fn new(client: Client, jwks_url: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            client,
            jwks_url: jwks_url.into(),
            project_id: project_id.into(),
            keys: RwLock::new(None),
        }
    }

    /// Verifies signature, expiry, audience, issuer and subject.
    pub async fn verify(&self, token: &str) -> Result<AuthUser, FirebaseError> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(FirebaseError::TokenError(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| FirebaseError::TokenError("missing kid".to_string()))?;

        let jwk = self.signing_key(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("{}{}", ISSUER_PREFIX, self.project_id)]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let claims = decode::<IdTokenClaims>(token, &key, &validation)?.claims;
        if claims.sub.is_empty() {
            return Err(FirebaseError::TokenError("empty subject".to_string()));
        }

        Ok(AuthUser {
            uid: claims.sub,
            name: claims.name,
            email: claims.email,
        })
    }

    async fn signing_key(&self, kid: &str) -> Result<Jwk, FirebaseError> {
        if let Some(cached) = self.keys.read().await.as_ref() {
            if let Some(found) = cached.lookup(kid, Instant::now()) {
                return found;
            }
        }

        let mut keys = self.keys.write().await;
        // Another verification may have refreshed the set while we waited.
        if let Some(cached) = keys.as_ref() {
            if let Some(found) = cached.lookup(kid, Instant::now()) {
                return found;
            }
        }
        let fresh = self.fetch_keys().await?;
        let jwk = fresh.set.find(kid).cloned();
        *keys = Some(fresh);
        jwk.ok_or_else(|| unknown_key(kid))
    }

    async fn fetch_keys(&self) -> Result<CachedKeys, FirebaseError> {
        debug!("Fetching token signing keys from {}", self.jwks_url);
        let response = self.client.get(&self.jwks_url).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let ttl = response
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(max_age)
            .unwrap_or(DEFAULT_KEY_TTL);
        let set: JwkSet = response.json().await?;
        info!("Loaded {} token signing keys, valid for {:?}", set.keys.len(), ttl);

        let now = Instant::now();
        Ok(CachedKeys {
            set,
            fetched_at: now,
            expires_at: now + ttl,
        })
    }
}

/// `max-age` of a `Cache-Control` header value.
fn max_age(cache_control: &str) -> Option<Duration> {
    cache_control
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.trim().parse().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_max_age_from_cache_control() {
        assert_eq!(
            max_age("public, max-age=19302, must-revalidate, no-transform"),
            Some(Duration::from_secs(19302))
        );
        assert_eq!(max_age("no-cache"), None);
    }

    fn cached(ttl: Duration) -> CachedKeys {
        let set: JwkSet = serde_json::from_value(serde_json::json!({"keys": []})).unwrap();
        let now = Instant::now();
        CachedKeys {
            set,
            fetched_at: now,
            expires_at: now + ttl,
        }
    }

    #[test]
    fn unknown_kids_are_answered_from_a_fresh_cache() {
        let keys = cached(Duration::from_secs(600));
        let now = Instant::now();
        assert!(matches!(
            keys.lookup("bogus", now),
            Some(Err(FirebaseError::TokenError(_)))
        ));
        assert!(keys.lookup("bogus", now + MIN_REFETCH_INTERVAL).is_none());
    }

    #[test]
    fn expired_caches_are_refetched() {
        let keys = cached(Duration::from_secs(0));
        assert!(keys.lookup("bogus", Instant::now()).is_none());
    }

    #[tokio::test]
    async fn garbage_is_rejected_before_any_key_lookup() {
        let verifier = IdTokenVerifier::new(Client::new(), "http://127.0.0.1:9/keys", "demo");
        let err = verifier.verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, FirebaseError::TokenError(_)));
    }
}
