// --- File: crates/togethernow_auth/src/recaptcha.rs ---
//! reCAPTCHA v2 verification for the sign-up and login forms.

use reqwest::Client;
use serde::Deserialize;
use togethernow_common::shared_client;
use togethernow_config::RecaptchaConfig;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Checks captcha tokens with Google's `siteverify` endpoint.
#[derive(Clone)]
pub struct RecaptchaVerifier {
    client: Client,
    enabled: bool,
    secret: Option<String>,
    verify_url: String,
}

impl RecaptchaVerifier {
    pub fn new(config: &RecaptchaConfig) -> Self {
        if !config.enabled {
            warn!("reCAPTCHA verification is disabled; every captcha token is accepted");
        }
        Self {
            client: shared_client(),
            enabled: config.enabled,
            secret: config.secret.clone().filter(|s| !s.is_empty()),
            verify_url: config.verify_url.clone(),
        }
    }

    /// Whether the token proves a human filled in the form.
    ///
    /// A missing token or secret, an unreachable endpoint and an unreadable
    /// answer all count as failure.
    pub async fn verify(&self, token: Option<&str>) -> bool {
        if !self.enabled {
            return true;
        }
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            debug!("No CAPTCHA token provided");
            return false;
        };
        let Some(secret) = self.secret.as_deref() else {
            warn!("RECAPTCHA_SECRET is missing; rejecting captcha");
            return false;
        };

        let params = [("secret", secret), ("response", token)];
        let response = match self.client.post(&self.verify_url).form(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("reCAPTCHA request failed: {}", e);
                return false;
            }
        };
        match response.json::<SiteVerifyResponse>().await {
            Ok(result) => {
                debug!(
                    "reCAPTCHA verification result: success={} errors={:?}",
                    result.success, result.error_codes
                );
                result.success
            }
            Err(e) => {
                warn!("Unreadable reCAPTCHA response: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn verifier(server: &MockServer, secret: Option<&str>) -> RecaptchaVerifier {
        RecaptchaVerifier::new(&RecaptchaConfig {
            enabled: true,
            secret: secret.map(str::to_string),
            verify_url: format!("{}/siteverify", server.uri()),
        })
    }

    #[tokio::test]
    async fn accepts_tokens_google_confirms() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/siteverify"))
            .and(body_string_contains("response=human"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "hostname": "localhost"
            })))
            .mount(&server)
            .await;

        assert!(verifier(&server, Some("s3cret")).verify(Some("human")).await);
    }

    #[tokio::test]
    async fn rejects_failed_missing_or_unverifiable_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/siteverify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "error-codes": ["invalid-input-response"]
            })))
            .mount(&server)
            .await;

        let verifier_with_secret = verifier(&server, Some("s3cret"));
        assert!(!verifier_with_secret.verify(Some("bot")).await);
        assert!(!verifier_with_secret.verify(None).await);
        assert!(!verifier_with_secret.verify(Some("")).await);
        assert!(!verifier(&server, None).verify(Some("human")).await);
    }

    #[tokio::test]
    async fn disabled_verification_accepts_anything() {
        let verifier = RecaptchaVerifier::new(&RecaptchaConfig {
            enabled: false,
            ..Default::default()
        });
        assert!(verifier.verify(None).await);
    }
}
