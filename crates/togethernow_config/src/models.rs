// --- File: crates/togethernow_config/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Marker value replaced by an environment variable when the config is loaded.
pub const SECRET_FROM_ENV: &str = "secret_from_env";

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Static page served at `/`.
    #[serde(default = "default_index_path")]
    pub index_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            index_path: default_index_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_index_path() -> String {
    "index.html".to_string()
}

/// Which implementation backs identity and storage.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Firebase Auth + Cloud Firestore.
    #[default]
    Firebase,
    /// In-process store and identity provider, for offline development.
    Local,
}

// --- Firebase Config ---
// Secrets are usually injected with the `secret_from_env` marker:
// FIREBASE_CREDENTIALS, FIREBASE_API_KEY
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FirebaseConfig {
    /// Falls back to the `project_id` of the service account.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Path of the service account key file.
    #[serde(default = "default_key_path")]
    pub key_path: Option<String>,
    /// Service account key as inline JSON; takes precedence over `key_path`.
    #[serde(default)]
    pub credentials: Option<String>,
    /// Web API key used for password sign-in.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Fixed OAuth bearer token, e.g. `owner` for the local emulators.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_auth_endpoint")]
    pub auth_endpoint: String,
    #[serde(default = "default_firestore_endpoint")]
    pub firestore_endpoint: String,
    #[serde(default = "default_database_id")]
    pub database_id: String,
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            key_path: default_key_path(),
            credentials: None,
            api_key: None,
            access_token: None,
            auth_endpoint: default_auth_endpoint(),
            firestore_endpoint: default_firestore_endpoint(),
            database_id: default_database_id(),
            jwks_url: default_jwks_url(),
        }
    }
}

fn default_key_path() -> Option<String> {
    Some("serviceAccountKey.json".to_string())
}

fn default_auth_endpoint() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}

fn default_firestore_endpoint() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_database_id() -> String {
    "(default)".to_string()
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
        .to_string()
}

// --- reCAPTCHA Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RecaptchaConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Loaded via RECAPTCHA_SECRET
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            secret: None,
            verify_url: default_verify_url(),
        }
    }
}

fn default_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}

fn default_true() -> bool {
    true
}

// --- Local identity provider ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LocalIdentityConfig {
    /// HMAC secret for locally issued tokens.
    #[serde(default = "default_local_secret")]
    pub token_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
}

impl Default for LocalIdentityConfig {
    fn default() -> Self {
        Self {
            token_secret: default_local_secret(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

fn default_local_secret() -> String {
    "togethernow-local-development".to_string()
}

fn default_token_ttl() -> i64 {
    3600
}

// --- CORS ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    /// `*` mirrors any origin and allows credentials.
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_origins(),
        }
    }
}

fn default_origins() -> Vec<String> {
    vec!["*".to_string()]
}

// --- Logging ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Used when RUST_LOG is not set.
    #[serde(default = "default_level")]
    pub level: String,
    /// When set, logs are also written to a daily rolling file here.
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendKind,
    /// Insert the demo events at startup (local backend only).
    #[serde(default)]
    pub seed_demo_data: bool,
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub recaptcha: RecaptchaConfig,
    #[serde(default)]
    pub local_identity: LocalIdentityConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
