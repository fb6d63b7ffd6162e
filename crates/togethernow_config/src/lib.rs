use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

pub mod models;
pub use models::*;

/// Prefix for configuration environment variables, e.g. `TOGETHERNOW__SERVER__PORT`.
pub const ENV_PREFIX: &str = "TOGETHERNOW";

/// Loads the configuration for the current `RUN_ENV` (default `debug`).
///
/// Sources, later ones winning: `<dir>/default.*`, `<dir>/<RUN_ENV>.*` and
/// `TOGETHERNOW__*` environment variables. `<dir>` is `CONFIG_DIR` or `config`.
/// Values set to `secret_from_env` are then resolved from the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    load_config_from(&config_dir, &run_env)
}

/// Loads the configuration from an explicit directory and run environment.
pub fn load_config_from(config_dir: &Path, run_env: &str) -> Result<AppConfig, ConfigError> {
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_FROM_ENV => {
                let env_key = path.join("_").to_uppercase();
                match env::var(&env_key) {
                    Ok(env_val) => *obj = Value::String(env_val),
                    Err(_) => {
                        warn!("env var {} not found for secret_from_env", env_key);
                        *obj = Value::Null;
                    }
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config.
///
/// A marker whose variable is unset becomes `null`, so optional secrets read as absent.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to apply env secrets: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file into the process environment once.
///
/// The file is `DOTENV_OVERRIDE` if set, else a first command line argument
/// starting with `.env`, else `.env`. Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_apply_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(dir.path(), "debug").unwrap();

        assert_eq!(config.server.port, 5001);
        assert_eq!(config.backend, BackendKind::Firebase);
        assert_eq!(
            config.firebase.key_path.as_deref(),
            Some("serviceAccountKey.json")
        );
        assert!(config.recaptcha.enabled);
        assert_eq!(config.cors.allowed_origins, vec!["*".to_string()]);
    }

    #[test]
    fn run_env_file_overrides_default_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "backend = \"local\"\n[server]\nport = 7000\n",
        )
        .unwrap();
        fs::write(dir.path().join("staging.toml"), "[server]\nport = 7100\n").unwrap();

        let config = load_config_from(dir.path(), "staging").unwrap();
        assert_eq!(config.server.port, 7100);
        assert_eq!(config.backend, BackendKind::Local);
    }

    #[test]
    fn secret_marker_is_resolved_from_environment() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[recaptcha]\nsecret = \"secret_from_env\"\n[firebase]\napi_key = \"secret_from_env\"\n",
        )
        .unwrap();
        env::set_var("RECAPTCHA_SECRET", "captcha-secret");
        env::remove_var("FIREBASE_API_KEY");

        let config = load_config_from(dir.path(), "debug").unwrap();
        assert_eq!(config.recaptcha.secret.as_deref(), Some("captcha-secret"));
        assert_eq!(config.firebase.api_key, None);
    }
}
