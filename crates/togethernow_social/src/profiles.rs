// --- File: crates/togethernow_social/src/profiles.rs ---
use serde_json::{Map, Value};
use togethernow_common::{validation_error, AuthUser, TogetherError};
use togethernow_store::{DocumentStore, SetMode};
use tracing::info;

use crate::paths;

/// The stored profile, or an empty object when the user has none.
pub async fn get_profile(store: &dyn DocumentStore, uid: &str) -> Result<Value, TogetherError> {
    let profile = store.get(&paths::user(uid)?).await?;
    Ok(Value::Object(profile.map(|p| p.data).unwrap_or_else(Map::new)))
}

/// Merges `fields` into the caller's profile, creating it if needed.
pub async fn update_profile(
    store: &dyn DocumentStore,
    user: &AuthUser,
    fields: Value,
) -> Result<(), TogetherError> {
    let Value::Object(fields) = fields else {
        return Err(validation_error("Profile data must be a JSON object"));
    };
    store
        .set(&paths::user(&user.uid)?, fields, SetMode::Merge)
        .await?;
    info!("Profile of {} updated", user.uid);
    Ok(())
}
