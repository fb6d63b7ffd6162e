// --- File: crates/togethernow_social/src/paths.rs ---
use togethernow_common::{models::collections, TogetherError};
use togethernow_store::{CollectionRef, DocumentRef};

pub(crate) fn user(uid: &str) -> Result<DocumentRef, TogetherError> {
    Ok(CollectionRef::root(collections::USERS)?.doc(uid)?)
}

/// `users/{owner}/{collection}`
pub(crate) fn user_collection(owner: &str, collection: &str) -> Result<CollectionRef, TogetherError> {
    Ok(user(owner)?.collection(collection)?)
}

/// `users/{owner}/{collection}/{id}`
pub(crate) fn user_entry(
    owner: &str,
    collection: &str,
    id: &str,
) -> Result<DocumentRef, TogetherError> {
    Ok(user_collection(owner, collection)?.doc(id)?)
}
