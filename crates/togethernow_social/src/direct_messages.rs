// --- File: crates/togethernow_social/src/direct_messages.rs ---
use serde_json::Value;
use togethernow_common::{
    models::{collections, now_timestamp, ChatMessage},
    validation_error, AuthUser, TogetherError,
};
use togethernow_store::{to_fields, CollectionRef, Direction, DocumentStore, Query};
use tracing::debug;

/// Both participants share one chat: their uids, sorted, joined by `_`.
pub fn chat_id(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}_{}", a, b)
    } else {
        format!("{}_{}", b, a)
    }
}

fn messages(a: &str, b: &str) -> Result<CollectionRef, TogetherError> {
    Ok(CollectionRef::root(collections::DIRECT_MESSAGES)?
        .doc(&chat_id(a, b))?
        .collection(collections::MESSAGES)?)
}

/// The conversation with `other`, oldest message first.
pub async fn conversation(
    store: &dyn DocumentStore,
    user: &AuthUser,
    other: &str,
) -> Result<Vec<Value>, TogetherError> {
    let query = Query::new(messages(&user.uid, other)?).order_by("timestamp", Direction::Ascending);
    Ok(store
        .query(&query)
        .await?
        .into_iter()
        .map(|d| d.into_json_with_id())
        .collect())
}

pub async fn send_message(
    store: &dyn DocumentStore,
    user: &AuthUser,
    other: &str,
    text: Option<&str>,
) -> Result<ChatMessage, TogetherError> {
    let text = text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| validation_error("Message required"))?;

    let mut message = ChatMessage {
        id: None,
        sender_uid: user.uid.clone(),
        sender_name: user.display_name("Anonymous"),
        message: text.to_string(),
        timestamp: Some(now_timestamp()),
    };
    let id = store
        .add(&messages(&user.uid, other)?, to_fields(&message)?)
        .await?;
    debug!("Direct message {} from {} to {}", id, user.uid, other);
    message.id = Some(id);
    Ok(message)
}
