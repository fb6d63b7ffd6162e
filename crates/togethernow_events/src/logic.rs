// --- File: crates/togethernow_events/src/logic.rs ---
//! Event operations, independent of HTTP.
//!
//! Membership changes are a read followed by an update with array and
//! counter transforms; the capacity check is not transactional, so two
//! simultaneous joins can both pass it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use togethernow_common::{
    models::{collections, int_like, now_timestamp, summarize, ChatMessage, Event, MemberSummary},
    not_found, permission_denied, validation_error, AuthUser, TogetherError,
};
use togethernow_store::{
    to_fields, CollectionRef, Direction, DocumentRef, DocumentStore, FieldUpdate, Query,
};
use tracing::{debug, info};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Body of `POST /events`.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// An integer or a numeric string.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub max_people: Option<Value>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub event_time: Option<String>,
}

/// Body of `POST /join`.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct JoinRequest {
    #[serde(default)]
    pub event_id: Option<String>,
}

/// Body of the kick and unblock routes.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TargetRequest {
    #[serde(default)]
    pub target_uid: Option<String>,
}

/// Body of `POST /events/{id}/chat`.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Answer to `POST /events`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreatedResponse {
    pub message: String,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    Unjoined,
}

impl JoinOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinOutcome::Joined => "joined",
            JoinOutcome::Unjoined => "unjoined",
        }
    }
}

fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn events() -> Result<CollectionRef, TogetherError> {
    Ok(CollectionRef::root(collections::EVENTS)?)
}

fn event_ref(event_id: &str) -> Result<DocumentRef, TogetherError> {
    Ok(events()?.doc(event_id)?)
}

fn messages(event_id: &str) -> Result<CollectionRef, TogetherError> {
    Ok(event_ref(event_id)?.collection(collections::MESSAGES)?)
}

async fn load_event(
    store: &dyn DocumentStore,
    doc: &DocumentRef,
) -> Result<Option<Event>, TogetherError> {
    match store.get(doc).await? {
        Some(document) => Ok(Some(document.decode()?)),
        None => Ok(None),
    }
}

/// The event, or `404 Event not found`.
async fn existing_event(store: &dyn DocumentStore, event_id: &str) -> Result<Event, TogetherError> {
    load_event(store, &event_ref(event_id)?)
        .await?
        .ok_or_else(|| not_found("Event not found"))
}

/// The event, if `user` created it; `404` or `403` otherwise.
async fn owned_event(
    store: &dyn DocumentStore,
    user: &AuthUser,
    event_id: &str,
) -> Result<Event, TogetherError> {
    let event = existing_event(store, event_id).await?;
    if !event.is_creator(&user.uid) {
        return Err(permission_denied());
    }
    Ok(event)
}

/// The event, if `user` is a member or its creator.
async fn joined_event(
    store: &dyn DocumentStore,
    user: &AuthUser,
    event_id: &str,
) -> Result<Event, TogetherError> {
    let event = existing_event(store, event_id).await?;
    if !event.is_member(&user.uid) && !event.is_creator(&user.uid) {
        return Err(TogetherError::PermissionDenied("Not a member".to_string()));
    }
    Ok(event)
}

async fn user_profiles(
    store: &dyn DocumentStore,
    uids: &[String],
) -> Result<Vec<(String, Option<togethernow_store::Document>)>, TogetherError> {
    let users = CollectionRef::root(collections::USERS)?;
    let mut profiles = Vec::with_capacity(uids.len());
    for uid in uids {
        let profile = match users.doc(uid) {
            Ok(doc) => store.get(&doc).await?,
            Err(_) => None,
        };
        profiles.push((uid.clone(), profile));
    }
    Ok(profiles)
}

/// All events, newest first, each with its `id`.
pub async fn list_events(store: &dyn DocumentStore) -> Result<Vec<Value>, TogetherError> {
    let query = Query::new(events()?).order_by("created_at", Direction::Descending);
    let docs = store.query(&query).await?;
    debug!("Listing {} events", docs.len());
    Ok(docs.into_iter().map(|d| d.into_json_with_id()).collect())
}

/// Creates an event with the caller as creator and first member.
pub async fn create_event(
    store: &dyn DocumentStore,
    user: &AuthUser,
    request: &CreateEventRequest,
) -> Result<CreatedResponse, TogetherError> {
    let max_people = request
        .max_people
        .as_ref()
        .and_then(int_like)
        .filter(|n| *n >= 1)
        .ok_or_else(|| validation_error("max_people must be a positive integer"))?;

    let event = Event {
        title: request.title.clone(),
        category: request.category.clone(),
        location: request.location.clone(),
        max_people,
        current_people: 1,
        event_date: request.event_date.clone(),
        event_time: request.event_time.clone(),
        created_at: Some(now_timestamp()),
        creator_name: user.display_name("Unknown"),
        creator_uid: user.uid.clone(),
        members: vec![user.uid.clone()],
        kicked_users: Vec::new(),
    };

    let id = store.add(&events()?, to_fields(&event)?).await?;
    info!("User {} created event {}", user.uid, id);
    Ok(CreatedResponse {
        message: "Created".to_string(),
        id,
    })
}

/// Joins the event, or leaves it when the caller is already a member.
///
/// Leaving is always allowed. Joining checks capacity first, then the kick
/// list.
pub async fn toggle_membership(
    store: &dyn DocumentStore,
    user: &AuthUser,
    event_id: Option<&str>,
) -> Result<JoinOutcome, TogetherError> {
    let event_id = required(event_id).ok_or_else(|| not_found("Not found"))?;
    let doc = event_ref(event_id)?;
    let event = load_event(store, &doc)
        .await?
        .ok_or_else(|| not_found("Not found"))?;
    let uid = Value::from(user.uid.as_str());

    if event.is_member(&user.uid) {
        store
            .update(
                &doc,
                vec![
                    FieldUpdate::array_remove("members", vec![uid]),
                    FieldUpdate::increment("current_people", -1),
                ],
            )
            .await?;
        info!("User {} left event {}", user.uid, event_id);
        return Ok(JoinOutcome::Unjoined);
    }

    if event.is_full() {
        return Err(validation_error("Event is full"));
    }
    if event.is_kicked(&user.uid) {
        return Err(TogetherError::PermissionDenied(
            "You have been kicked from this event".to_string(),
        ));
    }

    store
        .update(
            &doc,
            vec![
                FieldUpdate::array_union("members", vec![uid]),
                FieldUpdate::increment("current_people", 1),
            ],
        )
        .await?;
    info!("User {} joined event {}", user.uid, event_id);
    Ok(JoinOutcome::Joined)
}

/// Deletes the event if the caller created it.
///
/// A missing event is reported as `403 Permission denied` as well, so the
/// answer does not reveal whether an id exists. Chat messages are kept.
pub async fn delete_event(
    store: &dyn DocumentStore,
    user: &AuthUser,
    event_id: &str,
) -> Result<(), TogetherError> {
    let doc = event_ref(event_id)?;
    match load_event(store, &doc).await? {
        Some(event) if event.is_creator(&user.uid) => {
            store.delete(&doc).await?;
            info!("User {} deleted event {}", user.uid, event_id);
            Ok(())
        }
        _ => Err(permission_denied()),
    }
}

/// Removes a member and bars them from rejoining.
pub async fn kick_member(
    store: &dyn DocumentStore,
    user: &AuthUser,
    event_id: &str,
    target_uid: Option<&str>,
) -> Result<(), TogetherError> {
    let target = required(target_uid).ok_or_else(|| validation_error("Target UID required"))?;
    let event = owned_event(store, user, event_id).await?;
    if !event.is_member(target) {
        return Err(validation_error("User not in event"));
    }

    let target_value = Value::from(target);
    store
        .update(
            &event_ref(event_id)?,
            vec![
                FieldUpdate::array_remove("members", vec![target_value.clone()]),
                FieldUpdate::array_union("kicked_users", vec![target_value]),
                FieldUpdate::increment("current_people", -1),
            ],
        )
        .await?;
    info!("User {} kicked {} from event {}", user.uid, target, event_id);
    Ok(())
}

/// Lets a kicked user join again. Does not re-add them.
pub async fn unblock_member(
    store: &dyn DocumentStore,
    user: &AuthUser,
    event_id: &str,
    target_uid: Option<&str>,
) -> Result<(), TogetherError> {
    let target = required(target_uid).ok_or_else(|| validation_error("Target UID required"))?;
    owned_event(store, user, event_id).await?;

    store
        .update(
            &event_ref(event_id)?,
            vec![FieldUpdate::array_remove(
                "kicked_users",
                vec![Value::from(target)],
            )],
        )
        .await?;
    info!("User {} unblocked {} in event {}", user.uid, target, event_id);
    Ok(())
}

/// Kicked users that still have a profile. Creator only.
pub async fn blocked_users(
    store: &dyn DocumentStore,
    user: &AuthUser,
    event_id: &str,
) -> Result<Vec<MemberSummary>, TogetherError> {
    let event = owned_event(store, user, event_id).await?;
    let profiles = user_profiles(store, &event.kicked_users).await?;
    Ok(profiles
        .into_iter()
        .filter_map(|(uid, profile)| {
            profile
                .as_ref()
                .map(|p| summarize(&uid, Some(p), "Unknown"))
        })
        .collect())
}

/// Every member, with placeholders for members without a profile.
pub async fn event_members(
    store: &dyn DocumentStore,
    event_id: &str,
) -> Result<Vec<MemberSummary>, TogetherError> {
    let event = existing_event(store, event_id).await?;
    let profiles = user_profiles(store, &event.members).await?;
    Ok(profiles
        .iter()
        .map(|(uid, profile)| summarize(uid, profile.as_ref(), "Unknown User"))
        .collect())
}

/// The event's chat, oldest message first.
pub async fn chat_messages(
    store: &dyn DocumentStore,
    user: &AuthUser,
    event_id: &str,
) -> Result<Vec<Value>, TogetherError> {
    joined_event(store, user, event_id).await?;
    let query = Query::new(messages(event_id)?).order_by("timestamp", Direction::Ascending);
    Ok(store
        .query(&query)
        .await?
        .into_iter()
        .map(|d| d.into_json_with_id())
        .collect())
}

/// Posts to the event's chat and returns the stored message.
pub async fn post_chat_message(
    store: &dyn DocumentStore,
    user: &AuthUser,
    event_id: &str,
    message: Option<&str>,
) -> Result<ChatMessage, TogetherError> {
    let text = message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| validation_error("Message required"))?;
    joined_event(store, user, event_id).await?;

    let mut message = ChatMessage {
        id: None,
        sender_uid: user.uid.clone(),
        sender_name: user.display_name("Anonymous"),
        message: text.to_string(),
        timestamp: Some(now_timestamp()),
    };
    let id = store.add(&messages(event_id)?, to_fields(&message)?).await?;
    debug!("Message {} posted to event {}", id, event_id);
    message.id = Some(id);
    Ok(message)
}
