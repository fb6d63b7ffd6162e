// --- File: crates/togethernow_social/src/friends.rs ---
//! Friend requests and friendships.
//!
//! A pending request is stored twice: as `users/{target}/friend_requests/{sender}`
//! for the recipient and as `users/{sender}/sent_requests/{target}` for the
//! sender. A friendship is likewise one `users/{uid}/friends/{other}` document
//! on each side. Every operation writes or deletes both halves.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use togethernow_common::{
    models::{collections, now_timestamp, summarize, FriendRequest, Friendship, SentRequest},
    not_found, validation_error, AuthUser, TogetherError,
};
use togethernow_store::{to_fields, CollectionRef, DocumentStore, Filter, Query, SetMode};
use tracing::{debug, info};

use crate::paths;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Body of `POST /friends/request` and `POST /friends/cancel_request`.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TargetRequest {
    #[serde(default)]
    pub target_uid: Option<String>,
}

/// Body of `POST /friends/accept` and `POST /friends/reject`.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RequesterRequest {
    #[serde(default)]
    pub requester_uid: Option<String>,
}

/// An outgoing request as listed to its sender.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SentRequestSummary {
    pub target_uid: String,
    pub name: String,
    pub title: String,
}

/// A friend with the title of an event they are in, if any.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct FriendSummary {
    pub uid: String,
    pub name: String,
    pub title: String,
    pub active_event: Option<String>,
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, TogetherError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| validation_error(message))
}

/// Removes both halves of the pending request from `sender` to `target`.
async fn drop_request(
    store: &dyn DocumentStore,
    sender: &str,
    target: &str,
) -> Result<(), TogetherError> {
    store
        .delete(&paths::user_entry(target, collections::FRIEND_REQUESTS, sender)?)
        .await?;
    store
        .delete(&paths::user_entry(sender, collections::SENT_REQUESTS, target)?)
        .await?;
    Ok(())
}

pub async fn send_request(
    store: &dyn DocumentStore,
    user: &AuthUser,
    target_uid: Option<&str>,
) -> Result<(), TogetherError> {
    let target = required(target_uid, "Target UID required")?;
    if target == user.uid {
        return Err(validation_error("Cannot send a friend request to yourself"));
    }
    let friendship = paths::user_entry(&user.uid, collections::FRIENDS, target)?;
    if store.get(&friendship).await?.is_some() {
        return Err(validation_error("Already friends"));
    }

    let timestamp = now_timestamp();
    let incoming = FriendRequest {
        sender_uid: user.uid.clone(),
        sender_name: user.display_name("Unknown"),
        timestamp: Some(timestamp.clone()),
    };
    let outgoing = SentRequest {
        target_uid: target.to_string(),
        timestamp: Some(timestamp),
    };
    store
        .set(
            &paths::user_entry(target, collections::FRIEND_REQUESTS, &user.uid)?,
            to_fields(&incoming)?,
            SetMode::Overwrite,
        )
        .await?;
    store
        .set(
            &paths::user_entry(&user.uid, collections::SENT_REQUESTS, target)?,
            to_fields(&outgoing)?,
            SetMode::Overwrite,
        )
        .await?;
    info!("User {} sent a friend request to {}", user.uid, target);
    Ok(())
}

pub async fn accept_request(
    store: &dyn DocumentStore,
    user: &AuthUser,
    requester_uid: Option<&str>,
) -> Result<(), TogetherError> {
    let requester = required(requester_uid, "Requester UID required")?;
    let request = paths::user_entry(&user.uid, collections::FRIEND_REQUESTS, requester)?;
    if store.get(&request).await?.is_none() {
        return Err(not_found("Friend request not found"));
    }

    let friendship = to_fields(&Friendship {
        added_at: Some(now_timestamp()),
    })?;
    store
        .set(
            &paths::user_entry(&user.uid, collections::FRIENDS, requester)?,
            friendship.clone(),
            SetMode::Overwrite,
        )
        .await?;
    store
        .set(
            &paths::user_entry(requester, collections::FRIENDS, &user.uid)?,
            friendship,
            SetMode::Overwrite,
        )
        .await?;
    drop_request(store, requester, &user.uid).await?;
    info!("User {} accepted {} as friend", user.uid, requester);
    Ok(())
}

pub async fn reject_request(
    store: &dyn DocumentStore,
    user: &AuthUser,
    requester_uid: Option<&str>,
) -> Result<(), TogetherError> {
    let requester = required(requester_uid, "Requester UID required")?;
    drop_request(store, requester, &user.uid).await?;
    debug!("User {} rejected request from {}", user.uid, requester);
    Ok(())
}

pub async fn cancel_request(
    store: &dyn DocumentStore,
    user: &AuthUser,
    target_uid: Option<&str>,
) -> Result<(), TogetherError> {
    let target = required(target_uid, "Target UID required")?;
    drop_request(store, &user.uid, target).await?;
    debug!("User {} cancelled request to {}", user.uid, target);
    Ok(())
}

/// Incoming request documents as stored.
pub async fn incoming_requests(
    store: &dyn DocumentStore,
    user: &AuthUser,
) -> Result<Vec<Value>, TogetherError> {
    let requests = paths::user_collection(&user.uid, collections::FRIEND_REQUESTS)?;
    Ok(store
        .list(&requests)
        .await?
        .into_iter()
        .map(|d| Value::Object(d.data))
        .collect())
}

/// Outgoing requests whose target still has a profile.
pub async fn sent_requests(
    store: &dyn DocumentStore,
    user: &AuthUser,
) -> Result<Vec<SentRequestSummary>, TogetherError> {
    let requests = paths::user_collection(&user.uid, collections::SENT_REQUESTS)?;
    let mut summaries = Vec::new();
    for request in store.list(&requests).await? {
        let Some(profile) = store.get(&paths::user(&request.id)?).await? else {
            continue;
        };
        let summary = summarize(&request.id, Some(&profile), "Unknown");
        summaries.push(SentRequestSummary {
            target_uid: summary.uid,
            name: summary.name,
            title: summary.title,
        });
    }
    Ok(summaries)
}

pub async fn remove_friend(
    store: &dyn DocumentStore,
    user: &AuthUser,
    friend_uid: &str,
) -> Result<(), TogetherError> {
    store
        .delete(&paths::user_entry(&user.uid, collections::FRIENDS, friend_uid)?)
        .await?;
    store
        .delete(&paths::user_entry(friend_uid, collections::FRIENDS, &user.uid)?)
        .await?;
    info!("User {} removed friend {}", user.uid, friend_uid);
    Ok(())
}

/// Title of one event `uid` is a member of.
async fn active_event(store: &dyn DocumentStore, uid: &str) -> Result<Option<String>, TogetherError> {
    let query = Query::new(CollectionRef::root(collections::EVENTS)?)
        .filter(Filter::array_contains("members", uid))
        .limit(1);
    Ok(store
        .query(&query)
        .await?
        .into_iter()
        .next()
        .and_then(|event| event.get_str("title").map(str::to_string)))
}

/// The caller's friends that have a profile.
pub async fn list_friends(
    store: &dyn DocumentStore,
    user: &AuthUser,
) -> Result<Vec<FriendSummary>, TogetherError> {
    let friends = paths::user_collection(&user.uid, collections::FRIENDS)?;
    let mut summaries = Vec::new();
    for friend in store.list(&friends).await? {
        let Some(profile) = store.get(&paths::user(&friend.id)?).await? else {
            continue;
        };
        let summary = summarize(&friend.id, Some(&profile), "Unknown");
        summaries.push(FriendSummary {
            active_event: active_event(store, &friend.id).await?,
            uid: summary.uid,
            name: summary.name,
            title: summary.title,
        });
    }
    Ok(summaries)
}
