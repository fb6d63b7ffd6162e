// --- File: crates/togethernow_common/src/models.rs ---

//! Documents stored by TogetherNow and the summaries returned to clients.
//!
//! Stored models use `#[serde(default)]` generously: documents written by
//! older clients or by hand may lack fields, and a missing field must not
//! turn a read into an error.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use togethernow_store::Document;

/// Collection names.
pub mod collections {
    pub const USERS: &str = "users";
    pub const EVENTS: &str = "events";
    pub const REVIEWS: &str = "reviews";
    pub const DIRECT_MESSAGES: &str = "direct_messages";
    /// `users/{uid}/friends`
    pub const FRIENDS: &str = "friends";
    /// `users/{uid}/friend_requests`, incoming
    pub const FRIEND_REQUESTS: &str = "friend_requests";
    /// `users/{uid}/sent_requests`, outgoing
    pub const SENT_REQUESTS: &str = "sent_requests";
    /// `events/{id}/messages` and `direct_messages/{chat}/messages`
    pub const MESSAGES: &str = "messages";
}

/// Capacity assumed for events without `max_people`.
pub const DEFAULT_MAX_PEOPLE: i64 = 100;

/// The current time as RFC 3339 UTC with microseconds.
///
/// The fixed width keeps lexical order equal to chronological order.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Accepts an integer, a float with no fraction, or a numeric string.
pub fn int_like(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn deserialize_int_like<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(int_like(&value).unwrap_or_default())
}

fn default_max_people() -> i64 {
    DEFAULT_MAX_PEOPLE
}

/// `users/{uid}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub title: String,
}

/// `events/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_max_people", deserialize_with = "deserialize_int_like")]
    pub max_people: i64,
    #[serde(default, deserialize_with = "deserialize_int_like")]
    pub current_people: i64,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub creator_uid: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kicked_users: Vec<String>,
}

impl Event {
    pub fn is_member(&self, uid: &str) -> bool {
        self.members.iter().any(|m| m == uid)
    }

    pub fn is_kicked(&self, uid: &str) -> bool {
        self.kicked_users.iter().any(|m| m == uid)
    }

    pub fn is_creator(&self, uid: &str) -> bool {
        self.creator_uid == uid
    }

    pub fn is_full(&self) -> bool {
        self.current_people >= self.max_people
    }
}

/// `reviews/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub reviewer_uid: String,
    #[serde(default)]
    pub reviewer_name: String,
    pub target_uid: String,
    #[serde(default, deserialize_with = "deserialize_int_like")]
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `users/{target}/friend_requests/{sender}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FriendRequest {
    pub sender_uid: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `users/{sender}/sent_requests/{target}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentRequest {
    pub target_uid: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `users/{uid}/friends/{friend}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Friendship {
    #[serde(default)]
    pub added_at: Option<String>,
}

/// A chat message, in an event chat or a direct chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender_uid: String,
    #[serde(default)]
    pub sender_name: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A user as shown in member, blocked and sent-request lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MemberSummary {
    pub uid: String,
    pub name: String,
    pub title: String,
}

/// Display fields of a `users/{uid}` document, with the given fallback name.
///
/// Reads the raw document: profiles hold whatever their owner merged in, so
/// they are not decoded into [`UserProfile`].
pub fn summarize(uid: &str, profile: Option<&Document>, unknown_name: &str) -> MemberSummary {
    MemberSummary {
        uid: uid.to_string(),
        name: profile
            .and_then(|p| p.get_str("name"))
            .unwrap_or(unknown_name)
            .to_string(),
        title: profile
            .and_then(|p| p.get_str("title"))
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_from_older_documents_get_defaults() {
        let event: Event = serde_json::from_value(json!({
            "title": "Pickup Basketball 3v3",
            "current_people": 4,
            "members": ["system_demo_user"]
        }))
        .unwrap();

        assert_eq!(event.max_people, DEFAULT_MAX_PEOPLE);
        assert!(event.kicked_users.is_empty());
        assert!(event.is_member("system_demo_user"));
        assert!(!event.is_full());
    }

    #[test]
    fn numeric_strings_count_as_integers() {
        let event: Event =
            serde_json::from_value(json!({"max_people": "4", "current_people": 4.0})).unwrap();
        assert_eq!(event.max_people, 4);
        assert!(event.is_full());
        assert_eq!(int_like(&json!("x")), None);
        assert_eq!(int_like(&json!(2.5)), None);
    }

    #[test]
    fn timestamps_have_fixed_width() {
        let ts = now_timestamp();
        assert_eq!(ts.len(), "2024-12-03T12:00:00.000000Z".len());
        assert!(ts.ends_with('Z'));
    }

    #[test]
    fn summaries_fall_back_to_the_unknown_name() {
        let summary = summarize("u1", None, "Unknown User");
        assert_eq!(summary.name, "Unknown User");
        assert_eq!(summary.title, "");

        let profile = Document::new(
            "u2",
            json!({"name": "Ada", "title": "Engineer"})
                .as_object()
                .cloned()
                .unwrap(),
        );
        let summary = summarize("u2", Some(&profile), "Unknown");
        assert_eq!(summary.name, "Ada");
        assert_eq!(summary.title, "Engineer");

        let nameless = Document::new("u3", json!({"title": null}).as_object().cloned().unwrap());
        let summary = summarize("u3", Some(&nameless), "Unknown");
        assert_eq!(summary.name, "Unknown");
        assert_eq!(summary.title, "");
    }
}
