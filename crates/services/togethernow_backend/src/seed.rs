// --- File: crates/services/togethernow_backend/src/seed.rs ---
//! Demo data for a fresh database.
//!
//! The two demo events get generated ids, so seeding twice inserts them
//! twice. Mock events have fixed ids (`mock-1` ...) and are overwritten.

use togethernow_common::{
    models::{collections, now_timestamp, Event},
    TogetherError,
};
use togethernow_store::{to_fields, CollectionRef, DocumentStore, SetMode};
use tracing::info;

fn event(
    title: &str,
    category: &str,
    location: &str,
    max_people: i64,
    current_people: i64,
    creator: (&str, &str),
) -> Event {
    let (creator_name, creator_uid) = creator;
    Event {
        title: Some(title.to_string()),
        category: Some(category.to_string()),
        location: Some(location.to_string()),
        max_people,
        current_people,
        event_date: None,
        event_time: None,
        created_at: Some(now_timestamp()),
        creator_name: creator_name.to_string(),
        creator_uid: creator_uid.to_string(),
        members: vec![creator_uid.to_string()],
        kicked_users: Vec::new(),
    }
}

pub fn demo_events() -> Vec<Event> {
    vec![
        event(
            "Pickup Basketball 3v3",
            "Sports",
            "Rec Center Courts",
            6,
            4,
            ("Felix Chen", "system_demo_user"),
        ),
        event(
            "Finals Chem Review",
            "Study",
            "Library, Room 304",
            10,
            8,
            ("Sarah Smith", "system_demo_user_2"),
        ),
    ]
}

/// Fixed sample events for frontend work, keyed by id.
pub fn mock_events() -> Vec<(&'static str, Event)> {
    let mock = |title: &str,
                category: &str,
                location: &str,
                (max_people, current_people): (i64, i64),
                (event_date, event_time): (&str, &str),
                created_at: &str,
                creator: (&str, &str)| {
        Event {
            event_date: Some(event_date.to_string()),
            event_time: Some(event_time.to_string()),
            created_at: Some(created_at.to_string()),
            ..event(title, category, location, max_people, current_people, creator)
        }
    };

    vec![
        (
            "mock-1",
            mock(
                "Badminton Doubles (Mock)",
                "Sports",
                "Rec Center",
                (4, 1),
                ("2024-12-25", "18:00"),
                "2024-12-03T12:00:00.000000Z",
                ("Mock User", "mock-uid"),
            ),
        ),
        (
            "mock-2",
            mock(
                "Late Night Study (Mock)",
                "Study",
                "Library",
                (6, 3),
                ("2024-12-26", "20:00"),
                "2024-12-03T14:00:00.000000Z",
                ("Alice", "mock-alice"),
            ),
        ),
        (
            "mock-3",
            mock(
                "Morning Coffee (Mock)",
                "Coffee",
                "Campus Cafe",
                (10, 5),
                ("2024-12-27", "09:00"),
                "2024-12-03T08:00:00.000000Z",
                ("Bob", "mock-bob"),
            ),
        ),
    ]
}

/// Adds the demo events and returns their ids.
pub async fn seed_demo_events(store: &dyn DocumentStore) -> Result<Vec<String>, TogetherError> {
    let events = CollectionRef::root(collections::EVENTS)?;
    let mut ids = Vec::new();
    for event in demo_events() {
        let id = store.add(&events, to_fields(&event)?).await?;
        info!(
            "Added event: {}",
            event.title.as_deref().unwrap_or_default()
        );
        ids.push(id);
    }
    Ok(ids)
}

/// Writes the mock events under their fixed ids.
pub async fn seed_mock_events(store: &dyn DocumentStore) -> Result<(), TogetherError> {
    let events = CollectionRef::root(collections::EVENTS)?;
    for (id, event) in mock_events() {
        store
            .set(&events.doc(id)?, to_fields(&event)?, SetMode::Overwrite)
            .await?;
        info!("Added mock event: {}", id);
    }
    Ok(())
}
