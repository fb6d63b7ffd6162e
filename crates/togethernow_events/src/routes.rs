// --- File: crates/togethernow_events/src/routes.rs ---
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use togethernow_common::AppState;

use crate::handlers::{
    blocked_handler, create_event_handler, delete_event_handler, get_chat_handler, join_handler,
    kick_handler, list_events_handler, members_handler, post_chat_handler, unblock_handler,
};

/// Creates a router containing the event routes.
pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/events", get(list_events_handler).post(create_event_handler))
        .route("/join", post(join_handler))
        .route("/events/{id}", delete(delete_event_handler))
        .route("/events/{id}/kick", post(kick_handler))
        .route("/events/{id}/unblock", post(unblock_handler))
        .route("/events/{id}/blocked", get(blocked_handler))
        .route("/events/{id}/members", get(members_handler))
        .route("/events/{id}/chat", get(get_chat_handler).post(post_chat_handler))
        .with_state(state)
}
