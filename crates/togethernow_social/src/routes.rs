// --- File: crates/togethernow_social/src/routes.rs ---
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use togethernow_common::AppState;

use crate::handlers::*;

/// Creates a router containing the profile, review, friend and direct
/// message routes.
pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/users/profile", post(update_profile_handler))
        .route("/users/{id}", get(get_profile_handler))
        .route("/reviews", post(add_review_handler))
        .route(
            "/reviews/{id}",
            get(get_reviews_handler).delete(delete_review_handler),
        )
        .route("/friends", get(list_friends_handler))
        .route("/friends/request", post(send_request_handler))
        .route("/friends/accept", post(accept_request_handler))
        .route("/friends/reject", post(reject_request_handler))
        .route("/friends/cancel_request", post(cancel_request_handler))
        .route("/friends/requests", get(incoming_requests_handler))
        .route("/friends/sent_requests", get(sent_requests_handler))
        .route("/friends/{uid}", delete(remove_friend_handler))
        .route(
            "/friends/{uid}/chat",
            get(get_chat_handler).post(post_chat_handler),
        )
        .with_state(state)
}
