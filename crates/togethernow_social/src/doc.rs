// --- File: crates/togethernow_social/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]

use crate::friends::{FriendSummary, RequesterRequest, SentRequestSummary, TargetRequest};
use crate::handlers::MessageRequest;
use crate::reviews::{ReviewRequest, ReviewSummary};
use togethernow_common::models::{ChatMessage, FriendRequest};
use utoipa::OpenApi;

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile document, `{}` when the user has none",
         example = json!({"name": "Ada", "title": "Organizer", "bio": ""}))
    ),
    tag = "Profiles"
)]
fn doc_get_profile() {}

#[utoipa::path(
    post,
    path = "/users/profile",
    responses(
        (status = 200, description = "Posted JSON object merged into the caller's profile",
         example = json!({"message": "Profile updated"})),
        (status = 400, description = "Body is not a JSON object")
    ),
    security(("bearer" = [])),
    tag = "Profiles"
)]
fn doc_update_profile() {}

#[utoipa::path(
    post,
    path = "/reviews",
    request_body(content = ReviewRequest, example = json!({
        "target_uid": "bob",
        "rating": 5,
        "comment": "Great host"
    })),
    responses(
        (status = 201, description = "Review stored", example = json!({"message": "Review added"})),
        (status = 400, description = "Missing fields")
    ),
    security(("bearer" = [])),
    tag = "Reviews"
)]
fn doc_add_review() {}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = String, Path, description = "Review id")),
    responses(
        (status = 200, description = "Deleted", example = json!({"message": "Review deleted"})),
        (status = 403, description = "Not the reviewer"),
        (status = 404, description = "No such review")
    ),
    security(("bearer" = [])),
    tag = "Reviews"
)]
fn doc_delete_review() {}

#[utoipa::path(
    get,
    path = "/reviews/{id}",
    params(("id" = String, Path, description = "Reviewed user's id")),
    responses((status = 200, description = "Reviews and average rating", body = ReviewSummary)),
    tag = "Reviews"
)]
fn doc_get_reviews() {}

#[utoipa::path(
    post,
    path = "/friends/request",
    request_body = TargetRequest,
    responses(
        (status = 200, description = "Request sent", example = json!({"message": "Request sent"})),
        (status = 400, description = "Missing target, own uid, or already friends")
    ),
    security(("bearer" = [])),
    tag = "Friends"
)]
fn doc_send_request() {}

#[utoipa::path(
    post,
    path = "/friends/accept",
    request_body = RequesterRequest,
    responses(
        (status = 200, description = "Friendship created", example = json!({"message": "Friend accepted"})),
        (status = 400, description = "Requester UID required"),
        (status = 404, description = "Friend request not found")
    ),
    security(("bearer" = [])),
    tag = "Friends"
)]
fn doc_accept_request() {}

#[utoipa::path(
    post,
    path = "/friends/reject",
    request_body = RequesterRequest,
    responses(
        (status = 200, description = "Request removed", example = json!({"message": "Request rejected"})),
        (status = 400, description = "Requester UID required")
    ),
    security(("bearer" = [])),
    tag = "Friends"
)]
fn doc_reject_request() {}

#[utoipa::path(
    post,
    path = "/friends/cancel_request",
    request_body = TargetRequest,
    responses(
        (status = 200, description = "Request withdrawn", example = json!({"message": "Request cancelled"})),
        (status = 400, description = "Target UID required")
    ),
    security(("bearer" = [])),
    tag = "Friends"
)]
fn doc_cancel_request() {}

#[utoipa::path(
    get,
    path = "/friends/requests",
    responses((status = 200, description = "Incoming requests", body = [FriendRequest])),
    security(("bearer" = [])),
    tag = "Friends"
)]
fn doc_incoming_requests() {}

#[utoipa::path(
    get,
    path = "/friends/sent_requests",
    responses((status = 200, description = "Outgoing requests", body = [SentRequestSummary])),
    security(("bearer" = [])),
    tag = "Friends"
)]
fn doc_sent_requests() {}

#[utoipa::path(
    get,
    path = "/friends",
    responses((status = 200, description = "Friends with an active event", body = [FriendSummary])),
    security(("bearer" = [])),
    tag = "Friends"
)]
fn doc_list_friends() {}

#[utoipa::path(
    delete,
    path = "/friends/{uid}",
    params(("uid" = String, Path, description = "Friend's id")),
    responses((status = 200, description = "Friendship removed", example = json!({"message": "Friend removed"}))),
    security(("bearer" = [])),
    tag = "Friends"
)]
fn doc_remove_friend() {}

#[utoipa::path(
    get,
    path = "/friends/{uid}/chat",
    params(("uid" = String, Path, description = "The other participant")),
    responses((status = 200, description = "Messages, oldest first", body = [ChatMessage])),
    security(("bearer" = [])),
    tag = "Direct messages"
)]
fn doc_get_chat() {}

#[utoipa::path(
    post,
    path = "/friends/{uid}/chat",
    params(("uid" = String, Path, description = "The other participant")),
    request_body = MessageRequest,
    responses(
        (status = 201, description = "Stored message", body = ChatMessage),
        (status = 400, description = "Message required")
    ),
    security(("bearer" = [])),
    tag = "Direct messages"
)]
fn doc_post_chat() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_profile,
        doc_update_profile,
        doc_add_review,
        doc_delete_review,
        doc_get_reviews,
        doc_send_request,
        doc_accept_request,
        doc_reject_request,
        doc_cancel_request,
        doc_incoming_requests,
        doc_sent_requests,
        doc_list_friends,
        doc_remove_friend,
        doc_get_chat,
        doc_post_chat
    ),
    components(schemas(
        ReviewRequest,
        ReviewSummary,
        TargetRequest,
        RequesterRequest,
        SentRequestSummary,
        FriendSummary,
        FriendRequest,
        MessageRequest,
        ChatMessage
    )),
    tags(
        (name = "Profiles", description = "User profiles"),
        (name = "Reviews", description = "Ratings users give each other"),
        (name = "Friends", description = "Friend requests and friendships"),
        (name = "Direct messages", description = "One-to-one chats")
    )
)]
pub struct SocialApiDoc;
