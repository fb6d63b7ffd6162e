// --- File: crates/togethernow_events/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]

use crate::logic::{ChatRequest, CreateEventRequest, CreatedResponse, JoinRequest, TargetRequest};
use togethernow_common::models::{ChatMessage, MemberSummary};
use utoipa::OpenApi;

#[utoipa::path(
    get,
    path = "/events",
    responses(
        (status = 200, description = "All events, newest first, each with its id",
         example = json!([{
             "id": "3fJ2kq",
             "title": "Pickup Basketball 3v3",
             "category": "Sports",
             "max_people": 6,
             "current_people": 4,
             "members": ["system_demo_user"]
         }])),
        (status = 500, description = "Backend failed to initialize")
    ),
    tag = "Events"
)]
fn doc_list_events() {}

#[utoipa::path(
    post,
    path = "/events",
    request_body(content = CreateEventRequest, example = json!({
        "title": "Morning Run",
        "category": "Sports",
        "location": "North Gate",
        "max_people": "8",
        "event_date": "2026-11-02",
        "event_time": "07:00"
    })),
    responses(
        (status = 201, description = "Event created", body = CreatedResponse),
        (status = 400, description = "max_people missing or not a positive integer"),
        (status = 401, description = "Missing or invalid ID token")
    ),
    security(("bearer" = [])),
    tag = "Events"
)]
fn doc_create_event() {}

#[utoipa::path(
    post,
    path = "/join",
    request_body = JoinRequest,
    responses(
        (status = 200, description = "Joined or left", example = json!({"status": "joined"})),
        (status = 400, description = "Event is full"),
        (status = 403, description = "Kicked from this event"),
        (status = 404, description = "No such event")
    ),
    security(("bearer" = [])),
    tag = "Events"
)]
fn doc_join() {}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Deleted", example = json!({"message": "Deleted"})),
        (status = 403, description = "Not the creator, or no such event")
    ),
    security(("bearer" = [])),
    tag = "Events"
)]
fn doc_delete_event() {}

#[utoipa::path(
    post,
    path = "/events/{id}/kick",
    params(("id" = String, Path, description = "Event id")),
    request_body = TargetRequest,
    responses(
        (status = 200, description = "Member removed", example = json!({"status": "kicked"})),
        (status = 400, description = "Target UID required or user not in event"),
        (status = 403, description = "Not the creator"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer" = [])),
    tag = "Events"
)]
fn doc_kick() {}

#[utoipa::path(
    post,
    path = "/events/{id}/unblock",
    params(("id" = String, Path, description = "Event id")),
    request_body = TargetRequest,
    responses(
        (status = 200, description = "User may join again", example = json!({"status": "unblocked"})),
        (status = 400, description = "Target UID required"),
        (status = 403, description = "Not the creator"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer" = [])),
    tag = "Events"
)]
fn doc_unblock() {}

#[utoipa::path(
    get,
    path = "/events/{id}/blocked",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Kicked users", body = [MemberSummary]),
        (status = 403, description = "Not the creator"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer" = [])),
    tag = "Events"
)]
fn doc_blocked() {}

#[utoipa::path(
    get,
    path = "/events/{id}/members",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Members with name and title", body = [MemberSummary]),
        (status = 404, description = "Event not found")
    ),
    tag = "Events"
)]
fn doc_members() {}

#[utoipa::path(
    get,
    path = "/events/{id}/chat",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Messages, oldest first", body = [ChatMessage]),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer" = [])),
    tag = "Events"
)]
fn doc_get_chat() {}

#[utoipa::path(
    post,
    path = "/events/{id}/chat",
    params(("id" = String, Path, description = "Event id")),
    request_body(content = ChatRequest, example = json!({"message": "Running late, save me a spot"})),
    responses(
        (status = 201, description = "Stored message", body = ChatMessage),
        (status = 400, description = "Message required"),
        (status = 403, description = "Not a member")
    ),
    security(("bearer" = [])),
    tag = "Events"
)]
fn doc_post_chat() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_list_events,
        doc_create_event,
        doc_join,
        doc_delete_event,
        doc_kick,
        doc_unblock,
        doc_blocked,
        doc_members,
        doc_get_chat,
        doc_post_chat
    ),
    components(schemas(
        CreateEventRequest,
        CreatedResponse,
        JoinRequest,
        TargetRequest,
        ChatRequest,
        ChatMessage,
        MemberSummary
    )),
    tags((name = "Events", description = "Events, membership, moderation and event chat"))
)]
pub struct EventsApiDoc;
