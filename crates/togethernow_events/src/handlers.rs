// --- File: crates/togethernow_events/src/handlers.rs ---
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use std::sync::Arc;
use togethernow_common::{message, status, with_status, ApiResult, AppState, AuthUser, JsonBody};

use crate::logic::{self, ChatRequest, CreateEventRequest, JoinRequest, TargetRequest};

/// Handler for `GET /events`.
pub async fn list_events_handler(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let services = state.services()?;
    let events = logic::list_events(services.store.as_ref()).await?;
    Ok(with_status(StatusCode::OK, events))
}

/// Handler for `POST /events`.
pub async fn create_event_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(request): JsonBody<CreateEventRequest>,
) -> ApiResult<Response> {
    let services = state.services()?;
    let created = logic::create_event(services.store.as_ref(), &user, &request).await?;
    Ok(with_status(StatusCode::CREATED, created))
}

/// Handler for `POST /join`.
pub async fn join_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(request): JsonBody<JoinRequest>,
) -> ApiResult<Response> {
    let services = state.services()?;
    let outcome =
        logic::toggle_membership(services.store.as_ref(), &user, request.event_id.as_deref())
            .await?;
    Ok(status(outcome.as_str()))
}

/// Handler for `DELETE /events/{id}`.
pub async fn delete_event_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> ApiResult<Response> {
    let services = state.services()?;
    logic::delete_event(services.store.as_ref(), &user, &event_id).await?;
    Ok(message(StatusCode::OK, "Deleted"))
}

/// Handler for `POST /events/{id}/kick`.
pub async fn kick_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
    JsonBody(request): JsonBody<TargetRequest>,
) -> ApiResult<Response> {
    let services = state.services()?;
    logic::kick_member(
        services.store.as_ref(),
        &user,
        &event_id,
        request.target_uid.as_deref(),
    )
    .await?;
    Ok(status("kicked"))
}

/// Handler for `POST /events/{id}/unblock`.
pub async fn unblock_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
    JsonBody(request): JsonBody<TargetRequest>,
) -> ApiResult<Response> {
    let services = state.services()?;
    logic::unblock_member(
        services.store.as_ref(),
        &user,
        &event_id,
        request.target_uid.as_deref(),
    )
    .await?;
    Ok(status("unblocked"))
}

/// Handler for `GET /events/{id}/blocked`.
pub async fn blocked_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> ApiResult<Response> {
    let services = state.services()?;
    let blocked = logic::blocked_users(services.store.as_ref(), &user, &event_id).await?;
    Ok(with_status(StatusCode::OK, blocked))
}

/// Handler for `GET /events/{id}/members`.
pub async fn members_handler(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> ApiResult<Response> {
    let services = state.services()?;
    let members = logic::event_members(services.store.as_ref(), &event_id).await?;
    Ok(with_status(StatusCode::OK, members))
}

/// Handler for `GET /events/{id}/chat`.
pub async fn get_chat_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
) -> ApiResult<Response> {
    let services = state.services()?;
    let messages = logic::chat_messages(services.store.as_ref(), &user, &event_id).await?;
    Ok(with_status(StatusCode::OK, messages))
}

/// Handler for `POST /events/{id}/chat`.
pub async fn post_chat_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(event_id): Path<String>,
    JsonBody(request): JsonBody<ChatRequest>,
) -> ApiResult<Response> {
    let services = state.services()?;
    let stored = logic::post_chat_message(
        services.store.as_ref(),
        &user,
        &event_id,
        request.message.as_deref(),
    )
    .await?;
    Ok(with_status(StatusCode::CREATED, stored))
}
