// --- File: crates/togethernow_social/src/handlers.rs ---
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use togethernow_common::{message, with_status, ApiResult, AppState, AuthUser, JsonBody};

use crate::direct_messages::{conversation, send_message};
use crate::friends::{self, RequesterRequest, TargetRequest};
use crate::profiles::{get_profile, update_profile};
use crate::reviews::{add_review, delete_review, reviews_for, ReviewRequest};

/// Body of `POST /friends/{uid}/chat`.
#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Handler for `GET /users/{id}`.
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> ApiResult<Response> {
    let services = state.services()?;
    let profile = get_profile(services.store.as_ref(), &uid).await?;
    Ok(with_status(StatusCode::OK, profile))
}

/// Handler for `POST /users/profile`.
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(fields): JsonBody<Value>,
) -> ApiResult<Response> {
    let services = state.services()?;
    update_profile(services.store.as_ref(), &user, fields).await?;
    Ok(message(StatusCode::OK, "Profile updated"))
}

/// Handler for `POST /reviews`.
pub async fn add_review_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(request): JsonBody<ReviewRequest>,
) -> ApiResult<Response> {
    let services = state.services()?;
    add_review(services.store.as_ref(), &user, &request).await?;
    Ok(message(StatusCode::CREATED, "Review added"))
}

/// Handler for `DELETE /reviews/{id}`.
pub async fn delete_review_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(review_id): Path<String>,
) -> ApiResult<Response> {
    let services = state.services()?;
    delete_review(services.store.as_ref(), &user, &review_id).await?;
    Ok(message(StatusCode::OK, "Review deleted"))
}

/// Handler for `GET /reviews/{user_id}`.
pub async fn get_reviews_handler(
    State(state): State<Arc<AppState>>,
    Path(target_uid): Path<String>,
) -> ApiResult<Response> {
    let services = state.services()?;
    let summary = reviews_for(services.store.as_ref(), &target_uid).await?;
    Ok(with_status(StatusCode::OK, summary))
}

/// Handler for `POST /friends/request`.
pub async fn send_request_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(request): JsonBody<TargetRequest>,
) -> ApiResult<Response> {
    let services = state.services()?;
    friends::send_request(services.store.as_ref(), &user, request.target_uid.as_deref()).await?;
    Ok(message(StatusCode::OK, "Request sent"))
}

/// Handler for `POST /friends/accept`.
pub async fn accept_request_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(request): JsonBody<RequesterRequest>,
) -> ApiResult<Response> {
    let services = state.services()?;
    friends::accept_request(
        services.store.as_ref(),
        &user,
        request.requester_uid.as_deref(),
    )
    .await?;
    Ok(message(StatusCode::OK, "Friend accepted"))
}

/// Handler for `POST /friends/reject`.
pub async fn reject_request_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(request): JsonBody<RequesterRequest>,
) -> ApiResult<Response> {
    let services = state.services()?;
    friends::reject_request(
        services.store.as_ref(),
        &user,
        request.requester_uid.as_deref(),
    )
    .await?;
    Ok(message(StatusCode::OK, "Request rejected"))
}

/// Handler for `POST /friends/cancel_request`.
pub async fn cancel_request_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(request): JsonBody<TargetRequest>,
) -> ApiResult<Response> {
    let services = state.services()?;
    friends::cancel_request(services.store.as_ref(), &user, request.target_uid.as_deref())
        .await?;
    Ok(message(StatusCode::OK, "Request cancelled"))
}

/// Handler for `GET /friends/requests`.
pub async fn incoming_requests_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Response> {
    let services = state.services()?;
    let requests = friends::incoming_requests(services.store.as_ref(), &user).await?;
    Ok(with_status(StatusCode::OK, requests))
}

/// Handler for `GET /friends/sent_requests`.
pub async fn sent_requests_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Response> {
    let services = state.services()?;
    let requests = friends::sent_requests(services.store.as_ref(), &user).await?;
    Ok(with_status(StatusCode::OK, requests))
}

/// Handler for `GET /friends`.
pub async fn list_friends_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Response> {
    let services = state.services()?;
    let friends = friends::list_friends(services.store.as_ref(), &user).await?;
    Ok(with_status(StatusCode::OK, friends))
}

/// Handler for `DELETE /friends/{uid}`.
pub async fn remove_friend_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(friend_uid): Path<String>,
) -> ApiResult<Response> {
    let services = state.services()?;
    friends::remove_friend(services.store.as_ref(), &user, &friend_uid).await?;
    Ok(message(StatusCode::OK, "Friend removed"))
}

/// Handler for `GET /friends/{uid}/chat`.
pub async fn get_chat_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(other): Path<String>,
) -> ApiResult<Response> {
    let services = state.services()?;
    let messages = conversation(services.store.as_ref(), &user, &other).await?;
    Ok(with_status(StatusCode::OK, messages))
}

/// Handler for `POST /friends/{uid}/chat`.
pub async fn post_chat_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(other): Path<String>,
    JsonBody(request): JsonBody<MessageRequest>,
) -> ApiResult<Response> {
    let services = state.services()?;
    let stored = send_message(
        services.store.as_ref(),
        &user,
        &other,
        request.message.as_deref(),
    )
    .await?;
    Ok(with_status(StatusCode::CREATED, stored))
}
