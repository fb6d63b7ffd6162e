// --- File: crates/togethernow_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

use crate::error::{HttpStatusCode, TogetherError};

pub mod client;

/// Extension trait for TogetherError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for TogetherError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            error!("{} responding with {}", status_code, self);
        } else {
            debug!("{} responding with {}", status_code, self);
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status_code, body).into_response()
    }
}

impl IntoResponse for TogetherError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Result type of route handlers.
pub type ApiResult<T> = Result<T, TogetherError>;

/// A JSON body with an explicit status code, e.g. `201 Created`.
pub fn with_status<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}

/// `{"message": ...}` with the given status.
pub fn message(status: StatusCode, text: &str) -> Response {
    with_status(status, json!({ "message": text }))
}

/// `{"status": ...}` with `200 OK`.
pub fn status(text: &str) -> Response {
    with_status(StatusCode::OK, json!({ "status": text }))
}
