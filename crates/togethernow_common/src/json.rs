// --- File: crates/togethernow_common/src/json.rs ---
//! JSON request bodies whose rejections render as `{"error": ...}`.

use axum::extract::{rejection::JsonRejection, FromRequest};

use crate::error::TogetherError;

/// `axum::Json` with malformed, mistyped or non-JSON bodies mapped to a `400`.
#[derive(FromRequest, Debug)]
#[from_request(via(axum::Json), rejection(TogetherError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for TogetherError {
    fn from(rejection: JsonRejection) -> Self {
        TogetherError::ValidationError(rejection.body_text())
    }
}
