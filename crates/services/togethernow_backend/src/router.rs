// --- File: crates/services/togethernow_backend/src/router.rs ---
use axum::{extract::State, http::StatusCode, response::Response, routing::get, Router};
use http::HeaderValue;
use serde_json::json;
use std::sync::Arc;
use togethernow_common::{with_status, AppState};
use togethernow_config::CorsConfig;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    services::ServeFile,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// `200 {"status": "ok"}`, or `500` with the initialization error.
async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.init_error() {
        None => with_status(StatusCode::OK, json!({"status": "ok"})),
        Some(reason) => with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"status": "error", "message": reason}),
        ),
    }
}

/// `*` mirrors any origin and allows credentials; anything else is an allow-list.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::very_permissive();
    }
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(feature = "openapi")]
fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    use togethernow_auth::doc::AuthApiDoc;
    use togethernow_events::doc::EventsApiDoc;
    use togethernow_social::doc::SocialApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "TogetherNow API",
            version = "0.1.0",
            description = "Find people for activities, chat and make friends"
        ),
        tags((name = "TogetherNow", description = "Core service endpoints"))
    )]
    struct ApiDoc;

    let mut openapi_doc = ApiDoc::openapi();
    openapi_doc.merge(AuthApiDoc::openapi());
    openapi_doc.merge(EventsApiDoc::openapi());
    openapi_doc.merge(SocialApiDoc::openapi());
    info!("Adding Swagger UI at /docs");

    SwaggerUi::new("/docs").url("/docs/openapi.json", openapi_doc)
}

/// Assembles every route with CORS and request tracing.
pub fn build_router(state: Arc<AppState>) -> Router {
    let index_path = state.config.server.index_path.clone();
    info!("Serving {} at /", index_path);

    let core = Router::new()
        .route("/health", get(health_handler))
        .with_state(state.clone());

    #[allow(unused_mut)]
    let mut app = Router::new()
        .route_service("/", ServeFile::new(index_path))
        .merge(core)
        .merge(togethernow_auth::routes(state.clone()))
        .merge(togethernow_events::routes(state.clone()))
        .merge(togethernow_social::routes(state.clone()));

    #[cfg(feature = "openapi")]
    {
        app = app.merge(swagger_ui());
    }

    app.layer(cors_layer(&state.config.cors))
        .layer(TraceLayer::new_for_http())
}
