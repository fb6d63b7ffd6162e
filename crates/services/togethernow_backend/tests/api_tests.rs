use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use togethernow_backend::{build_router, service_factory::local_services};
use togethernow_common::AppState;
use togethernow_config::{AppConfig, BackendKind, CorsConfig, RecaptchaConfig, ServerConfig};
use tower::ServiceExt;

fn local_config() -> AppConfig {
    AppConfig {
        backend: BackendKind::Local,
        recaptcha: RecaptchaConfig {
            enabled: false,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn local_app(config: AppConfig) -> Router {
    let services = local_services(&config);
    build_router(Arc::new(AppState::new(Arc::new(config), services)))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut request = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    request.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn health_reports_ok_or_the_init_error() {
    let (status, body) = send(
        &local_app(local_config()),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let failed = AppState::failed(
        Arc::new(AppConfig::default()),
        "serviceAccountKey.json not found",
    );
    let router = build_router(Arc::new(failed));
    let (status, body) = send(
        &router,
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"status": "error", "message": "serviceAccountKey.json not found"})
    );

    let (status, body) = send(&router, Request::get("/events").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Backend failed to initialize: serviceAccountKey.json not found"})
    );
}

#[tokio::test]
async fn index_page_is_served_at_root() {
    let mut index = tempfile::NamedTempFile::new().unwrap();
    write!(index, "<h1>TogetherNow</h1>").unwrap();
    let config = AppConfig {
        server: ServerConfig {
            index_path: index.path().to_string_lossy().into_owned(),
            ..Default::default()
        },
        ..local_config()
    };

    let response = local_app(config)
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"<h1>TogetherNow</h1>");
}

#[tokio::test]
async fn any_origin_is_mirrored_with_credentials() {
    let response = local_app(local_config())
        .oneshot(
            Request::get("/health")
                .header(header::ORIGIN, "https://app.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://app.example.com"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn origins_outside_the_allow_list_get_no_cors_headers() {
    let config = AppConfig {
        cors: CorsConfig {
            allowed_origins: vec!["https://togethernow.app".to_string()],
        },
        ..local_config()
    };
    let response = local_app(config)
        .oneshot(
            Request::get("/health")
                .header(header::ORIGIN, "https://evil.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn signup_create_join_and_chat_end_to_end() {
    let app = local_app(local_config());

    let (status, body) = send(
        &app,
        post(
            "/auth/signup",
            None,
            json!({"email": "ada@example.com", "password": "secret1", "name": "Ada"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let ada = body["token"].as_str().unwrap().to_string();

    send(
        &app,
        post(
            "/auth/signup",
            None,
            json!({"email": "bob@example.com", "password": "secret2", "name": "Bob"}),
        ),
    )
    .await;
    let (status, body) = send(
        &app,
        post(
            "/auth/login",
            None,
            json!({"email": "bob@example.com", "password": "secret2"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let bob = body["token"].as_str().unwrap().to_string();

    let (status, created) = send(
        &app,
        post(
            "/events",
            Some(&ada),
            json!({"title": "Sunset hike", "category": "Outdoors", "max_people": 4}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = created["id"].as_str().unwrap().to_string();

    let (_, joined) = send(&app, post("/join", Some(&bob), json!({"event_id": event_id}))).await;
    assert_eq!(joined, json!({"status": "joined"}));

    let (status, members) = send(
        &app,
        Request::get(format!("/events/{}/members", event_id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = members
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Ada", "Bob"]);

    let (status, message) = send(
        &app,
        post(
            &format!("/events/{}/chat", event_id),
            Some(&bob),
            json!({"message": "See you there"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(message["sender_name"], json!("Bob"));
}
