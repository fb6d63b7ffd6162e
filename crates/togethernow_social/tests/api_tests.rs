use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use togethernow_auth::LocalIdentityService;
use togethernow_common::{AppState, AuthUser, Services};
use togethernow_config::AppConfig;
use togethernow_social::routes;
use togethernow_store::{to_fields, CollectionRef, DocumentStore, MemoryStore, SetMode};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    identity: Arc<LocalIdentityService>,
}

impl TestApp {
    fn new() -> Self {
        let config = Arc::new(AppConfig::default());
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(LocalIdentityService::new(&config.local_identity));
        let services = Services {
            store: store.clone(),
            identity: identity.clone(),
        };
        Self {
            router: routes(Arc::new(AppState::new(config, services))),
            store,
            identity,
        }
    }

    fn token(&self, uid: &str) -> String {
        let user = AuthUser {
            uid: uid.to_string(),
            name: Some(format!("{} name", uid)),
            email: None,
        };
        self.identity.issue_token(&user).unwrap()
    }

    fn nameless_token(&self, uid: &str) -> String {
        self.identity.issue_token(&AuthUser::new(uid)).unwrap()
    }

    async fn put(&self, path: &str, id: &str, data: Value) {
        let doc = CollectionRef::root(path).unwrap().doc(id).unwrap();
        self.store
            .set(&doc, to_fields(&data).unwrap(), SetMode::Overwrite)
            .await
            .unwrap();
    }

    async fn exists(&self, owner: &str, collection: &str, id: &str) -> bool {
        let doc = CollectionRef::root("users")
            .unwrap()
            .doc(owner)
            .unwrap()
            .collection(collection)
            .unwrap()
            .doc(id)
            .unwrap();
        self.store.get(&doc).await.unwrap().is_some()
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header("authorization", format!("Bearer {}", token));
        }
        let body = match body {
            Some(body) => {
                request = request.header("content-type", "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}

#[tokio::test]
async fn profiles_are_public_and_merged_by_their_owner() {
    let app = TestApp::new();
    let ada = app.token("ada");

    let (status, body) = app.call("GET", "/users/ada", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (status, body) = app
        .call("POST", "/users/profile", Some(&ada), Some(json!({"title": "Host"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Profile updated"}));

    let (_, body) = app.call("GET", "/users/ada", None, None).await;
    assert_eq!(body, json!({"title": "Host"}));

    let (status, _) = app
        .call("POST", "/users/profile", Some(&ada), Some(json!("just text")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call("POST", "/users/profile", None, Some(json!({"title": "x"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reviews_are_added_summarized_and_deleted() {
    let app = TestApp::new();
    let ada = app.token("ada");
    let carol = app.token("carol");

    let (status, body) = app
        .call(
            "POST",
            "/reviews",
            Some(&ada),
            Some(json!({"target_uid": "bob", "rating": 4, "comment": "fun"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": "Review added"}));
    app.call(
        "POST",
        "/reviews",
        Some(&carol),
        Some(json!({"target_uid": "bob", "rating": "5", "comment": "great"})),
    )
    .await;

    let (status, body) = app
        .call(
            "POST",
            "/reviews",
            Some(&ada),
            Some(json!({"target_uid": "bob", "rating": 0, "comment": "x"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing fields"}));

    let (status, summary) = app.call("GET", "/reviews/bob", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_reviews"], json!(2));
    assert_eq!(summary["average_rating"], json!(4.5));

    let ada_review = summary["reviews"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["reviewer_uid"] == json!("ada"))
        .unwrap();
    assert_eq!(ada_review["reviewer_name"], json!("ada name"));
    let uri = format!("/reviews/{}", ada_review["id"].as_str().unwrap());

    let (status, _) = app.call("DELETE", &uri, Some(&carol), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.call("DELETE", &uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Review deleted"}));
    let (status, body) = app.call("DELETE", &uri, Some(&ada), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));

    let (_, empty) = app.call("GET", "/reviews/nobody", None, None).await;
    assert_eq!(
        empty,
        json!({"reviews": [], "average_rating": 0.0, "total_reviews": 0})
    );
}

#[tokio::test]
async fn friend_request_accept_and_remove() {
    let app = TestApp::new();
    let ada = app.token("ada");
    let bob = app.token("bob");
    app.put("users", "ada", json!({"name": "Ada", "title": "Host"})).await;
    app.put("users", "bob", json!({"name": "Bob"})).await;

    let (status, body) = app
        .call("POST", "/friends/request", Some(&ada), Some(json!({"target_uid": "bob"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Request sent"}));

    let (_, sent) = app.call("GET", "/friends/sent_requests", Some(&ada), None).await;
    assert_eq!(sent, json!([{"target_uid": "bob", "name": "Bob", "title": ""}]));

    let (_, incoming) = app.call("GET", "/friends/requests", Some(&bob), None).await;
    assert_eq!(incoming[0]["sender_uid"], json!("ada"));
    assert_eq!(incoming[0]["sender_name"], json!("ada name"));

    let (status, body) = app
        .call("POST", "/friends/accept", Some(&bob), Some(json!({"requester_uid": "ada"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Friend accepted"}));
    assert!(app.exists("ada", "friends", "bob").await);
    assert!(app.exists("bob", "friends", "ada").await);
    assert!(!app.exists("bob", "friend_requests", "ada").await);
    assert!(!app.exists("ada", "sent_requests", "bob").await);

    let (status, body) = app
        .call("POST", "/friends/request", Some(&ada), Some(json!({"target_uid": "bob"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Already friends"}));

    let (status, body) = app.call("DELETE", "/friends/ada", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Friend removed"}));
    assert!(!app.exists("ada", "friends", "bob").await);

    let cy = app.nameless_token("cy");
    app.call("POST", "/friends/request", Some(&cy), Some(json!({"target_uid": "bob"})))
        .await;
    let (_, incoming) = app.call("GET", "/friends/requests", Some(&bob), None).await;
    assert_eq!(incoming[0]["sender_uid"], json!("cy"));
    assert_eq!(incoming[0]["sender_name"], json!("Unknown"));
}

#[tokio::test]
async fn friend_request_validation() {
    let app = TestApp::new();
    let ada = app.token("ada");

    let cases = [
        ("/friends/request", json!({}), "Target UID required"),
        (
            "/friends/request",
            json!({"target_uid": "ada"}),
            "Cannot send a friend request to yourself",
        ),
        ("/friends/accept", json!({}), "Requester UID required"),
        ("/friends/reject", json!({}), "Requester UID required"),
        ("/friends/cancel_request", json!({}), "Target UID required"),
    ];
    for (uri, body, error) in cases {
        let (status, response) = app.call("POST", uri, Some(&ada), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(response, json!({"error": error}));
    }

    let (status, body) = app
        .call("POST", "/friends/accept", Some(&ada), Some(json!({"requester_uid": "bob"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Friend request not found"}));
}

#[tokio::test]
async fn reject_and_cancel_clear_both_halves() {
    let app = TestApp::new();
    let ada = app.token("ada");
    let bob = app.token("bob");

    app.call("POST", "/friends/request", Some(&ada), Some(json!({"target_uid": "bob"})))
        .await;
    let (_, body) = app
        .call("POST", "/friends/reject", Some(&bob), Some(json!({"requester_uid": "ada"})))
        .await;
    assert_eq!(body, json!({"message": "Request rejected"}));
    assert!(!app.exists("bob", "friend_requests", "ada").await);
    assert!(!app.exists("ada", "sent_requests", "bob").await);

    app.call("POST", "/friends/request", Some(&ada), Some(json!({"target_uid": "bob"})))
        .await;
    let (_, body) = app
        .call(
            "POST",
            "/friends/cancel_request",
            Some(&ada),
            Some(json!({"target_uid": "bob"})),
        )
        .await;
    assert_eq!(body, json!({"message": "Request cancelled"}));
    assert!(!app.exists("bob", "friend_requests", "ada").await);
    assert!(!app.exists("ada", "sent_requests", "bob").await);
}

#[tokio::test]
async fn friends_list_shows_profiles_and_active_events() {
    let app = TestApp::new();
    let ada = app.token("ada");
    app.put("users", "bob", json!({"name": "Bob", "title": "Drummer"})).await;
    app.put("users", "carol", json!({"name": "Carol"})).await;
    app.put("events", "e1", json!({"title": "Jam session", "members": ["bob"]})).await;
    for friend in ["bob", "carol", "ghost"] {
        let doc = CollectionRef::root("users")
            .unwrap()
            .doc("ada")
            .unwrap()
            .collection("friends")
            .unwrap()
            .doc(friend)
            .unwrap();
        let friendship = to_fields(&json!({"added_at": "2026-03-01T00:00:00.000000Z"})).unwrap();
        app.store
            .set(&doc, friendship, SetMode::Overwrite)
            .await
            .unwrap();
    }

    let (status, friends) = app.call("GET", "/friends", Some(&ada), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        friends,
        json!([
            {"uid": "bob", "name": "Bob", "title": "Drummer", "active_event": "Jam session"},
            {"uid": "carol", "name": "Carol", "title": "", "active_event": null}
        ])
    );
}

#[tokio::test]
async fn direct_messages_are_shared_by_both_participants() {
    let app = TestApp::new();
    let ada = app.token("ada");
    let bob = app.token("bob");

    let (status, stored) = app
        .call("POST", "/friends/bob/chat", Some(&ada), Some(json!({"message": "hi bob"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stored["sender_uid"], json!("ada"));
    assert_eq!(stored["message"], json!("hi bob"));

    let (status, messages) = app.call("GET", "/friends/ada/chat", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(messages.as_array().unwrap().len(), 1);
    assert_eq!(messages[0]["id"], stored["id"]);

    let (status, body) = app
        .call("POST", "/friends/bob/chat", Some(&ada), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Message required"}));
}
