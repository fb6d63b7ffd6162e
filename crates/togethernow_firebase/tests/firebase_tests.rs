use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::Arc;
use togethernow_common::{IdentityError, IdentityService, NewAccount};
use togethernow_config::FirebaseConfig;
use togethernow_firebase::{
    connect, CustomTokenSigner, FirebaseIdentityService, FirestoreStore, StaticTokenProvider,
};
use togethernow_store::{
    CollectionRef, Direction, DocumentStore, FieldUpdate, Filter, Query, SetMode, StoreError,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT: &str = "togethernow-test";
const DOCS: &str = "/v1/projects/togethernow-test/databases/(default)/documents";

fn service_account_json() -> String {
    std::fs::read_to_string(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/service_account.json"
    ))
    .unwrap()
}

fn jwks() -> Value {
    serde_json::from_str(
        &std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/jwks.json"))
            .unwrap(),
    )
    .unwrap()
}

fn config_for(server: &MockServer) -> FirebaseConfig {
    FirebaseConfig {
        project_id: Some(PROJECT.to_string()),
        key_path: None,
        credentials: Some(service_account_json()),
        api_key: Some("web-api-key".to_string()),
        access_token: Some("owner".to_string()),
        auth_endpoint: server.uri(),
        firestore_endpoint: server.uri(),
        jwks_url: format!("{}/jwks", server.uri()),
        ..Default::default()
    }
}

fn store_for(server: &MockServer) -> FirestoreStore {
    FirestoreStore::new(
        &config_for(server),
        PROJECT,
        Arc::new(StaticTokenProvider::new("owner")),
    )
    .unwrap()
}

fn identity_for(server: &MockServer) -> FirebaseIdentityService {
    let key = yup_oauth2::parse_service_account_key(service_account_json()).unwrap();
    let signer = CustomTokenSigner::from_service_account(&key).unwrap();
    FirebaseIdentityService::new(
        reqwest::Client::new(),
        &config_for(server),
        PROJECT,
        Arc::new(StaticTokenProvider::new("owner")),
        Some(signer),
    )
    .unwrap()
}

fn sign_id_token(claims: Value) -> String {
    sign_id_token_with_kid(claims, "test-key-1")
}

fn sign_id_token_with_kid(claims: Value, kid: &str) -> String {
    let sa: Value = serde_json::from_str(&service_account_json()).unwrap();
    let key = EncodingKey::from_rsa_pem(sa["private_key"].as_str().unwrap().as_bytes()).unwrap();
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    encode(&header, &claims, &key).unwrap()
}

fn id_token_claims(aud: &str) -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "iss": format!("https://securetoken.google.com/{}", aud),
        "aud": aud,
        "sub": "uid-123",
        "name": "Ada",
        "email": "ada@example.com",
        "iat": now,
        "exp": now + 600
    })
}

async fn mount_jwks(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/jwks"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("cache-control", "public, max-age=600")
                .set_body_json(jwks()),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn reads_and_decodes_a_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/events/e1", DOCS)))
        .and(header("authorization", "Bearer owner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": format!("projects/{}/databases/(default)/documents/events/e1", PROJECT),
            "fields": {
                "title": {"stringValue": "Morning Yoga"},
                "max_people": {"integerValue": "10"},
                "members": {"arrayValue": {"values": [{"stringValue": "u1"}]}}
            }
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let doc = CollectionRef::root("events").unwrap().doc("e1").unwrap();
    let event = store.get(&doc).await.unwrap().unwrap();

    assert_eq!(event.id, "e1");
    assert_eq!(event.get_str("title"), Some("Morning Yoga"));
    assert_eq!(event.get("max_people"), Some(&json!(10)));
    assert_eq!(event.get("members"), Some(&json!(["u1"])));
}

#[tokio::test]
async fn missing_documents_read_as_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/users/ghost", DOCS)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "Document not found", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let doc = CollectionRef::root("users").unwrap().doc("ghost").unwrap();
    assert!(store.get(&doc).await.unwrap().is_none());
}

#[tokio::test]
async fn add_returns_the_generated_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}/events/e1/messages", DOCS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": format!("projects/{}/databases/(default)/documents/events/e1/messages/m42", PROJECT),
            "fields": {"message": {"stringValue": "hi"}}
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let messages = CollectionRef::root("events")
        .unwrap()
        .doc("e1")
        .unwrap()
        .collection("messages")
        .unwrap();
    let data = togethernow_store::to_fields(&json!({"message": "hi"})).unwrap();
    assert_eq!(store.add(&messages, data).await.unwrap(), "m42");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"fields": {"message": {"stringValue": "hi"}}}));
}

#[tokio::test]
async fn merge_writes_send_an_update_mask() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path(format!("{}/users/u1", DOCS)))
        .and(query_param("updateMask.fieldPaths", "bio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": format!("projects/{}/databases/(default)/documents/users/u1", PROJECT)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let doc = CollectionRef::root("users").unwrap().doc("u1").unwrap();
    let data = togethernow_store::to_fields(&json!({"bio": "Climber"})).unwrap();
    store.set(&doc, data, SetMode::Merge).await.unwrap();
}

#[tokio::test]
async fn updates_commit_transforms_with_an_exists_precondition() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}:commit", DOCS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"writeResults": [{}]})))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let doc = CollectionRef::root("events").unwrap().doc("e1").unwrap();
    store
        .update(
            &doc,
            vec![
                FieldUpdate::array_union("members", vec![json!("u2")]),
                FieldUpdate::increment("current_people", 1),
            ],
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let write = &body["writes"][0];
    assert_eq!(
        write["update"]["name"],
        format!("projects/{}/databases/(default)/documents/events/e1", PROJECT)
    );
    assert_eq!(write["currentDocument"], json!({"exists": true}));
    assert_eq!(
        write["updateTransforms"],
        json!([
            {"fieldPath": "members", "appendMissingElements": {"values": [{"stringValue": "u2"}]}},
            {"fieldPath": "current_people", "increment": {"integerValue": "1"}}
        ])
    );
}

#[tokio::test]
async fn updating_a_missing_document_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}:commit", DOCS)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": 404, "message": "No document to update", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let doc = CollectionRef::root("events").unwrap().doc("gone").unwrap();
    let err = store
        .update(&doc, vec![FieldUpdate::increment("current_people", 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn queries_skip_rows_without_documents() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{}:runQuery", DOCS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "document": {
                    "name": format!("projects/{}/databases/(default)/documents/reviews/r1", PROJECT),
                    "fields": {"rating": {"integerValue": "5"}}
                },
                "readTime": "2024-12-03T12:00:00Z"
            },
            {"readTime": "2024-12-03T12:00:00Z"}
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let query = Query::new(CollectionRef::root("reviews").unwrap())
        .filter(Filter::equal("target_uid", "u1"))
        .order_by("created_at", Direction::Descending);
    let docs = store.query(&query).await.unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, "r1");
    assert_eq!(docs[0].get("rating"), Some(&json!(5)));
}

#[tokio::test]
async fn lists_follow_page_tokens() {
    let server = MockServer::start().await;
    let doc = |id: &str| {
        json!({"name": format!("projects/{}/databases/(default)/documents/events/{}", PROJECT, id)})
    };
    Mock::given(method("GET"))
        .and(path(format!("{}/events", DOCS)))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"documents": [doc("e3")]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/events", DOCS)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [doc("e1"), doc("e2")],
            "nextPageToken": "page-2"
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let ids: Vec<String> = store
        .list(&CollectionRef::root("events").unwrap())
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, vec!["e1", "e2", "e3"]);
}

#[tokio::test]
async fn verifies_id_tokens_against_the_published_keys() {
    let server = MockServer::start().await;
    mount_jwks(&server).await;
    let identity = identity_for(&server);

    let user = identity
        .verify_id_token(&sign_id_token(id_token_claims(PROJECT)))
        .await
        .unwrap();
    assert_eq!(user.uid, "uid-123");
    assert_eq!(user.name.as_deref(), Some("Ada"));
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn unknown_key_ids_do_not_refetch_fresh_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jwks"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("cache-control", "public, max-age=600")
                .set_body_json(jwks()),
        )
        .expect(1)
        .mount(&server)
        .await;
    let identity = identity_for(&server);

    identity
        .verify_id_token(&sign_id_token(id_token_claims(PROJECT)))
        .await
        .unwrap();
    for i in 0..20 {
        let token = sign_id_token_with_kid(id_token_claims(PROJECT), &format!("bogus-{}", i));
        let err = identity.verify_id_token(&token).await.unwrap_err();
        assert!(matches!(err, IdentityError::InvalidToken(_)));
    }
    server.verify().await;
}

#[tokio::test]
async fn rejects_id_tokens_for_another_project() {
    let server = MockServer::start().await;
    mount_jwks(&server).await;
    let identity = identity_for(&server);

    let err = identity
        .verify_id_token(&sign_id_token(id_token_claims("someone-else")))
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::InvalidToken(_)));
}

#[tokio::test]
async fn custom_tokens_carry_the_uid_and_identity_toolkit_audience() {
    let server = MockServer::start().await;
    let identity = identity_for(&server);
    let token = identity.create_custom_token("uid-123").await.unwrap();

    let jwk: jsonwebtoken::jwk::Jwk = serde_json::from_value(jwks()["keys"][0].clone()).unwrap();
    let key = jsonwebtoken::DecodingKey::from_jwk(&jwk).unwrap();
    let mut validation = jsonwebtoken::Validation::new(Algorithm::RS256);
    validation.set_audience(&[togethernow_firebase::custom_token::CUSTOM_TOKEN_AUDIENCE]);
    let claims = jsonwebtoken::decode::<Value>(&token, &key, &validation)
        .unwrap()
        .claims;

    assert_eq!(claims["uid"], "uid-123");
    assert_eq!(
        claims["iss"],
        "firebase-adminsdk@togethernow-test.iam.gserviceaccount.com"
    );
    assert_eq!(claims["sub"], claims["iss"]);
    assert_eq!(
        claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap(),
        3600
    );
}

#[tokio::test]
async fn password_sign_in_uses_the_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(query_param("key", "web-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-123",
            "email": "ada@example.com",
            "idToken": "ignored"
        })))
        .mount(&server)
        .await;

    let identity = identity_for(&server);
    assert_eq!(
        identity
            .sign_in_with_password("ada@example.com", "secret1")
            .await
            .unwrap(),
        "uid-123"
    );
}

#[tokio::test]
async fn wrong_passwords_are_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "INVALID_LOGIN_CREDENTIALS"}
        })))
        .mount(&server)
        .await;

    let identity = identity_for(&server);
    let err = identity
        .sign_in_with_password("ada@example.com", "nope")
        .await
        .unwrap_err();
    assert_eq!(err, IdentityError::InvalidCredentials);
}

#[tokio::test]
async fn duplicate_emails_are_rejected_with_a_readable_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/projects/{}/accounts", PROJECT)))
        .and(header("authorization", "Bearer owner"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "EMAIL_EXISTS"}
        })))
        .mount(&server)
        .await;

    let identity = identity_for(&server);
    let account = NewAccount {
        email: "ada@example.com".to_string(),
        password: "secret1".to_string(),
        display_name: Some("Ada".to_string()),
    };
    let err = identity.create_user(&account).await.unwrap_err();
    assert_eq!(
        err,
        IdentityError::Rejected("The email address is already in use by another account".to_string())
    );
}

#[tokio::test]
async fn connect_builds_services_from_inline_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/projects/{}/accounts", PROJECT)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"localId": "new-uid"})))
        .mount(&server)
        .await;

    let services = connect(&config_for(&server)).await.unwrap();
    let account = NewAccount {
        email: "grace@example.com".to_string(),
        password: "secret1".to_string(),
        display_name: None,
    };
    assert_eq!(services.identity.create_user(&account).await.unwrap(), "new-uid");
    assert!(!services
        .identity
        .create_custom_token("new-uid")
        .await
        .unwrap()
        .is_empty());
}
