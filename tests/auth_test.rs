//! Integration tests for registration, login, logout and session handling

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use stayease::database::AppState;
use stayease::memory::MemoryStorage;
use stayease::model::InsertUser;
use stayease::route::create_app;
use stayease::storage::Storage;

// Low bcrypt cost keeps the test suite fast
const TEST_BCRYPT_COST: u32 = 4;

fn setup_test_app() -> (axum::Router, Arc<dyn Storage>) {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = create_app(AppState {
        storage: storage.clone(),
    });
    (app, storage)
}

/// Helper function to parse response body as JSON
async fn response_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}

async fn seed_user(storage: &Arc<dyn Storage>, username: &str, password: &str, is_admin: bool) {
    storage
        .create_user(InsertUser {
            username: username.to_string(),
            password: bcrypt::hash(password, TEST_BCRYPT_COST).unwrap(),
            first_name: None,
            last_name: None,
            email: None,
            is_admin,
        })
        .await
        .unwrap();
}

fn json_post(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

/// Extracts the session cookie from a Set-Cookie header
fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get("set-cookie")
        .expect("Missing Set-Cookie header")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_register_success() {
    let (app, _storage) = setup_test_app();

    let payload = json!({
        "username": "alice",
        "password": "secret1",
        "firstName": "Alice",
        "email": "alice@example.com"
    });

    let response = app
        .oneshot(json_post("/api/register", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().contains_key("set-cookie"));

    let body = response_json(response.into_body()).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["firstName"], "Alice");
    assert_eq!(body["isAdmin"], false);
    // The password hash must never appear in a response
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let (app, _storage) = setup_test_app();

    let payload = json!({ "username": "alice", "password": "secret1" });

    let response = app
        .clone()
        .oneshot(json_post("/api/register", payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_post("/api/register", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn test_register_short_password() {
    let (app, _storage) = setup_test_app();

    let payload = json!({ "username": "bob", "password": "abc" });

    let response = app
        .oneshot(json_post("/api/register", payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["message"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_register_establishes_session() {
    let (app, _storage) = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/register",
            json!({ "username": "carol", "password": "secret1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = session_cookie(&response);

    // The cookie from registration works immediately
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/user")
                .header("cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response.into_body()).await;
    assert_eq!(body["username"], "carol");
}

#[tokio::test]
async fn test_login_success() {
    let (app, storage) = setup_test_app();
    seed_user(&storage, "alice", "secret1", false).await;

    let response = app
        .oneshot(json_post(
            "/api/login",
            json!({ "username": "alice", "password": "secret1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("set-cookie"));

    let body = response_json(response.into_body()).await;
    assert_eq!(body["username"], "alice");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (app, storage) = setup_test_app();
    seed_user(&storage, "alice", "secret1", false).await;

    let response = app
        .oneshot(json_post(
            "/api/login",
            json!({ "username": "alice", "password": "wrong" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["message"], "Invalid username or password");
}

#[tokio::test]
async fn test_login_unknown_username() {
    let (app, _storage) = setup_test_app();

    let response = app
        .oneshot(json_post(
            "/api/login",
            json!({ "username": "nobody", "password": "whatever" }),
        ))
        .await
        .unwrap();

    // Same response as a wrong password, no username probing
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["message"], "Invalid username or password");
}

#[tokio::test]
async fn test_current_user_without_session() {
    let (app, _storage) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/user")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let (app, storage) = setup_test_app();
    seed_user(&storage, "alice", "secret1", false).await;

    let response = app
        .clone()
        .oneshot(json_post(
            "/api/login",
            json!({ "username": "alice", "password": "secret1" }),
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/logout")
                .header("cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response.into_body()).await;
    assert_eq!(body["message"], "Logged out successfully");

    // The revoked session no longer authenticates
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/user")
                .header("cookie", &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_cookie_rejected() {
    let (app, _storage) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/user")
                .header("cookie", "stayease_session=not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
