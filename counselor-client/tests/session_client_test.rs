//! Token lifecycle behavior of the API client: single-flight refresh,
//! retry-once semantics, login exclusion, session invalidation.

mod common;

use common::{anonymous_client, authenticated_client, init_test_tracing};
use counselor_client::{ApiError, SessionEvent};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_refresh(server: &MockServer, old_refresh: &str, access: &str, refresh: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .and(body_json(json!({ "refresh": old_refresh })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access": access, "refresh": refresh })),
        )
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    init_test_tracing();
    let server = MockServer::start().await;

    // Every request carrying the stale token is rejected...
    Mock::given(method("GET"))
        .and(path("/profile/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is expired"
        })))
        .expect(3)
        .mount(&server)
        .await;

    // ...exactly one refresh happens...
    mount_refresh(&server, "R1", "A2", "R2", 1).await;

    // ...and the retries all succeed with the rotated token.
    Mock::given(method("GET"))
        .and(path("/profile/"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "a@b.c" })))
        .expect(3)
        .mount(&server)
        .await;

    let client = authenticated_client(&server, "A1", "R1");

    let (a, b, c) = tokio::join!(
        client.get::<serde_json::Value>("/profile/"),
        client.get::<serde_json::Value>("/profile/"),
        client.get::<serde_json::Value>("/profile/"),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());

    assert_eq!(client.session().access_token().as_deref(), Some("A2"));
    assert_eq!(client.session().refresh_token().as_deref(), Some("R2"));
}

#[tokio::test]
async fn test_second_401_propagates_without_loop() {
    init_test_tracing();
    let server = MockServer::start().await;

    // Both the original request and the retry with the fresh token are
    // rejected; the error must reach the caller after exactly one refresh.
    Mock::given(method("GET"))
        .and(path("/profile/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid"
        })))
        .expect(2)
        .mount(&server)
        .await;

    mount_refresh(&server, "R1", "A2", "R2", 1).await;

    let client = authenticated_client(&server, "A1", "R1");
    let result = client.get::<serde_json::Value>("/profile/").await;

    match result {
        Err(ApiError::Unauthorized(_)) => {}
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_rejection_never_triggers_refresh() {
    init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Invalid Credentials"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = authenticated_client(&server, "A1", "R1");
    let result = client.login("user@example.com", "wrong-password").await;

    match result {
        Err(ApiError::Unauthorized(message)) => assert_eq!(message, "Invalid Credentials"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    // The stored session is untouched by a failed login.
    assert_eq!(client.session().access_token().as_deref(), Some("A1"));
}

#[tokio::test]
async fn test_refresh_rotates_both_tokens() {
    init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/universities/locked/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    mount_refresh(&server, "R1", "A2", "R2", 1).await;

    Mock::given(method("GET"))
        .and(path("/universities/locked/"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authenticated_client(&server, "A1", "R1");
    let body: serde_json::Value = client.get("/universities/locked/").await.unwrap();
    assert_eq!(body["status"], "success");

    assert_eq!(client.session().access_token().as_deref(), Some("A2"));
    assert_eq!(client.session().refresh_token().as_deref(), Some("R2"));
}

#[tokio::test]
async fn test_401_without_refresh_token_invalidates_session() {
    init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // No credentials at all: the 401 is unrecoverable and must not hit
    // the refresh endpoint.
    let client = anonymous_client(&server);
    let events = client.session().subscribe();

    let result = client.get::<serde_json::Value>("/profile/").await;
    match result {
        Err(ApiError::MustReauthenticate) => {}
        other => panic!("expected MustReauthenticate, got {other:?}"),
    }
    assert_eq!(*events.borrow(), SessionEvent::Invalidated);
    assert_eq!(client.session().access_token(), None);
}

#[tokio::test]
async fn test_rejected_refresh_clears_session_and_signals() {
    init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is blacklisted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authenticated_client(&server, "A1", "R1");
    let events = client.session().subscribe();

    let result = client.get::<serde_json::Value>("/profile/").await;
    match result {
        Err(ApiError::MustReauthenticate) => {}
        other => panic!("expected MustReauthenticate, got {other:?}"),
    }

    assert_eq!(*events.borrow(), SessionEvent::Invalidated);
    assert_eq!(client.session().access_token(), None);
    assert_eq!(client.session().refresh_token(), None);
    assert_eq!(client.session().display_name(), None);
}

#[tokio::test]
async fn test_login_stores_tokens_and_display_name() {
    init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login/"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "correct horse"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "A1",
            "refresh": "R1",
            "email": "ada@example.com",
            "first_name": "Ada"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let payload = client.login("ada@example.com", "correct horse").await.unwrap();

    assert_eq!(payload.first_name.as_deref(), Some("Ada"));
    assert_eq!(client.session().access_token().as_deref(), Some("A1"));
    assert_eq!(client.session().refresh_token().as_deref(), Some("R1"));
    assert_eq!(client.session().display_name().as_deref(), Some("Ada"));

    client.logout().unwrap();
    assert_eq!(client.session().access_token(), None);
    assert_eq!(client.session().display_name(), None);
}

#[tokio::test]
async fn test_server_error_leaves_session_untouched() {
    init_test_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/profile/"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let client = authenticated_client(&server, "A1", "R1");
    let result = client.get::<serde_json::Value>("/profile/").await;

    match result {
        Err(ApiError::Server { status, .. }) => assert_eq!(status, 502),
        other => panic!("expected Server error, got {other:?}"),
    }
    assert_eq!(client.session().access_token().as_deref(), Some("A1"));
    assert_eq!(client.session().refresh_token().as_deref(), Some("R1"));
}
