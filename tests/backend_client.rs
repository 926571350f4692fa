//! Backend client integration tests using wiremock

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zenmedic::backend::{BackendClient, HistorySync};
use zenmedic::config::BackendConfig;
use zenmedic::error::ZenmedicError;

fn client(server: &MockServer) -> BackendClient {
    BackendClient::new(BackendConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
        ..Default::default()
    })
    .unwrap()
}

fn backend_status(err: &anyhow::Error) -> Option<u16> {
    match err.downcast_ref::<ZenmedicError>() {
        Some(ZenmedicError::Backend { status, .. }) => Some(*status),
        _ => None,
    }
}

#[tokio::test]
async fn test_sync_puts_data_to_user_history() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/zengpt/abc123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.sync("abc123", "I have a headache").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body, json!({ "data": "I have a headache" }));
}

#[tokio::test]
async fn test_sync_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/zengpt/abc123"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such user"))
        .mount(&server)
        .await;

    let err = client(&server)
        .sync_history("abc123", "hello")
        .await
        .unwrap_err();
    assert_eq!(backend_status(&err), Some(404));
    assert!(err.to_string().contains("no such user"));
}

#[tokio::test]
async fn test_fetch_history() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/zengpt/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": ["I have a headache", "I feel dizzy"]
        })))
        .mount(&server)
        .await;

    let history = client(&server).fetch_history("abc123").await.unwrap();
    assert_eq!(history, vec!["I have a headache", "I feel dizzy"]);
}

#[tokio::test]
async fn test_profile_combines_history_and_details() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/zengpt/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": ["one", "two", "three"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/zengpt/user/details/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userDetails": { "name": "Ada", "email": "ada@example.com" }
        })))
        .mount(&server)
        .await;

    let profile = client(&server).profile("abc123").await.unwrap();
    assert_eq!(profile.name, "Ada");
    assert_eq!(profile.email, "ada@example.com");
    assert_eq!(profile.total_chats, 3);
    assert_eq!(profile.history.len(), 3);
}

#[tokio::test]
async fn test_profile_fails_when_details_fail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/zengpt/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "history": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/zengpt/user/details/abc123"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server).profile("abc123").await.unwrap_err();
    assert_eq!(backend_status(&err), Some(500));
}

#[tokio::test]
async fn test_delete_account() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/users/zengpt/delete/account/abc123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_account("abc123").await.unwrap();
}

#[tokio::test]
async fn test_login_returns_user_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/zengpt/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "userId": "abc123" })))
        .expect(1)
        .mount(&server)
        .await;

    let user_id = client(&server)
        .login("ada@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(user_id, "abc123");

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(
        body,
        json!({ "email": "ada@example.com", "password": "secret1" })
    );
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/zengpt/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;

    let err = client(&server)
        .login("ada@example.com", "wrong-password")
        .await
        .unwrap_err();
    assert_eq!(backend_status(&err), Some(401));
}

#[tokio::test]
async fn test_signup_returns_user_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/zengpt/signup"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "userId": "new-user" })))
        .mount(&server)
        .await;

    let user_id = client(&server)
        .signup("Ada", "ada@example.com", "secret1")
        .await
        .unwrap();
    assert_eq!(user_id, "new-user");

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["name"], "Ada");
}

#[tokio::test]
async fn test_login_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/users/zengpt/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "x" })))
        .mount(&server)
        .await;

    let err = client(&server)
        .login("ada@example.com", "secret1")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ZenmedicError>(),
        Some(ZenmedicError::Serialization(_))
    ));
}

#[tokio::test]
async fn test_user_id_stays_inside_user_path() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/zengpt/a%2F..%2F..%2Fx"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .sync_history("a/../../x", "hello")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_user_id_query_and_fragment_are_encoded() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client(&server)
        .delete_account("alice?x=1#frag")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.path(),
        "/api/users/zengpt/delete/account/alice%3Fx=1%23frag"
    );
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_dot_user_id_is_rejected_without_request() {
    let server = MockServer::start().await;

    let err = client(&server).fetch_history("..").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ZenmedicError>(),
        Some(ZenmedicError::Validation(_))
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}
