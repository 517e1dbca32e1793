//! Session lifecycle across process restarts, using file-backed credentials.

use std::sync::Arc;
use std::time::Duration;

use adverifier_core::auth::{CredentialStorage, FileStorage, SessionStore};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn open_store(server: &MockServer, dir: &std::path::Path) -> SessionStore {
    let storage: Arc<dyn CredentialStorage> = Arc::new(FileStorage::new(dir));
    let store = SessionStore::new(&server.uri(), Duration::from_secs(5), storage).unwrap();
    store.hydrate();
    store
}

#[tokio::test]
async fn login_survives_restart_and_logout_does_not() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "T", "user_id": 7, "email": "a@x.com"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .and(header("Authorization", "Token T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_message": "hello",
            "bot_response": "I'm your ad verification assistant.",
            "timestamp": "2025-03-02T10:15:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();

    let first = open_store(&server, dir.path());
    assert!(!first.handle().is_authenticated());
    first.login("a", "b").await.unwrap();
    drop(first);

    // A fresh process picks the session up from disk and the token rides along.
    let second = open_store(&server, dir.path());
    let identity = second.identity().expect("session should be restored");
    assert_eq!(identity.id, "7");
    assert_eq!(identity.email, "a@x.com");
    second.api().send_chat_message("hello").await.unwrap();
    second.logout();
    drop(second);

    let third = open_store(&server, dir.path());
    assert!(third.identity().is_none());
    assert!(!third.is_loading());
}

#[tokio::test]
async fn requests_without_session_carry_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chat-messages/"))
        .and(header("Authorization", "Token T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/chat-messages/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Authentication credentials were not provided."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&server, dir.path());
    let err = store.api().fetch_chat_messages().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
    assert_eq!(
        err.field_error("detail").as_deref(),
        Some("Authentication credentials were not provided.")
    );
}
