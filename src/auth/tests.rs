//! Tests for the auth module

use super::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials() -> Credentials {
    Credentials::new("cid", "secret", "user@example.com", "hunter2")
}

fn oauth_flow(server: &MockServer) -> AuthFlow {
    AuthFlow::OauthPassword {
        token_url: format!("{}/services/oauth2/token", server.uri()),
        credentials: credentials(),
    }
}

#[tokio::test]
async fn test_get_logs_in_once_across_sequential_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1"
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = TokenStore::new(oauth_flow(&server), reqwest::Client::new());

    for _ in 0..5 {
        let token = store.get().await.unwrap();
        assert_eq!(token, "tok-1");
    }
}

#[tokio::test]
async fn test_concurrent_gets_issue_single_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1"
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(TokenStore::new(oauth_flow(&server), reqwest::Client::new()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move { store.get().await }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "tok-1");
    }
}

#[tokio::test]
async fn test_invalidate_forces_relogin() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1"
            })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let store = TokenStore::new(oauth_flow(&server), reqwest::Client::new());

    store.get().await.unwrap();
    assert!(store.is_cached().await);

    store.invalidate().await;
    assert!(!store.is_cached().await);

    store.get().await.unwrap();
    assert!(store.is_cached().await);
}

#[tokio::test]
async fn test_oauth_flow_sends_password_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_id=cid"))
        .and(body_string_contains("username=user%40example.com"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1"
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = TokenStore::new(oauth_flow(&server), reqwest::Client::new());
    assert_eq!(store.get().await.unwrap(), "tok-1");
}

#[tokio::test]
async fn test_oauth_flow_failure_is_terminal_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let store = TokenStore::new(oauth_flow(&server), reqwest::Client::new());
    let err = store.get().await.unwrap_err();

    assert!(matches!(err, crate::error::Error::Auth { .. }));
    assert!(err.to_string().contains("400"));
    assert!(!store.is_cached().await);
}

#[tokio::test]
async fn test_login_form_flow_returns_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_string_contains("email=user%40example.com"))
        .and(body_string_contains("user_key=uk-9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "api_key": "key-77"
            })),
        )
        .mount(&server)
        .await;

    let flow = AuthFlow::LoginForm {
        login_url: format!("{}/api/login", server.uri()),
        user_key: "uk-9".to_string(),
        credentials: credentials(),
    };
    let store = TokenStore::new(flow, reqwest::Client::new());

    assert_eq!(store.get().await.unwrap(), "key-77");
}

#[tokio::test]
async fn test_login_form_flow_surfaces_envelope_error() {
    let server = MockServer::start().await;

    // 200 with an err field is how the service rejects credentials
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "err": "Login failed"
            })),
        )
        .mount(&server)
        .await;

    let flow = AuthFlow::LoginForm {
        login_url: format!("{}/api/login", server.uri()),
        user_key: "uk-9".to_string(),
        credentials: credentials(),
    };
    let store = TokenStore::new(flow, reqwest::Client::new());

    let err = store.get().await.unwrap_err();
    assert!(matches!(err, crate::error::Error::Auth { .. }));
    assert!(err.to_string().contains("Login failed"));
}
