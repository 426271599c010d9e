//! Integration tests for the REST facade and discovery endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use crate::api::{AppState, routes};
use crate::auth::test_support::{claims_for, now_epoch, sign, test_app_config, test_gate, token_for};
use crate::store::MemoryStore;

fn test_app() -> axum::Router {
    let state = AppState::new(MemoryStore::new(), test_gate(), test_app_config());
    routes::create_router(state, CancellationToken::new())
}

fn session_cookie(token: &str) -> String {
    format!("stytch_session_jwt={token}")
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn get_todos(app: &axum::Router, token: &str) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/todos")
                .header(header::COOKIE, session_cookie(token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

async fn post_todo(app: &axum::Router, token: &str, text: &str) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/todos")
                .header(header::COOKIE, session_cookie(token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&json!({ "todoText": text })).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn empty_list_for_a_fresh_user() {
    let app = test_app();
    let body = get_todos(&app, &token_for("user-1")).await;
    assert!(body["todos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_returns_the_full_updated_list() {
    let app = test_app();
    let token = token_for("user-1");

    let body = post_todo(&app, &token, "x").await;
    let todos = body["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["text"], "x");
    assert_eq!(todos[0]["completed"], false);
    assert!(!todos[0]["id"].as_str().unwrap().is_empty());

    // A follow-up GET shows exactly the same state.
    let body = get_todos(&app, &token).await;
    assert_eq!(body["todos"].as_array().unwrap().len(), 1);
    assert_eq!(body["todos"][0]["text"], "x");
}

#[tokio::test]
async fn complete_toggles_only_the_target() {
    let app = test_app();
    let token = token_for("user-1");
    post_todo(&app, &token, "first").await;
    let body = post_todo(&app, &token, "second").await;
    let id = body["todos"][1]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/todos/{id}/complete"))
                .header(header::COOKIE, session_cookie(&token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["todos"][0]["completed"], false);
    assert_eq!(body["todos"][1]["completed"], true);
    assert_eq!(body["todos"][1]["text"], "second");
}

#[tokio::test]
async fn complete_with_unknown_id_returns_list_unchanged() {
    let app = test_app();
    let token = token_for("user-1");
    let before = post_todo(&app, &token, "only").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/todos/no-such-id/complete")
                .header(header::COOKIE, session_cookie(&token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let after = json_body(response).await;
    assert_eq!(before["todos"], after["todos"]);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let app = test_app();
    let token = token_for("user-1");
    let body = post_todo(&app, &token, "to remove").await;
    let id = body["todos"][0]["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/todos/{id}"))
                    .header(header::COOKIE, session_cookie(&token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["todos"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn lists_never_leak_across_users() {
    let app = test_app();
    post_todo(&app, &token_for("alice"), "alice's secret").await;

    let body = get_todos(&app, &token_for("bob")).await;
    assert!(body["todos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_cookie_is_unauthenticated() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/todos")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Unauthenticated");
}

#[tokio::test]
async fn expired_session_is_unauthenticated() {
    let app = test_app();
    let mut claims = claims_for("user-1");
    claims["exp"] = json!(now_epoch() - 3600);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/todos")
                .header(header::COOKIE, session_cookie(&sign(&claims)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_audience_session_is_unauthenticated() {
    let app = test_app();
    let mut claims = claims_for("user-1");
    claims["aud"] = json!(["another-project"]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/todos")
                .header(header::COOKIE, session_cookie(&sign(&claims)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mcp_endpoint_requires_a_bearer_token() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/sse")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Missing or invalid access token");
}

#[tokio::test]
async fn mcp_endpoint_rejects_invalid_bearer_tokens() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/sse")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Unauthenticated");
}

#[tokio::test]
async fn discovery_metadata_is_computed_from_config() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/.well-known/oauth-authorization-server")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    let config = test_app_config();
    assert_eq!(body["issuer"], config.project_id);
    assert_eq!(
        body["authorization_endpoint"],
        "http://localhost:3000/oauth/authorize"
    );
    assert_eq!(body["token_endpoint"], config.oauth_endpoint_url("oauth2/token"));
    assert_eq!(
        body["registration_endpoint"],
        config.oauth_endpoint_url("oauth2/register")
    );
    assert_eq!(body["response_types_supported"], json!(["code"]));
    assert_eq!(body["code_challenge_methods_supported"], json!(["S256"]));
    assert_eq!(
        body["grant_types_supported"],
        json!(["authorization_code", "refresh_token"])
    );
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}
