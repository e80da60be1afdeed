//! Shared helpers for the HTTP-level test suites.
//!
//! Every test builds its own router over a freshly seeded in-memory store:
//! teams Heat (1), Knicks (2), Nets (3); players Lebron James (1, Heat),
//! Jalen Brunson (2, Knicks), Luka Doncic (3, free agent).

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use http_body_util::BodyExt;
use jsonwebtoken::Algorithm;
use serde_json::Value;
use tower::ServiceExt;

use bball_manager::api::{create_router_with_state, AppState};
use bball_manager::config::AuthConfig;
use bball_manager::create_token_verifier;
use bball_manager::domain::auth::{Permission, Role};
use bball_manager::infrastructure::auth::JwtSigner;
use bball_manager::infrastructure::storage::{seed_demo_data, RosterStorage};

pub const SECRET: &str = "integration-test-secret";
pub const ISSUER: &str = "https://bball.test/";
pub const AUDIENCE: &str = "bball";

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        issuer: ISSUER.to_string(),
        audience: AUDIENCE.to_string(),
        algorithm: "HS256".to_string(),
        secret: Some(SECRET.to_string()),
        ..Default::default()
    }
}

/// Router over the demo roster, verifying HS256 tokens signed with [`SECRET`]
pub async fn seeded_app() -> Router {
    let storage = RosterStorage::in_memory();
    seed_demo_data(&storage).await.unwrap();

    let verifier = create_token_verifier(&auth_config()).unwrap();
    create_router_with_state(AppState::new(storage, verifier))
}

pub fn signer() -> JwtSigner {
    JwtSigner::hmac(SECRET.as_bytes(), Algorithm::HS256, ISSUER, AUDIENCE).unwrap()
}

pub fn token_with(permissions: &[Permission]) -> String {
    signer()
        .sign("auth0|tester", permissions, Duration::hours(1))
        .unwrap()
}

pub fn admin_token() -> String {
    token_with(&Role::Admin.permissions())
}

pub fn analyst_token() -> String {
    token_with(&Role::Analyst.permissions())
}

/// Send one request and decode the JSON response body
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    send_request(app, request).await
}

/// Send a prebuilt request and decode the JSON response body
pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

pub fn assert_error(body: &Value, status: StatusCode, code: &str) {
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], status.as_u16());
    assert_eq!(body["message"], code);
}
