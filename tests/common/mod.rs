//! Shared helpers for HTTP-level integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use oruma_server::{
    api,
    config::AuthConfig,
    repository::Repository,
    AppState,
};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Auth settings signing tokens with [`TEST_SECRET`].
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiration_days: 30,
    }
}

/// Build the production router on top of the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    api::router(AppState::new(test_auth_config(), Repository::new(pool)))
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post_json(app: Router, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, token, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, token: Option<&str>, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, token, Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, Method::DELETE, uri, token, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user through the API and return its token.
pub async fn register_user(app: Router, email: &str) -> String {
    let response = post_json(
        app,
        "/api/auth/register",
        None,
        serde_json::json!({ "name": "Health Worker", "email": email, "password": "pa55word" }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["token"].as_str().unwrap().to_string()
}
