//! Shared helpers for router-level tests

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use restkit::auth::{JwtConfig, JwtManager};
use restkit::http_server::{HttpServer, HttpServerConfig, Services};

pub const TEST_SECRET: &str = "integration_test_secret";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        ..JwtConfig::default()
    }
}

/// Router over a fresh, empty store
pub fn router() -> Router {
    router_with(Services::new(jwt_config()))
}

pub fn router_with(services: Services) -> Router {
    HttpServer::with_config(HttpServerConfig::default(), services).router()
}

/// Bearer token naming `user`
pub fn token_for(user: &str) -> String {
    JwtManager::new(jwt_config()).issue(user).unwrap()
}

/// Send one request and decode the JSON response (Null when empty)
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None, None).await
}

pub async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::POST, uri, Some(body), None).await
}

/// Ids of the items in a list envelope, as rendered
pub fn item_field(envelope: &Value, field: &str) -> Vec<Value> {
    envelope["items"]
        .as_array()
        .map(|items| items.iter().map(|item| item[field].clone()).collect())
        .unwrap_or_default()
}
