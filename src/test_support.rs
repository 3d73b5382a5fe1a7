//! Helpers shared by the router tests.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use crate::config::test_config;
use crate::routes;
use crate::state::AppState;
use crate::store::{Record, StudentStore};

pub fn test_app(store: impl StudentStore + 'static) -> Router {
    routes::router(AppState::new(Arc::new(store), test_config()))
}

pub fn record(value: JsonValue) -> Record {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> JsonValue {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn assert_fixed_headers(&self) {
        assert_eq!(self.headers["content-type"], "application/json");
        assert_eq!(self.headers["access-control-allow-origin"], "*");
    }
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> TestResponse {
    let body = match body {
        Some(json) => Body::from(serde_json::to_string(&json).unwrap()),
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body,
    }
}
