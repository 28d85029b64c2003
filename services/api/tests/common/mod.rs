#![allow(dead_code)]

use std::sync::Arc;

use api_lib::adapters::InMemoryAdapter;
use api_lib::config::Config;
use api_lib::web::{app, state::AppState};
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use tracing::Level;

/// A configuration with safe defaults; nothing here touches the environment.
pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: None,
        database_max_connections: 1,
        log_level: Level::DEBUG,
        cors_origin: "http://localhost:3000".to_string(),
    }
}

/// Builds the full router over a fresh in-memory repository, returning the
/// repository too so tests can seed records the API cannot create.
pub fn build_test_app() -> (Router, Arc<InMemoryAdapter>) {
    let repo = Arc::new(InMemoryAdapter::new());
    let state = Arc::new(AppState {
        repo: repo.clone(),
        config: Arc::new(test_config()),
    });
    (app(state), repo)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// POSTs a payload and returns the created record, asserting a 201.
pub async fn create(app: &Router, uri: &str, payload: Value) -> Value {
    let response = send(app, Method::POST, uri, Some(payload)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}
