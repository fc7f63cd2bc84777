//! Shared helpers for API integration tests.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use civica_api::config::ServerConfig;
use civica_api::router::build_router;
use civica_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        duplicate_window_minutes: 5,
    }
}

/// Fresh application state for one test.
pub fn test_state() -> AppState {
    AppState::new(test_config())
}

/// Build the full application router with all middleware layers, exactly
/// as the binary entrypoint does.
pub fn build_test_app(state: AppState) -> Router {
    build_router(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, "PUT", uri, body).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Flow helpers
// ---------------------------------------------------------------------------

/// Create a session and return its id.
pub async fn create_session(app: &Router) -> String {
    let response = post_json(app, "/api/v1/surveys", json!({})).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_str().unwrap().to_string()
}

/// Step-1 client information answers.
pub fn client_info_fields() -> Value {
    json!({
        "clientType": "citizen",
        "date": "2024-05-10",
        "age": "35",
        "serviceAvailed": "Business permit",
        "regionOfResidence": "Region IV-A",
        "sex": "Female",
    })
}

/// Step-2 charter answers (aware of the CC).
pub fn charter_fields() -> Value {
    json!({
        "cc1": "1",
        "cc2": "Easy to see",
        "cc3": "Helped very much",
    })
}

/// Step-3 service-quality answers.
pub fn service_quality_fields() -> Value {
    json!({
        "sqd0": "5", "sqd1": "5", "sqd2": "4",
        "sqd3": "5", "sqd4": "4", "sqd5": "5",
        "sqd6": "5", "sqd7": "5", "sqd8": "5",
    })
}

/// Create a session and walk it to the final step with valid answers,
/// filling in the given contact email. Returns the session id.
pub async fn drive_to_final_step(app: &Router, email: &str) -> String {
    let id = create_session(app).await;

    post_json(app, &format!("/api/v1/surveys/{id}/acknowledge"), json!({})).await;
    post_json(app, &format!("/api/v1/surveys/{id}/enter"), json!({})).await;

    for fields in [client_info_fields(), charter_fields(), service_quality_fields()] {
        let response = put_json(app, &format!("/api/v1/surveys/{id}/fields"), fields).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = post_json(app, &format!("/api/v1/surveys/{id}/advance"), json!({})).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = put_json(
        app,
        &format!("/api/v1/surveys/{id}/fields"),
        json!({ "suggestions": "Faster queues please", "email": email }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    id
}
