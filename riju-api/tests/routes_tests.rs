//! HTTP surface tests

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{mock_client, pod_list, respond, session_pod, status_error, ApiServerHandle};
use riju_api::kubernetes::types::SessionPodConfig;
use riju_api::kubernetes::SessionManager;
use riju_api::{routes, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> (Router, ApiServerHandle) {
    let (client, handle) = mock_client();
    let manager = SessionManager::new(client, SessionPodConfig::default());
    (routes::router(Arc::new(AppState::new(manager))), handle)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn create_body(id: &str) -> Value {
    json!({
        "session_id": id,
        "lang_config": { "id": "python" },
        "revisions": { "agent": "a1", "ptyify": "p1", "lang_image": "r1" }
    })
}

#[tokio::test]
async fn test_liveness() {
    let (app, _handle) = app();

    let response = app.oneshot(get("/api/health/live")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["alive"], true);
}

#[tokio::test]
async fn test_readiness_when_cluster_reachable() {
    let (app, mut handle) = app();

    let server =
        tokio::spawn(async move { respond(&mut handle, StatusCode::OK, pod_list(vec![])).await });

    let response = app.oneshot(get("/api/health/ready")).await.unwrap();
    server.await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["ready"], true);
}

#[tokio::test]
async fn test_readiness_when_cluster_unreachable() {
    let (app, mut handle) = app();

    let server = tokio::spawn(async move {
        respond(
            &mut handle,
            StatusCode::SERVICE_UNAVAILABLE,
            status_error(503, "ServiceUnavailable", "apiserver is shutting down"),
        )
        .await
    });

    let response = app.oneshot(get("/api/health/ready")).await.unwrap();
    server.await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["ready"], false);
}

#[tokio::test]
async fn test_list_sessions() {
    let (app, mut handle) = app();

    let server = tokio::spawn(async move {
        respond(
            &mut handle,
            StatusCode::OK,
            pod_list(vec![session_pod("abc", "Running")]),
        )
        .await
    });

    let response = app.oneshot(get("/api/sessions")).await.unwrap();
    server.await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!([{
            "pod_name": "riju-user-session-abc",
            "session_id": "abc",
            "phase": "running"
        }])
    );
}

#[tokio::test]
async fn test_create_session() {
    let (app, mut handle) = app();

    let server = tokio::spawn(async move {
        respond(&mut handle, StatusCode::CREATED, session_pod("abc", "Pending")).await
    });

    let response = app
        .oneshot(post_json("/api/sessions", create_body("abc")))
        .await
        .unwrap();
    server.await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["pod_name"], "riju-user-session-abc");
    assert_eq!(body["phase"], "pending");
}

#[tokio::test]
async fn test_create_session_conflict() {
    let (app, mut handle) = app();

    let server = tokio::spawn(async move {
        respond(
            &mut handle,
            StatusCode::CONFLICT,
            status_error(409, "AlreadyExists", "pods \"riju-user-session-abc\" already exists"),
        )
        .await
    });

    let response = app
        .oneshot(post_json("/api/sessions", create_body("abc")))
        .await
        .unwrap();
    server.await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "CONFLICT");
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn test_create_session_invalid_id_rejected() {
    let (app, _handle) = app();

    let response = app
        .oneshot(post_json("/api/sessions", create_body("Bad ID")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()["content-type"], "application/json");
    let body = body_json(response).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["status"], 422);
    assert!(body["message"].as_str().unwrap().contains("illegal character"));
}

#[tokio::test]
async fn test_create_session_malformed_json() {
    let (app, _handle) = app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/sessions")
        .header("content-type", "application/json")
        .body(Body::from("{\"session_id\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_create_session_missing_content_type() {
    let (app, _handle) = app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/sessions")
        .body(Body::from(create_body("abc").to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_create_session_invalid_revision_rejected() {
    let (app, _handle) = app();

    let mut body = create_body("abc");
    body["revisions"]["ptyify"] = json!("p1 && curl evil");

    let response = app.oneshot(post_json("/api/sessions", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_session_bad_id() {
    let (app, _handle) = app();

    let response = app.oneshot(get("/api/sessions/Not_Valid")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_get_session_not_found() {
    let (app, mut handle) = app();

    let server = tokio::spawn(async move {
        respond(
            &mut handle,
            StatusCode::NOT_FOUND,
            status_error(404, "NotFound", "pods \"riju-user-session-gone\" not found"),
        )
        .await
    });

    let response = app.oneshot(get("/api/sessions/gone")).await.unwrap();
    server.await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        "Pod/riju-user-session-gone not found in namespace riju-user"
    );
}
