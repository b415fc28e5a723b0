//! HTTP routes
//!
//! Session endpoints plus liveness/readiness probes.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use riju_common::{CreateSessionRequest, SessionId, UserSession};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::ApiError;
use crate::health::{HealthResponse, LivenessResponse, ReadinessResponse};
use crate::state::AppState;

/// Build the full application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(session_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health_detailed))
        .route("/api/health/live", get(liveness_probe))
        .route("/api/health/ready", get(readiness_probe))
}

fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/:session_id", get(get_session))
}

async fn health_detailed(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let cluster = state
        .health_checker
        .check_cluster(&state.session_manager)
        .await;
    Json(state.health_checker.build_response(vec![cluster]))
}

async fn liveness_probe(State(state): State<Arc<AppState>>) -> Json<LivenessResponse> {
    Json(state.health_checker.liveness())
}

async fn readiness_probe(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let cluster = state
        .health_checker
        .check_cluster(&state.session_manager)
        .await;
    let readiness = state.health_checker.readiness(&[cluster]);

    let status = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(readiness))
}

async fn list_sessions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserSession>>, ApiError> {
    let sessions = state.session_manager.list_user_sessions().await?;
    Ok(Json(sessions))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<UserSession>, ApiError> {
    let session_id =
        SessionId::new(session_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let session = state.session_manager.get_user_session(&session_id).await?;
    Ok(Json(session))
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserSession>), ApiError> {
    let Json(payload) = payload.map_err(rejection_to_api_error)?;
    debug!(session_id = %payload.session_id, "Create session request");
    let session = state.session_manager.create_user_session(&payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Body rejections go out in the same error envelope as every other failure.
/// A well-formed body with bad field values is a validation error.
fn rejection_to_api_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(e) => ApiError::ValidationError(e.body_text()),
        other => ApiError::BadRequest(other.body_text()),
    }
}
