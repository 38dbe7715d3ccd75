//! Session lifecycle handlers
//!
//! Mutating handlers hold the session's lock from load through commit:
//! the engine runs on a working copy and the store is written only if the
//! engine accepted the request. A rejected request never reaches the
//! store.

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use visaflow_engine::StartSessionRequest;
use visaflow_types::{MicroCheckView, SessionState, UiMutation};

/// Session envelope returned by every session-mutating endpoint
#[derive(Debug, Serialize)]
pub struct SessionEnvelope {
    pub session: SessionState,
    pub micro_checks: Vec<MicroCheckView>,
    pub mutation: UiMutation,
}

/// Apply-event request body
#[derive(Debug, Deserialize)]
pub struct ApplyEventRequest {
    pub event_type: String,
    #[serde(default)]
    pub payload: Value,
}

/// Session index response
#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub session_ids: Vec<String>,
}

/// Open a new session
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> ApiResult<Json<SessionEnvelope>> {
    let outcome = state.engine.start_session(request)?;
    state.store.insert_session(outcome.session.clone()).await?;

    tracing::info!(
        session_id = %outcome.session.session_id,
        flow = %outcome.session.selected_flow_id,
        "Created session"
    );

    Ok(Json(SessionEnvelope {
        micro_checks: outcome.micro_checks,
        mutation: outcome.mutation,
        session: outcome.session,
    }))
}

/// List the ids of all open sessions
pub async fn list_sessions(State(state): State<AppState>) -> ApiResult<Json<SessionListResponse>> {
    let session_ids = state.store.list_session_ids().await?;
    Ok(Json(SessionListResponse { session_ids }))
}

/// Close a session and discard its state
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let _guard = state.locks.acquire(&id).await;
    if state.store.delete_session(&id).await? {
        tracing::info!(session_id = %id, "Deleted session");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Session {} not found", id)))
    }
}

/// Get a session by id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionState>> {
    let session = load_session(&state, &id).await?;
    Ok(Json(session))
}

/// Apply one user event to a session
pub async fn apply_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ApplyEventRequest>,
) -> ApiResult<Json<SessionEnvelope>> {
    let _guard = state.locks.acquire(&id).await;
    let mut session = load_session(&state, &id).await?;

    let mutation = state
        .engine
        .apply_event(&mut session, &request.event_type, &request.payload)?;
    state.store.put_session(session.clone()).await?;

    let micro_checks = state.engine.available_check_views(&session);
    Ok(Json(SessionEnvelope {
        session,
        micro_checks,
        mutation,
    }))
}

pub(super) async fn load_session(state: &AppState, id: &str) -> ApiResult<SessionState> {
    state
        .store
        .get_session(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Session {} not found", id)))
}
