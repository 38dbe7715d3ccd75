//! Micro-check handlers

use super::sessions::{load_session, SessionEnvelope};
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use visaflow_types::{MicroCheckResult, MicroCheckView};

/// Answer request body
#[derive(Debug, Deserialize)]
pub struct AnswerCheckRequest {
    pub check_id: String,
    pub selected_option: String,
}

/// Answer response: the graded result plus the adapted session
#[derive(Debug, Serialize)]
pub struct AnswerCheckResponse {
    pub result: MicroCheckResult,
    #[serde(flatten)]
    pub envelope: SessionEnvelope,
}

/// List the checks currently available for a session
pub async fn list_micro_checks(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<MicroCheckView>>> {
    let session = load_session(&state, &id).await?;
    Ok(Json(state.engine.available_check_views(&session)))
}

/// Answer one micro-check
pub async fn answer_micro_check(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AnswerCheckRequest>,
) -> ApiResult<Json<AnswerCheckResponse>> {
    let _guard = state.locks.acquire(&id).await;
    let mut session = load_session(&state, &id).await?;

    let (result, mutation) =
        state
            .engine
            .answer_micro_check(&mut session, &request.check_id, &request.selected_option)?;
    state.store.put_session(session.clone()).await?;

    let micro_checks = state.engine.available_check_views(&session);
    Ok(Json(AnswerCheckResponse {
        result,
        envelope: SessionEnvelope {
            session,
            micro_checks,
            mutation,
        },
    }))
}
