//! Flow catalog handlers

use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use visaflow_types::FlowSummary;

/// List the flow catalog
pub async fn list_flows(State(state): State<AppState>) -> Json<Vec<FlowSummary>> {
    Json(state.engine.catalog().summaries())
}
