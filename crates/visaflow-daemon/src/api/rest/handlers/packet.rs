//! Advisor packet handler

use super::sessions::load_session;
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

/// Packet response
#[derive(Debug, Serialize)]
pub struct PacketResponse {
    pub session_id: String,
    pub packet_markdown: String,
}

/// Render the advisor packet for a session. The markdown is cached on the
/// session; regenerating without intervening events returns the same bytes.
pub async fn generate_packet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PacketResponse>> {
    let _guard = state.locks.acquire(&id).await;
    let mut session = load_session(&state, &id).await?;

    let packet_markdown = state.engine.build_packet(&mut session);
    state.store.put_session(session).await?;

    Ok(Json(PacketResponse {
        session_id: id,
        packet_markdown,
    }))
}
