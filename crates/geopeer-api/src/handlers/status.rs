//! /status handler.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{failure, run_blocking, ApiError, ApiState};

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub peers: u64,
    pub connections_opened: u64,
    pub lookup_strategy: String,
}

pub async fn handle_status(State(state): State<ApiState>) -> Result<Json<StatusResponse>, ApiError> {
    let peers = state.peers.clone();
    let count = run_blocking(move || peers.count())
        .await
        .map_err(|e| failure("status", "Failed read status", e))?;

    Ok(Json(StatusResponse {
        peers: count,
        connections_opened: state.peers.store().connections_opened(),
        lookup_strategy: state.lookup.strategy().as_str().to_string(),
    }))
}
