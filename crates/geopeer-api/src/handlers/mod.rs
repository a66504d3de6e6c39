//! HTTP API handlers: peer registration and radius lookup as JSON.

pub mod peer;
pub mod status;

use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use geopeer_services::{PeerError, PeerLookup, PeerStore};

#[derive(Clone)]
pub struct ApiState {
    pub peers: PeerStore,
    pub lookup: PeerLookup,
}

impl ApiState {
    pub fn new(peers: PeerStore, lookup: PeerLookup) -> Self {
        Self { peers, lookup }
    }
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// `{"message": ...}` body used by every non-data response.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub type ApiError = (StatusCode, Json<MessageResponse>);

fn reply(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(MessageResponse {
            message: message.to_string(),
        }),
    )
}

/// Map a store-side failure to a response. Details go to the log only.
fn failure(op: &'static str, public_message: &str, e: PeerError) -> ApiError {
    if e.is_client_error() {
        tracing::warn!(op, error = %e, "rejected request");
        reply(StatusCode::BAD_REQUEST, public_message)
    } else {
        tracing::error!(op, error = %e, "request failed");
        reply(StatusCode::INTERNAL_SERVER_ERROR, public_message)
    }
}

/// Decode a JSON request body. The `Content-Type` header is not consulted.
fn decode_body<T: DeserializeOwned>(
    op: &'static str,
    public_message: &str,
    body: &[u8],
) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(op, error = %e, "malformed request body");
        reply(StatusCode::BAD_REQUEST, public_message)
    })
}

/// Run store work off the async runtime. The task is never cancelled once
/// spawned, even if the client goes away.
async fn run_blocking<T, F>(f: F) -> Result<T, PeerError>
where
    F: FnOnce() -> Result<T, PeerError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PeerError::Worker(e.to_string()))?
}

fn require_text(field: &str, value: &str) -> Result<(), PeerError> {
    if value.is_empty() {
        return Err(PeerError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn require_finite(field: &str, value: f64) -> Result<(), PeerError> {
    if !value.is_finite() {
        return Err(PeerError::Validation(format!("{} must be a finite number", field)));
    }
    Ok(())
}

// Re-export handler functions for use in router setup.
pub use peer::{handle_put_peer, handle_read_peer};
pub use status::handle_status;
