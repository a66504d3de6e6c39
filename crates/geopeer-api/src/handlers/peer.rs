//! /peer handlers: registration and radius lookup.
//!
//! Bodies are decoded as JSON whatever their `Content-Type`, and validated
//! before any store handle is opened, so a rejected request never touches
//! the database.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use geopeer_core::{GeoPoint, LookupQuery};
use geopeer_services::{NewPeer, PeerError};

use super::{
    decode_body, failure, require_finite, require_text, run_blocking, ApiError, ApiState,
    MessageResponse,
};

const INVALID_PUT: &str = "invalid json of PreparePutPeer";
const INVALID_READ: &str = "invalid json of ReadPeer";
const FAILED_PUT: &str = "Failed insert peer information";
const FAILED_READ: &str = "Failed read peer information";

// ── /peer (POST) ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct PutPeerRequest {
    pub peer_id: String,
    pub addr: String,
    pub credential: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl PutPeerRequest {
    fn validate(self) -> Result<NewPeer, PeerError> {
        require_text("peer_id", &self.peer_id)?;
        require_text("addr", &self.addr)?;
        require_text("credential", &self.credential)?;
        require_finite("longitude", self.longitude)?;
        require_finite("latitude", self.latitude)?;
        Ok(NewPeer {
            peer_id: self.peer_id,
            addr: self.addr,
            credential: self.credential,
            location: GeoPoint::new(self.longitude, self.latitude),
        })
    }
}

pub async fn handle_put_peer(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let req: PutPeerRequest = decode_body("insert", INVALID_PUT, &body)?;
    let peer = req.validate().map_err(|e| failure("insert", INVALID_PUT, e))?;

    let peers = state.peers.clone();
    run_blocking(move || peers.insert(&peer))
        .await
        .map_err(|e| failure("insert", FAILED_PUT, e))?;

    Ok(Json(MessageResponse {
        message: "insert OK".to_string(),
    }))
}

// ── /peer/read (GET) ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct ReadPeerRequest {
    pub longitude: f64,
    pub latitude: f64,
    pub radius: f64,
}

impl ReadPeerRequest {
    fn validate(self) -> Result<LookupQuery, PeerError> {
        require_finite("longitude", self.longitude)?;
        require_finite("latitude", self.latitude)?;
        require_finite("radius", self.radius)?;
        Ok(LookupQuery::new(self.longitude, self.latitude, self.radius))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadPeerResponse {
    pub location: Vec<String>,
}

pub async fn handle_read_peer(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<ReadPeerResponse>, ApiError> {
    let req: ReadPeerRequest = decode_body("read", INVALID_READ, &body)?;
    let query = req.validate().map_err(|e| failure("read", INVALID_READ, e))?;

    let lookup = state.lookup.clone();
    let location = run_blocking(move || lookup.lookup(&query))
        .await
        .map_err(|e| failure("read", FAILED_READ, e))?;

    Ok(Json(ReadPeerResponse { location }))
}
