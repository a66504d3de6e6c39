//! Peer registration and lookup commands.

use anyhow::{Context, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::http::{api_url, send_json_body};

#[derive(Serialize)]
struct PutPeerRequest<'a> {
    peer_id: &'a str,
    addr: &'a str,
    credential: &'a str,
    longitude: f64,
    latitude: f64,
}

#[derive(Serialize)]
struct ReadPeerRequest {
    longitude: f64,
    latitude: f64,
    radius: f64,
}

#[derive(Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Deserialize)]
struct ReadPeerResponse {
    location: Vec<String>,
}

/// Options accepted by `put` after its positional arguments.
#[derive(Debug, PartialEq)]
pub struct PutOptions {
    pub addr: String,
    pub credential: String,
}

impl Default for PutOptions {
    fn default() -> Self {
        Self {
            addr: "dummy-addr".to_string(),
            credential: "dummy-credential".to_string(),
        }
    }
}

impl PutOptions {
    pub fn parse(args: &[&str]) -> Result<Self> {
        let mut opts = Self::default();
        let mut it = args.iter();
        while let Some(flag) = it.next() {
            let value = it
                .next()
                .with_context(|| format!("{} requires a value", flag))?;
            match *flag {
                "--addr" => opts.addr = value.to_string(),
                "--credential" => opts.credential = value.to_string(),
                other => anyhow::bail!("unknown option: {}", other),
            }
        }
        Ok(opts)
    }
}

pub fn parse_coord(name: &str, s: &str) -> Result<f64> {
    s.parse().with_context(|| format!("{} must be a number, got {:?}", name, s))
}

pub async fn cmd_put(base: &str, peer_id: &str, lng: f64, lat: f64, opts: &PutOptions) -> Result<()> {
    let body = PutPeerRequest {
        peer_id,
        addr: &opts.addr,
        credential: &opts.credential,
        longitude: lng,
        latitude: lat,
    };
    let resp: MessageResponse = send_json_body(Method::POST, &api_url(base, "/peer"), &body).await?;
    println!("{} ({} at {}, {})", resp.message, peer_id, lng, lat);
    Ok(())
}

pub async fn cmd_read(base: &str, lng: f64, lat: f64, radius: f64) -> Result<()> {
    let body = ReadPeerRequest {
        longitude: lng,
        latitude: lat,
        radius,
    };
    let resp: ReadPeerResponse =
        send_json_body(Method::GET, &api_url(base, "/peer/read"), &body).await?;

    if resp.location.is_empty() {
        println!("No peers within {} of ({}, {}).", radius, lng, lat);
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Peers within {} of ({}, {}): {}", radius, lng, lat, resp.location.len());
    println!("═══════════════════════════════════════");
    for id in &resp.location {
        println!("  {}", id);
    }
    Ok(())
}
