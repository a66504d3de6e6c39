//! Daemon status command.

use anyhow::Result;
use serde::Deserialize;

use super::http::{api_url, get_json};

#[derive(Deserialize)]
struct StatusResponse {
    peers: u64,
    connections_opened: u64,
    lookup_strategy: String,
}

pub async fn cmd_status(base: &str) -> Result<()> {
    let resp: StatusResponse = get_json(&api_url(base, "/status")).await?;

    println!("═══════════════════════════════════════");
    println!("  geopeer Daemon Status");
    println!("═══════════════════════════════════════");
    println!("  Registered peers   : {}", resp.peers);
    println!("  Store handles used : {}", resp.connections_opened);
    println!("  Lookup strategy    : {}", resp.lookup_strategy);

    Ok(())
}
