//! geopeer integration test harness.
//!
//! Every test starts its own API server on an ephemeral localhost port,
//! backed by a fresh SQLite file under the temp dir, and talks to it over
//! real HTTP.

mod lookup;
mod validation;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use geopeer_api::{ApiState, ShutdownOutcome};
use geopeer_core::{LookupStrategy, StoreConfig};
use geopeer_services::{PeerLookup, PeerStore, Store};

// ── Harness ───────────────────────────────────────────────────────────────────

static NEXT_SERVER: AtomicUsize = AtomicUsize::new(0);

pub struct TestServer {
    pub base: String,
    pub store: Store,
    pub client: reqwest::Client,
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<Result<ShutdownOutcome>>,
    dir: PathBuf,
}

fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "geopeer-it-{}-{}-{}",
        tag,
        std::process::id(),
        NEXT_SERVER.fetch_add(1, Ordering::Relaxed)
    ))
}

const GRACE: Duration = Duration::from_secs(5);

/// Server over a schema-initialized store.
pub async fn start_server(tag: &str, strategy: LookupStrategy) -> Result<TestServer> {
    start_server_with_grace(tag, strategy, GRACE).await
}

pub async fn start_server_with_grace(
    tag: &str,
    strategy: LookupStrategy,
    grace: Duration,
) -> Result<TestServer> {
    let dir = temp_dir(tag);
    let _ = std::fs::remove_dir_all(&dir);
    let store = Store::new(StoreConfig::at(dir.join("peers.db")));
    store.init_schema().context("init schema")?;
    spawn(store, strategy, dir, grace).await
}

/// Server whose store can never be opened.
pub async fn start_broken_server(tag: &str) -> Result<TestServer> {
    let dir = temp_dir(tag);
    let store = Store::new(StoreConfig::at(dir.join("missing").join("peers.db")));
    spawn(store, LookupStrategy::PerRow, dir, GRACE).await
}

async fn spawn(
    store: Store,
    strategy: LookupStrategy,
    dir: PathBuf,
    grace: Duration,
) -> Result<TestServer> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base = format!("http://{}", listener.local_addr()?);

    let state = ApiState::new(PeerStore::new(store.clone()), PeerLookup::new(store.clone(), strategy));
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let task = tokio::spawn(geopeer_api::serve(
        state,
        listener,
        shutdown_rx,
        grace,
    ));

    Ok(TestServer {
        base,
        store,
        client: reqwest::Client::new(),
        shutdown_tx,
        task,
        dir,
    })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base, path)
    }

    pub async fn put_peer(&self, peer_id: &str, lng: f64, lat: f64) -> Result<(u16, Value)> {
        let body = serde_json::json!({
            "peer_id": peer_id,
            "addr": format!("{peer_id}.example:4001"),
            "credential": "secret",
            "longitude": lng,
            "latitude": lat,
        });
        self.send(reqwest::Method::POST, "/peer", &body).await
    }

    pub async fn read(&self, lng: f64, lat: f64, radius: f64) -> Result<(u16, Value)> {
        let body = serde_json::json!({ "longitude": lng, "latitude": lat, "radius": radius });
        self.send(reqwest::Method::GET, "/peer/read", &body).await
    }

    pub async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &Value,
    ) -> Result<(u16, Value)> {
        let resp = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))?;
        let status = resp.status().as_u16();
        let json = resp.json::<Value>().await.context("response was not JSON")?;
        Ok((status, json))
    }

    /// Ids from a successful lookup.
    pub async fn read_ids(&self, lng: f64, lat: f64, radius: f64) -> Result<Vec<String>> {
        let (status, body) = self.read(lng, lat, radius).await?;
        anyhow::ensure!(status == 200, "lookup failed with {status}: {body}");
        let ids = body["location"]
            .as_array()
            .context("location is not an array")?
            .iter()
            .map(|v| v.as_str().map(str::to_string).context("id is not a string"))
            .collect::<Result<Vec<_>>>()?;
        Ok(ids)
    }

    /// Address to open raw TCP connections against.
    pub fn addr(&self) -> &str {
        self.base.trim_start_matches("http://")
    }

    /// Signal shutdown and wait for the server to stop. The temp dir is
    /// removed whatever the outcome.
    pub async fn stop(self) -> Result<ShutdownOutcome> {
        let _ = self.shutdown_tx.send(());
        let joined = self.task.await;
        let _ = std::fs::remove_dir_all(&self.dir);
        joined?
    }
}
