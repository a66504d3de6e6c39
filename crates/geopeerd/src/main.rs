//! geopeerd: peer location registry daemon.

use anyhow::{Context, Result};
use tokio::sync::broadcast;

use geopeer_api::{ApiState, ShutdownOutcome};
use geopeer_core::GeopeerConfig;
use geopeer_services::{PeerLookup, PeerStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config
    if let Err(e) = GeopeerConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let config = GeopeerConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        GeopeerConfig::default()
    });
    tracing::info!(
        bind = %config.server.bind_addr,
        store = %config.store.path.display(),
        lookup = config.lookup.strategy.as_str(),
        "geopeerd starting"
    );

    // Store
    let store = Store::new(config.store.clone());
    store
        .init_schema()
        .with_context(|| format!("failed to prepare store at {}", config.store.path.display()))?;

    let state = ApiState::new(
        PeerStore::new(store.clone()),
        PeerLookup::new(store, config.lookup.strategy),
    );

    // ── Shutdown channel ─────────────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            tracing::info!("shutdown signal received");
            let _ = shutdown.send(());
        });
    }

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;

    let outcome = geopeer_api::serve(state, listener, shutdown_rx, config.server.shutdown_grace())
        .await
        .context("API server failed")?;

    match outcome {
        ShutdownOutcome::Drained => {
            tracing::info!("geopeerd stopped");
            Ok(())
        }
        ShutdownOutcome::Forced => {
            // Blocking store work may still be running; don't wait on it.
            tracing::warn!("geopeerd forced to stop");
            std::process::exit(1);
        }
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for SIGTERM, relying on ctrl-c");
            tokio::signal::ctrl_c().await.ok();
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    tokio::signal::ctrl_c().await.ok();
}
