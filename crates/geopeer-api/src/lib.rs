pub mod handlers;

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

pub use handlers::ApiState;

/// How the server stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight request finished inside the grace period.
    Drained,
    /// The grace period ran out; remaining connections were dropped.
    Forced,
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/peer", post(handlers::handle_put_peer))
        .route("/peer/read", get(handlers::handle_read_peer))
        .route("/status", get(handlers::handle_status))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(cors)
}

/// Serve until `shutdown` fires, then stop accepting and give in-flight
/// requests `grace` to finish.
pub async fn serve(
    state: ApiState,
    listener: TcpListener,
    mut shutdown: broadcast::Receiver<()>,
    grace: Duration,
) -> anyhow::Result<ShutdownOutcome> {
    let addr = listener.local_addr()?;
    let app = router(state);

    let mut stop_accepting = shutdown.resubscribe();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = stop_accepting.recv().await;
    });
    let mut server_task = tokio::spawn(async move { server.await });
    tracing::info!(%addr, "API listening");

    tokio::select! {
        r = &mut server_task => {
            r??;
            return Ok(ShutdownOutcome::Drained);
        }
        _ = shutdown.recv() => {}
    }

    tracing::info!(grace_secs = grace.as_secs(), "no longer accepting requests, draining");
    match tokio::time::timeout(grace, &mut server_task).await {
        Ok(r) => {
            r??;
            tracing::info!("server shutdown");
            Ok(ShutdownOutcome::Drained)
        }
        Err(_) => {
            tracing::warn!("grace period elapsed, dropping in-flight requests");
            server_task.abort();
            Ok(ShutdownOutcome::Forced)
        }
    }
}
