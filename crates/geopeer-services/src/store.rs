//! Store handles: one SQLite connection per request.
//!
//! SQLite has no geometry type, so every handle registers a small set of
//! spatial SQL functions over WKT point text:
//!
//! - `ST_GeomFromText(wkt)`  validate and normalize a point
//! - `ST_Point(x, y)`        build a point
//! - `ST_X(g)` / `ST_Y(g)`   longitude / latitude accessors
//! - `ST_Within_Buffer(g, center, r)`  is `g` inside the disc of `r` around `center`

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use geopeer_core::{GeoPoint, GeometryError, StoreConfig};

use crate::error::PeerError;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS peer (
        peer_id    TEXT PRIMARY KEY,
        addr       TEXT NOT NULL,
        credential TEXT NOT NULL,
        location   TEXT NOT NULL
    );
";

/// Shared, cheaply cloneable entry point to the database.
///
/// Holds configuration only. Every caller acquires its own handle with
/// [`Store::open`]; nothing is pooled or reused across requests.
#[derive(Clone)]
pub struct Store {
    config: Arc<StoreConfig>,
    opened: Arc<AtomicU64>,
}

/// A live connection scoped to one request. Closed on drop.
pub struct StoreHandle {
    conn: Connection,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config: Arc::new(config),
            opened: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Acquire a fresh handle with spatial functions registered.
    pub fn open(&self) -> Result<StoreHandle, PeerError> {
        self.opened.fetch_add(1, Ordering::Relaxed);
        let conn = Connection::open(&self.config.path)?;
        conn.busy_timeout(self.config.busy_timeout())?;
        register_spatial_functions(&conn)?;
        tracing::trace!(path = %self.config.path.display(), "store handle acquired");
        Ok(StoreHandle { conn })
    }

    /// Create the parent directory and the `peer` table if missing.
    pub fn init_schema(&self) -> Result<(), PeerError> {
        if let Some(parent) = self.config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let handle = self.open()?;
        handle.execute_batch(SCHEMA)?;
        tracing::info!(path = %self.config.path.display(), "peer schema ready");
        Ok(())
    }

    /// Handle acquisitions since construction, failed ones included.
    pub fn connections_opened(&self) -> u64 {
        self.opened.load(Ordering::Relaxed)
    }
}

impl Deref for StoreHandle {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl DerefMut for StoreHandle {
    fn deref_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Drop for StoreHandle {
    fn drop(&mut self) {
        tracing::trace!("store handle released");
    }
}

// ── Spatial SQL functions ─────────────────────────────────────────────────────

fn geometry_err(e: GeometryError) -> rusqlite::Error {
    rusqlite::Error::UserFunctionError(Box::new(e))
}

fn point_arg(ctx: &rusqlite::functions::Context<'_>, idx: usize) -> rusqlite::Result<GeoPoint> {
    let text: String = ctx.get(idx)?;
    GeoPoint::from_wkt(&text).map_err(geometry_err)
}

fn register_spatial_functions(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("ST_GeomFromText", 1, flags, |ctx| {
        Ok(point_arg(ctx, 0)?.to_wkt())
    })?;

    conn.create_scalar_function("ST_Point", 2, flags, |ctx| {
        let x: f64 = ctx.get(0)?;
        let y: f64 = ctx.get(1)?;
        Ok(format!("POINT({} {})", x, y))
    })?;

    conn.create_scalar_function("ST_X", 1, flags, |ctx| Ok(point_arg(ctx, 0)?.x))?;
    conn.create_scalar_function("ST_Y", 1, flags, |ctx| Ok(point_arg(ctx, 0)?.y))?;

    conn.create_scalar_function("ST_Within_Buffer", 3, flags, |ctx| {
        let geom = point_arg(ctx, 0)?;
        let center = point_arg(ctx, 1)?;
        let radius: f64 = ctx.get(2)?;
        Ok(geom.within_buffer(&center, radius))
    })?;

    Ok(())
}
