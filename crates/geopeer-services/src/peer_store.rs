//! Peer store: deduplicated inserts and full enumeration.
//!
//! The existence check only avoids noisy constraint errors. Two concurrent
//! inserts of the same new `peer_id` can both pass it; the table's primary
//! key is what keeps the second row out, and that insert then fails with a
//! storage error.

use rusqlite::params;

use geopeer_core::GeoPoint;

use crate::error::PeerError;
use crate::store::{Store, StoreHandle};

/// A peer registration as received from a client.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPeer {
    pub peer_id: String,
    /// Contact endpoint. Stored, never validated.
    pub addr: String,
    /// Opaque token. Stored, never validated.
    pub credential: String,
    pub location: GeoPoint,
}

/// One enumerated row, with the stored point decomposed.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerLocation {
    pub peer_id: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// Outcome of [`PeerStore::insert`]. Both variants are success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyPresent,
}

#[derive(Clone)]
pub struct PeerStore {
    store: Store,
}

impl PeerStore {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Insert a peer unless its id is already stored.
    ///
    /// An existing id is a no-op: the first record, including its location,
    /// is left untouched and the call still succeeds.
    pub fn insert(&self, peer: &NewPeer) -> Result<InsertOutcome, PeerError> {
        let handle = self.store.open()?;

        if Self::exists(&handle, &peer.peer_id)? {
            tracing::debug!(peer_id = %peer.peer_id, "peer already registered, skipping insert");
            return Ok(InsertOutcome::AlreadyPresent);
        }

        handle.execute(
            "INSERT INTO peer (peer_id, addr, credential, location)
             VALUES (?1, ?2, ?3, ST_GeomFromText(?4))",
            params![
                peer.peer_id,
                peer.addr,
                peer.credential,
                peer.location.to_wkt()
            ],
        )?;

        tracing::info!(
            peer_id = %peer.peer_id,
            longitude = peer.location.x,
            latitude = peer.location.y,
            "peer registered"
        );
        Ok(InsertOutcome::Inserted)
    }

    /// Is `peer_id` stored? No row reads as `false`, not an error.
    pub fn exists(handle: &StoreHandle, peer_id: &str) -> Result<bool, PeerError> {
        let found = handle.query_row(
            "SELECT EXISTS (SELECT 1 FROM peer WHERE peer_id = ?1)",
            params![peer_id],
            |row| row.get::<_, bool>(0),
        );
        match found {
            Ok(b) => Ok(b),
            Err(e) => match PeerError::from(e) {
                PeerError::NotFound => Ok(false),
                other => Err(other),
            },
        }
    }

    /// Walk every stored peer in insertion order.
    ///
    /// The cursor lives only for the duration of this call, so `visit` sees
    /// each row exactly once and the walk cannot be restarted. An error from
    /// the store or from `visit` stops the walk and is returned; anything the
    /// visitor gathered before that point must be discarded.
    pub fn scan<F>(handle: &StoreHandle, mut visit: F) -> Result<(), PeerError>
    where
        F: FnMut(PeerLocation) -> Result<(), PeerError>,
    {
        let mut stmt =
            handle.prepare("SELECT peer_id, ST_X(location), ST_Y(location) FROM peer ORDER BY rowid")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            visit(PeerLocation {
                peer_id: row.get(0)?,
                longitude: row.get(1)?,
                latitude: row.get(2)?,
            })?;
        }
        Ok(())
    }

    /// Every stored peer, collected. All-or-nothing.
    pub fn fetch_all(&self) -> Result<Vec<PeerLocation>, PeerError> {
        let handle = self.store.open()?;
        let mut out = Vec::new();
        Self::scan(&handle, |loc| {
            out.push(loc);
            Ok(())
        })?;
        Ok(out)
    }

    /// Stored location for one peer, if registered.
    pub fn location_of(&self, peer_id: &str) -> Result<Option<GeoPoint>, PeerError> {
        let handle = self.store.open()?;
        let found = handle.query_row(
            "SELECT ST_X(location), ST_Y(location) FROM peer WHERE peer_id = ?1",
            params![peer_id],
            |row| Ok(GeoPoint::new(row.get(0)?, row.get(1)?)),
        );
        match found.map_err(PeerError::from) {
            Ok(p) => Ok(Some(p)),
            Err(PeerError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn count(&self) -> Result<u64, PeerError> {
        let handle = self.store.open()?;
        let n: i64 = handle.query_row("SELECT COUNT(*) FROM peer", [], |row| row.get(0))?;
        Ok(n as u64)
    }
}
