//! Radius lookup: enumerate peers, keep those inside the query buffer.

use rusqlite::params;

use geopeer_core::{LookupQuery, LookupStrategy};

use crate::error::PeerError;
use crate::peer_store::PeerStore;
use crate::proximity::ProximityMatcher;
use crate::store::{Store, StoreHandle};

#[derive(Clone)]
pub struct PeerLookup {
    store: Store,
    strategy: LookupStrategy,
}

impl PeerLookup {
    pub fn new(store: Store, strategy: LookupStrategy) -> Self {
        Self { store, strategy }
    }

    pub fn strategy(&self) -> LookupStrategy {
        self.strategy
    }

    /// Ids of every stored peer within the query radius, in insertion order.
    ///
    /// Runs to completion once started. Either the full matching set comes
    /// back or a single error does; partial matches are never returned.
    pub fn lookup(&self, query: &LookupQuery) -> Result<Vec<String>, PeerError> {
        let handle = self.store.open()?;
        let matches = match self.strategy {
            LookupStrategy::PerRow => per_row(&handle, query)?,
            LookupStrategy::SingleQuery => single_query(&handle, query)?,
        };
        tracing::debug!(
            longitude = query.longitude,
            latitude = query.latitude,
            radius = query.radius,
            strategy = self.strategy.as_str(),
            matched = matches.len(),
            "lookup complete"
        );
        Ok(matches)
    }
}

/// Reference behavior: one containment query per stored row.
fn per_row(handle: &StoreHandle, query: &LookupQuery) -> Result<Vec<String>, PeerError> {
    let mut matched = Vec::new();
    PeerStore::scan(handle, |peer| {
        if ProximityMatcher::is_within_radius(handle, peer.longitude, peer.latitude, query)? {
            matched.push(peer.peer_id);
        }
        Ok(())
    })?;
    Ok(matched)
}

/// Predicate pushed into the scan itself. Same ids, same order.
fn single_query(handle: &StoreHandle, query: &LookupQuery) -> Result<Vec<String>, PeerError> {
    let mut stmt = handle.prepare(
        "SELECT peer_id FROM peer
         WHERE ST_Within_Buffer(location, ST_Point(?1, ?2), ?3)
         ORDER BY rowid",
    )?;
    let ids = stmt
        .query_map(
            params![query.longitude, query.latitude, query.effective_radius()],
            |row| row.get::<_, String>(0),
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}
