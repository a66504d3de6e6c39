//! Proximity matcher: one containment query per candidate point.

use rusqlite::params;

use geopeer_core::{GeoPoint, LookupQuery};

use crate::error::PeerError;
use crate::store::StoreHandle;

/// Returns a row iff the candidate lies inside the query buffer.
const WITHIN_BUFFER: &str =
    "SELECT ?1 WHERE ST_Within_Buffer(ST_GeomFromText(?1), ST_Point(?2, ?3), ?4)";

pub struct ProximityMatcher;

impl ProximityMatcher {
    /// Is `(candidate_lng, candidate_lat)` within `query.radius` of the
    /// query center?
    ///
    /// The radius is scaled by [`geopeer_core::RADIUS_SCALE`] before the
    /// store evaluates the predicate. "No row" means outside and is
    /// reported as `false`.
    pub fn is_within_radius(
        handle: &StoreHandle,
        candidate_lng: f64,
        candidate_lat: f64,
        query: &LookupQuery,
    ) -> Result<bool, PeerError> {
        let candidate = GeoPoint::new(candidate_lng, candidate_lat).to_wkt();
        let mut stmt = handle.prepare_cached(WITHIN_BUFFER)?;
        let hit = stmt.query_row(
            params![
                candidate,
                query.longitude,
                query.latitude,
                query.effective_radius()
            ],
            |row| row.get::<_, String>(0),
        );

        match hit.map_err(PeerError::from) {
            Ok(_) => Ok(true),
            Err(PeerError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
