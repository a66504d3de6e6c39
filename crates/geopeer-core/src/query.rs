//! Lookup query value object and radius scaling.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Converts a caller radius (meters) to coordinate units (degrees).
///
/// 0.009 degrees per kilometer is roughly one degree per 111 km at the
/// equator. Known approximation: it ignores latitude and is not geodesic.
pub const RADIUS_SCALE: f64 = 0.009 / 1000.0;

/// A radius lookup around a center point. Lives for one lookup call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LookupQuery {
    pub longitude: f64,
    pub latitude: f64,
    pub radius: f64,
}

impl LookupQuery {
    pub fn new(longitude: f64, latitude: f64, radius: f64) -> Self {
        Self {
            longitude,
            latitude,
            radius,
        }
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    /// Buffer radius handed to the containment predicate.
    pub fn effective_radius(&self) -> f64 {
        self.radius * RADIUS_SCALE
    }
}
