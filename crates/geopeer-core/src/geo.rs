//! Planar point geometry and its WKT text form.
//!
//! Points are stored by the database as `POINT(x y)` text, with `x` the
//! longitude and `y` the latitude. Distances are planar Euclidean in
//! coordinate units (degrees); nothing here is geodesic.

use serde::{Deserialize, Serialize};

/// A 2D point: `x` = longitude, `y` = latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeometryError {
    #[error("expected POINT(x y), got {0:?}")]
    Malformed(String),
    #[error("coordinate is not a finite number: {0:?}")]
    NonFinite(String),
}

impl GeoPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// WKT with six fractional digits per coordinate.
    ///
    /// Points written by the insert path and candidate points built by the
    /// matcher both go through this, so a stored location compares equal to
    /// itself regardless of how many digits the caller supplied.
    pub fn to_wkt(&self) -> String {
        format!("POINT({:.6} {:.6})", self.x, self.y)
    }

    /// Parse `POINT(x y)`. Case-insensitive keyword, free whitespace.
    pub fn from_wkt(text: &str) -> Result<Self, GeometryError> {
        let malformed = || GeometryError::Malformed(text.to_string());

        let trimmed = text.trim();
        let keyword = trimmed.get(..5).ok_or_else(malformed)?;
        if !keyword.eq_ignore_ascii_case("POINT") {
            return Err(malformed());
        }
        let body = trimmed[5..]
            .trim_start()
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(malformed)?;

        let mut coords = body.split_whitespace();
        let (Some(xs), Some(ys), None) = (coords.next(), coords.next(), coords.next()) else {
            return Err(malformed());
        };

        Ok(Self {
            x: parse_coord(xs)?,
            y: parse_coord(ys)?,
        })
    }

    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Is this point inside the closed disc of `radius` around `center`?
    ///
    /// A negative radius is an empty buffer and contains nothing. A zero
    /// radius contains only the center itself.
    pub fn within_buffer(&self, center: &GeoPoint, radius: f64) -> bool {
        radius >= 0.0 && self.distance_to(center) <= radius
    }
}

fn parse_coord(s: &str) -> Result<f64, GeometryError> {
    let v: f64 = s
        .parse()
        .map_err(|_| GeometryError::Malformed(s.to_string()))?;
    if !v.is_finite() {
        return Err(GeometryError::NonFinite(s.to_string()));
    }
    Ok(v)
}
