//! geopeer-core: shared geometry, query and configuration types.
//! All other geopeer crates depend on this one.

pub mod config;
pub mod geo;
pub mod query;

pub use config::{GeopeerConfig, LookupStrategy, StoreConfig};
pub use geo::{GeoPoint, GeometryError};
pub use query::{LookupQuery, RADIUS_SCALE};
