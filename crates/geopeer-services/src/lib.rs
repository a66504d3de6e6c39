//! geopeer-services: peer persistence and radius lookup over the store.

pub mod error;
pub mod lookup;
pub mod peer_store;
pub mod proximity;
pub mod store;

pub use error::PeerError;
pub use lookup::PeerLookup;
pub use peer_store::{InsertOutcome, NewPeer, PeerLocation, PeerStore};
pub use proximity::ProximityMatcher;
pub use store::{Store, StoreHandle};
