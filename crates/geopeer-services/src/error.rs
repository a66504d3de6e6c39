//! Error type shared by the peer store, matcher and lookup.

/// Failures surfaced by store-backed operations.
///
/// `NotFound` is an internal "no row matched" signal. Components convert it
/// to `false` or an empty result before it reaches a caller.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("no matching row")]
    NotFound,
    #[error("storage: {0}")]
    Storage(rusqlite::Error),
    #[error("store directory: {0}")]
    Directory(#[from] std::io::Error),
    #[error("blocking store task failed: {0}")]
    Worker(String),
}

impl From<rusqlite::Error> for PeerError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

impl PeerError {
    /// Client-side mistake rather than a server failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
