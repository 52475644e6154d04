//! Common error types for Airwave

use thiserror::Error;

/// Common result type for Airwave operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Airwave services
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Track resolution failures reported by a catalog lookup.
///
/// The sync engine treats both kinds identically (the load fails and shared
/// state clears); the distinction is kept in the type for callers that want
/// to retry transient failures.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Track id is unknown to the catalog
    #[error("Track not found: {0}")]
    NotFound(String),

    /// Catalog lookup failed for a reason that may clear up on retry
    #[error("Catalog lookup failed: {0}")]
    Transient(String),
}
