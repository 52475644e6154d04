//! Error types for airwave-rd
//!
//! Module-specific error types using thiserror for clear error propagation.

use airwave_common::ResolveError;
use thiserror::Error;

/// Main error type for the airwave-rd module
#[derive(Error, Debug)]
pub enum Error {
    /// Track lookup against the catalog failed
    #[error("Track resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    Http(String),
}

/// Convenience Result type using airwave-rd Error
pub type Result<T> = std::result::Result<T, Error>;
