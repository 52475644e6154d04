//! # Airwave Common Library
//!
//! Shared code for the Airwave radio services including:
//! - Wire event types (ServerEvent / ClientCommand)
//! - Track metadata model
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, ResolveError, Result};
