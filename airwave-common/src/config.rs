//! Configuration loading and settings resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The environment variables are consumed by the clap layer in the binary;
//! this module covers the file tier and the merge helpers.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional settings read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub catalog_url: Option<String>,
}

impl FileConfig {
    /// Load from an explicit path, or from the platform default location.
    ///
    /// A missing default-location file is not an error (empty config); an
    /// explicit path that cannot be read is.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }
}

/// Default configuration file path for the platform
fn default_config_path() -> Option<PathBuf> {
    if cfg!(target_os = "linux") {
        // ~/.config/airwave/config.toml, then /etc/airwave/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("airwave").join("config.toml"));
        if let Some(path) = user_config {
            if path.exists() {
                return Some(path);
            }
        }
        let system_config = PathBuf::from("/etc/airwave/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
        None
    } else {
        dirs::config_dir().map(|d| d.join("airwave").join("config.toml"))
    }
}

/// Merge one setting across the cli > file > default tiers.
///
/// Environment variables are already folded into `cli` by clap's `env`
/// attribute, so they inherit the cli tier's priority.
pub fn resolve_setting<T: Clone>(cli: Option<T>, file: Option<T>, default: T) -> T {
    cli.or(file).unwrap_or(default)
}
