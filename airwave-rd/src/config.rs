//! airwave-rd specific configuration

use airwave_common::config::{resolve_setting, FileConfig};

/// Default listen port for the radio daemon
pub const DEFAULT_PORT: u16 = 5780;

/// Default catalog endpoint the track resolver queries
pub const DEFAULT_CATALOG_URL: &str = "http://127.0.0.1:5781";

/// Radio daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub catalog_url: String,
}

impl Config {
    /// Merge command-line/env values with the config file tier.
    pub fn resolve(cli_port: Option<u16>, cli_catalog_url: Option<String>, file: FileConfig) -> Self {
        Self {
            port: resolve_setting(cli_port, file.port, DEFAULT_PORT),
            catalog_url: resolve_setting(
                cli_catalog_url,
                file.catalog_url,
                DEFAULT_CATALOG_URL.to_string(),
            ),
        }
    }
}
