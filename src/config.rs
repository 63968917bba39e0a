//! Environment-driven configuration.
//!
//! Two values, both optional: `PORT` selects the listening port for the
//! embedding transport (this crate does not bind sockets itself) and
//! `SCHEMA_PATH` points at the schema document to load at startup.

use log::warn;
use std::path::PathBuf;

/// Port used when `PORT` is unset or unparseable.
pub const DEFAULT_PORT: u16 = 3000;

/// Schema document location used when `SCHEMA_PATH` is unset.
pub const DEFAULT_SCHEMA_PATH: &str = "schemas/users-api.json";

/// Resolved configuration for an embedding process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub schema_path: PathBuf,
}

impl ServerConfig {
    /// Read configuration from the process environment, falling back to
    /// defaults for anything unset or invalid.
    pub fn from_env() -> Self {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("ignoring unparseable PORT value '{raw}', using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };
        let schema_path = std::env::var_os("SCHEMA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH));
        Self { port, schema_path }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.schema_path, PathBuf::from("schemas/users-api.json"));
    }
}
