//! Server configuration.

use crate::error::ConfigError;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP server binds on.
    pub port: u16,
    /// Path to the libSQL database file.
    pub db_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            db_path: "./data/onboard.db".to_string(),
        }
    }
}

impl ServerConfig {
    /// Build the config from `ONBOARD_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match std::env::var("ONBOARD_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ONBOARD_PORT".to_string(),
                message: format!("expected a port number, got '{raw}'"),
            })?,
            Err(_) => defaults.port,
        };

        let db_path = std::env::var("ONBOARD_DB_PATH").unwrap_or(defaults.db_path);

        Ok(Self { port, db_path })
    }
}
