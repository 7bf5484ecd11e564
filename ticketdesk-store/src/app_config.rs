use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub bookings: BookingsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory holding the single-page client, served for unmatched routes.
    pub static_dir: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 { 5 }
fn default_acquire_timeout() -> u64 { 3 }

#[derive(Debug, Deserialize, Clone)]
pub struct BookingsConfig {
    /// Inserts attempted per create before giving up on a booking-number collision.
    #[serde(default = "default_insert_attempts")]
    pub insert_attempts: u32,
}

impl Default for BookingsConfig {
    fn default() -> Self {
        Self { insert_attempts: default_insert_attempts() }
    }
}

fn default_insert_attempts() -> u32 { 3 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `TICKETDESK__SERVER__PORT=9000` sets `server.port`
            .add_source(config::Environment::with_prefix("TICKETDESK").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// The database section, required when the Postgres backend is selected.
    pub fn database(&self) -> Result<&DatabaseConfig, config::ConfigError> {
        self.database
            .as_ref()
            .ok_or_else(|| config::ConfigError::NotFound("database.url".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn from_toml(toml: &str) -> Config {
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = from_toml(
            r#"
            [server]
            port = 8080

            [database]
            url = "postgres://localhost/ticketdesk"
            "#,
        );
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.bookings.insert_attempts, 3);
        let db = config.database().unwrap();
        assert_eq!(db.max_connections, 5);
        assert_eq!(db.acquire_timeout_secs, 3);
        assert!(config.server.static_dir.is_none());
    }

    #[test]
    fn test_memory_backend_needs_no_database() {
        let config = from_toml(
            r#"
            [server]
            port = 9000
            static_dir = "wwwroot"

            [storage]
            backend = "memory"

            [bookings]
            insert_attempts = 5
            "#,
        );
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.bookings.insert_attempts, 5);
        assert_eq!(config.server.static_dir.as_deref(), Some("wwwroot"));
        assert!(config.database().is_err());
    }
}
