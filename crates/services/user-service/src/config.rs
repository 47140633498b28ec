//! User service configuration.

use std::env;

use common::{DatabaseConfig, ServerConfig};

/// Which record store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// SeaORM over the configured database
    Database,
    /// Process-local store, contents are lost on exit
    Memory,
}

impl StoreBackend {
    /// Parse a backend name (`database` or `memory`, case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "database" | "db" => Some(StoreBackend::Database),
            "memory" | "mem" => Some(StoreBackend::Memory),
            _ => None,
        }
    }
}

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// HTTP bind address
    pub server: ServerConfig,
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Selected record store
    pub store: StoreBackend,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let store = match env::var("USER_SERVICE_STORE") {
            Ok(name) => StoreBackend::from_name(&name).unwrap_or_else(|| {
                tracing::warn!("Unknown USER_SERVICE_STORE '{}', using database", name);
                StoreBackend::Database
            }),
            Err(_) => defaults.store,
        };

        Self {
            server: ServerConfig {
                host: env::var("USER_SERVICE_HOST").unwrap_or(defaults.server.host),
                port: env::var("USER_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            database: DatabaseConfig {
                url: env::var("USER_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.database.url),
                max_connections: env::var("USER_SERVICE_DB_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(defaults.database.max_connections),
                min_connections: defaults.database.min_connections,
            },
            store,
        }
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            store: StoreBackend::Database,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_from_name() {
        assert_eq!(StoreBackend::from_name("memory"), Some(StoreBackend::Memory));
        assert_eq!(StoreBackend::from_name(" Database "), Some(StoreBackend::Database));
        assert_eq!(StoreBackend::from_name("db"), Some(StoreBackend::Database));
        assert_eq!(StoreBackend::from_name("redis"), None);
    }

    #[test]
    fn test_defaults() {
        let config = UserServiceConfig::default();
        assert_eq!(config.store, StoreBackend::Database);
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert_eq!(config.database.max_connections, 10);
    }
}
