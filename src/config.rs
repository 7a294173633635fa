//! Server configuration parsed from environment variables.

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Volatile in-process store. Rooms last for the process lifetime.
    Memory,
    /// Postgres-backed document store.
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub backend: StoreBackend,
    pub db_max_connections: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown STORE_BACKEND: {0} (expected 'memory' or 'postgres')")]
    UnknownBackend(String),
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("DATABASE_URL required when STORE_BACKEND=postgres")]
    MissingDatabaseUrl,
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `STORE_BACKEND`: `memory` (default) or `postgres`
    /// - `DATABASE_URL`: required when the backend is `postgres`
    /// - `DB_MAX_CONNECTIONS`: default 5
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_port(std::env::var("PORT").ok().as_deref())?;
        let backend = parse_backend(
            std::env::var("STORE_BACKEND").ok().as_deref(),
            std::env::var("DATABASE_URL").ok(),
        )?;
        let db_max_connections = env_parse_u32("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS);

        Ok(Self { port, backend, db_max_connections })
    }
}

fn env_parse_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(DEFAULT_PORT),
        Some(value) => value.parse::<u16>().map_err(|_| ConfigError::InvalidPort(value.to_owned())),
    }
}

fn parse_backend(raw: Option<&str>, database_url: Option<String>) -> Result<StoreBackend, ConfigError> {
    match raw.unwrap_or("memory") {
        "memory" => Ok(StoreBackend::Memory),
        "postgres" => {
            let database_url = database_url.ok_or(ConfigError::MissingDatabaseUrl)?;
            Ok(StoreBackend::Postgres { database_url })
        }
        other => Err(ConfigError::UnknownBackend(other.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
