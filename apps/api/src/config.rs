use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
/// Inline profile pictures arrive as data URLs, so the body limit is well above axum's 2 MiB.
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!(
                "STORAGE_BACKEND must be 'postgres' or 'memory', got '{other}'"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    /// Required when `storage_backend` is `Postgres`.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub port: u16,
    pub max_body_bytes: usize,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_backend: StorageBackend::Memory,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::Postgres,
        };

        let database_url = lookup("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(anyhow!(
                "Required environment variable 'DATABASE_URL' is not set"
            ));
        }

        Ok(Config {
            storage_backend,
            database_url,
            db_max_connections: parse_or(
                &lookup,
                "DB_MAX_CONNECTIONS",
                DEFAULT_DB_MAX_CONNECTIONS,
            )?,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_postgres_with_url() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/cv")]))
                .unwrap();
        assert_eq!(config.storage_backend, StorageBackend::Postgres);
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_max_connections, 10);
    }

    #[test]
    fn test_memory_backend_needs_no_url() {
        let config = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "Memory"),
            ("PORT", "3000"),
            ("MAX_BODY_BYTES", "1024"),
        ]))
        .unwrap();
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_body_bytes, 1024);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_bad_port_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("STORAGE_BACKEND", "mongo")])).is_err());
    }
}
