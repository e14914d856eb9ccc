use anyhow::{bail, Context, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::info;

/// Which `DiningStore` implementation the server runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => bail!("unknown store backend '{}', expected 'postgres' or 'memory'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OtelConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub service_name: String,
    pub environment: String,
    pub sampling_rate: f64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub run_migrations: bool,
    pub otel: OtelConfig,
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend: StoreBackend = parse_or(&lookup, "STORE_BACKEND", StoreBackend::Postgres)?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND is postgres");
        }

        let sampling_rate: f64 = parse_or(&lookup, "OTEL_TRACE_SAMPLING_RATE", 0.01)?;

        Ok(Self {
            port: parse_or(&lookup, "PORT", 3000)?,
            store_backend,
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true)?,
            otel: OtelConfig {
                enabled: parse_or(&lookup, "OTEL_ENABLED", false)?,
                endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT")
                    .unwrap_or_else(|| "http://localhost:4318/v1/traces".to_string()),
                service_name: lookup("OTEL_SERVICE_NAME")
                    .unwrap_or_else(|| "dining-review".to_string()),
                environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
                sampling_rate: sampling_rate.clamp(0.0, 1.0),
            },
        })
    }
}

impl Config {
    /// Log the effective settings; call once tracing is installed.
    /// The database URL is never logged since it may carry credentials.
    pub fn log_effective(&self) {
        info!(
            port = self.port,
            store_backend = %self.store_backend,
            database_url_set = self.database_url.is_some(),
            db_max_connections = self.db_max_connections,
            run_migrations = self.run_migrations,
            otel_enabled = self.otel.enabled,
            otel_sampling_rate = self.otel.sampling_rate,
            environment = %self.otel.environment,
            "Effective configuration"
        );
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("Invalid {} value: {}", key, raw)),
        None => Ok(default),
    }
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Postgres => f.write_str("postgres"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tracing_test::traced_test;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_database_url() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/dining")]))
            .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.db_max_connections, 5);
        assert!(config.run_migrations);
        assert!(!config.otel.enabled);
        assert_eq!(config.otel.service_name, "dining-review");
    }

    #[test]
    fn test_postgres_backend_requires_database_url() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
    }

    #[test]
    fn test_memory_backend_needs_no_database() {
        let config = Config::from_lookup(lookup_from(&[("STORE_BACKEND", "memory"), ("PORT", "8080")]))
            .unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.port, 8080);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = Config::from_lookup(lookup_from(&[("STORE_BACKEND", "memory"), ("PORT", "eighty")]))
            .unwrap_err();
        assert!(err.to_string().contains("PORT"));

        assert!(Config::from_lookup(lookup_from(&[("STORE_BACKEND", "redis")])).is_err());
    }

    #[test]
    fn test_sampling_rate_is_clamped() {
        let config = Config::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("OTEL_TRACE_SAMPLING_RATE", "7.5"),
        ]))
        .unwrap();

        assert_eq!(config.otel.sampling_rate, 1.0);
    }

    #[test]
    #[traced_test]
    fn test_effective_config_is_logged_without_database_url() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8081"),
            ("DATABASE_URL", "postgres://dining:hunter2@db/dining"),
        ]))
        .unwrap();

        assert!(!logs_contain("Effective configuration"));

        config.log_effective();

        assert!(logs_contain("Effective configuration"));
        assert!(logs_contain("port=8081"));
        assert!(logs_contain("database_url_set=true"));
        assert!(!logs_contain("hunter2"));
    }
}
