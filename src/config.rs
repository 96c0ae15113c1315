//! Environment-sourced configuration
//!
//! Every setting has a default, so the service starts against a local
//! PostgreSQL with no environment at all. Values that are present but do not
//! parse are reported as errors instead of silently falling back.

use std::env;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// PostgreSQL connection settings
#[derive(Clone, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    /// Maximum number of pooled connections
    pub pool_max_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "trade_orders".to_string(),
            ssl_mode: "disable".to_string(),
            pool_max_size: 10,
        }
    }
}

impl DatabaseConfig {
    /// Render a libpq keyword/value connection string
    ///
    /// Format: `host=... port=... user=... password=... dbname=... sslmode=...`
    pub fn url(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={}",
            quote_conninfo(&self.host),
            self.port,
            quote_conninfo(&self.user),
            quote_conninfo(&self.password),
            quote_conninfo(&self.name),
            quote_conninfo(&self.ssl_mode),
        )
    }
}

// Keep the password out of logs
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .field("pool_max_size", &self.pool_max_size)
            .finish()
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let string_or = |key: &str, default: String| lookup(key).unwrap_or(default);

        let database = DatabaseConfig {
            host: string_or("DB_HOST", defaults.database.host),
            port: parse_or(&lookup, "DB_PORT", defaults.database.port)?,
            user: string_or("DB_USER", defaults.database.user),
            password: string_or("DB_PASSWORD", defaults.database.password),
            name: string_or("DB_NAME", defaults.database.name),
            ssl_mode: string_or("DB_SSLMODE", defaults.database.ssl_mode),
            pool_max_size: parse_or(&lookup, "DB_POOL_MAX_SIZE", defaults.database.pool_max_size)?,
        };

        let server = ServerConfig {
            host: string_or("HOST", defaults.server.host),
            port: parse_or(&lookup, "PORT", defaults.server.port)?,
        };

        Ok(Self { database, server })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

// Values with spaces, quotes or backslashes (or empty ones) must be quoted
fn quote_conninfo(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');

    if !needs_quotes {
        return value.to_string();
    }

    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_empty() {
        let config = AppConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.name, "trade_orders");
        assert_eq!(config.database.ssl_mode, "disable");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_USER", "orders"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "orders_test"),
            ("DB_SSLMODE", "require"),
            ("DB_POOL_MAX_SIZE", "4"),
            ("PORT", "9000"),
        ]))
        .unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.pool_max_size, 4);
        assert_eq!(config.server.addr(), "0.0.0.0:9000");
        assert_eq!(
            config.database.url(),
            "host=db.internal port=6543 user=orders password=secret dbname=orders_test sslmode=require"
        );
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();

        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "PORT");
                assert_eq!(value, "eighty");
            }
        }
    }

    #[test]
    fn test_url_quotes_special_values() {
        let config = DatabaseConfig {
            password: "it's a secret".to_string(),
            ..DatabaseConfig::default()
        };

        assert!(config.url().contains(r"password='it\'s a secret'"));
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", DatabaseConfig::default());
        assert!(rendered.contains(r#"password: "***""#));
        assert!(!rendered.contains(r#"password: "postgres""#));
    }
}
