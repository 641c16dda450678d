//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use std::net::Ipv4Addr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_pool_size: usize,
    pub timeout_secs: u64,
    pub require_tls: bool,
}

impl DatabaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "solvefortomorrow".to_string(),
            max_pool_size: 10,
            timeout_secs: 10,
            require_tls: false,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}

/// Which store implementation backs the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::InvalidValue(format!(
                "STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub storage: StorageBackend,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is not an error
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            host: parse_or(&lookup, "HOST", server_defaults.host)?,
            port: parse_or(&lookup, "PORT", server_defaults.port)?,
        };

        let defaults = DatabaseConfig::default();
        let max_pool_size = parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_pool_size)?;
        let timeout_secs = parse_or(&lookup, "DB_TIMEOUT_SECS", defaults.timeout_secs)?;
        if max_pool_size == 0 {
            return Err(ConfigError::InvalidValue(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "DB_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        // DATABASE_URL takes precedence over the individual DB_* variables
        let mut database = if let Some(database_url) = lookup("DATABASE_URL") {
            Self::parse_database_url(&database_url)?
        } else {
            DatabaseConfig {
                host: lookup("DB_HOST").unwrap_or(defaults.host),
                port: parse_or(&lookup, "DB_PORT", defaults.port)?,
                user: lookup("DB_USER").unwrap_or(defaults.user),
                password: lookup("DB_PASSWORD").unwrap_or_default(),
                database: lookup("DB_DATABASE").unwrap_or(defaults.database),
                require_tls: lookup("DB_SSLMODE")
                    .map(|mode| mode.eq_ignore_ascii_case("require"))
                    .unwrap_or(false),
                ..defaults
            }
        };
        database.max_pool_size = max_pool_size;
        database.timeout_secs = timeout_secs;

        let cors = CorsConfig {
            allowed_origin: lookup("CORS_ORIGIN")
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| CorsConfig::default().allowed_origin),
        };

        let storage = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::default(),
        };

        Ok(Self {
            server,
            database,
            cors,
            storage,
        })
    }

    /// Parse a DATABASE_URL connection string (postgresql://...)
    fn parse_database_url(url: &str) -> Result<DatabaseConfig, ConfigError> {
        let parsed = url::Url::parse(url).map_err(|_| {
            ConfigError::InvalidValue(
                "Invalid DATABASE_URL format (expected postgresql://...)".to_string(),
            )
        })?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::InvalidValue("Missing host in DATABASE_URL".to_string()))?
            .to_string();

        let database = parsed.path().trim_start_matches('/').to_string();
        if database.is_empty() {
            return Err(ConfigError::InvalidValue(
                "Missing database name in DATABASE_URL".to_string(),
            ));
        }

        let require_tls = parsed
            .query_pairs()
            .any(|(key, value)| key == "sslmode" && value == "require");

        Ok(DatabaseConfig {
            host,
            port: parsed.port().unwrap_or(5432),
            user: parsed.username().to_string(),
            password: parsed.password().map(|p| p.to_string()).unwrap_or_default(),
            database,
            require_tls,
            ..DatabaseConfig::default()
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            ConfigError::InvalidValue(format!("{} has an invalid value: '{}'", key, raw))
        }),
        None => Ok(default),
    }
}
