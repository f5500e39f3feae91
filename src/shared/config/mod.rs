//! Application configuration module
//!
//! Provides the configuration the server is started with, loaded from
//! environment variables (and a `.env` file, see the binary) or assembled
//! with [`AppConfigBuilder`].
//!
//! # Environment
//!
//! | Variable                | Default          |
//! |-------------------------|------------------|
//! | `SERVER_PORT`           | `8080`           |
//! | `DATABASE_URL`          | unset (in-memory store) |
//! | `AUTH_PRIVATE_KEY_FILE` | `./keys/dev.rsa` |
//! | `AUTH_KEY_ID`           | `123456`         |
//! | `AUTH_ALGORITHM`        | `RS256`          |
//! | `TOKEN_TTL_SECS`        | `86400`          |
//! | `BCRYPT_COST`           | `12`             |
//! | `STORE_TIMEOUT_SECS`    | `5`              |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default private key location, relative to the working directory.
pub const DEFAULT_PRIVATE_KEY_FILE: &str = "./keys/dev.rsa";
/// Default key id embedded in issued tokens.
pub const DEFAULT_KEY_ID: &str = "123456";
/// Default signing algorithm.
pub const DEFAULT_ALGORITHM: &str = "RS256";
/// Tokens expire 24 hours after issue unless configured otherwise.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Upper bound for a single credential store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to listen on (all interfaces)
    pub port: u16,
    /// PostgreSQL DSN; `None` selects the in-memory store
    pub database_url: Option<String>,
    /// Path of the PEM encoded RSA private key
    pub private_key_file: PathBuf,
    /// Key id written into the `kid` header of issued tokens
    pub key_id: String,
    /// JWT signing algorithm name (e.g. `RS256`)
    pub algorithm: String,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
    /// Timeout applied to each credential store call
    pub store_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            private_key_file: PathBuf::from(DEFAULT_PRIVATE_KEY_FILE),
            key_id: DEFAULT_KEY_ID.to_string(),
            algorithm: DEFAULT_ALGORITHM.to_string(),
            token_ttl: DEFAULT_TOKEN_TTL,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// Unset variables fall back to the defaults; set but unparsable values
    /// are rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = AppConfig::builder();

        if let Some(port) = lookup("SERVER_PORT") {
            builder = builder.port(parse_var("SERVER_PORT", &port)?);
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            builder = builder.database_url(url);
        }
        if let Some(path) = lookup("AUTH_PRIVATE_KEY_FILE") {
            builder = builder.private_key_file(path);
        }
        if let Some(key_id) = lookup("AUTH_KEY_ID") {
            builder = builder.key_id(key_id);
        }
        if let Some(algorithm) = lookup("AUTH_ALGORITHM") {
            builder = builder.algorithm(algorithm);
        }
        if let Some(secs) = lookup("TOKEN_TTL_SECS") {
            builder = builder.token_ttl(Duration::from_secs(parse_var("TOKEN_TTL_SECS", &secs)?));
        }
        if let Some(cost) = lookup("BCRYPT_COST") {
            builder = builder.bcrypt_cost(parse_var("BCRYPT_COST", &cost)?);
        }
        if let Some(secs) = lookup("STORE_TIMEOUT_SECS") {
            builder = builder
                .store_timeout(Duration::from_secs(parse_var("STORE_TIMEOUT_SECS", &secs)?));
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_id.trim().is_empty() {
            return Err(ConfigError::EmptyKeyId);
        }
        if self.token_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "TOKEN_TTL_SECS",
                value: "0".to_string(),
            });
        }
        if self.store_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "STORE_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    port: Option<u16>,
    database_url: Option<String>,
    private_key_file: Option<PathBuf>,
    key_id: Option<String>,
    algorithm: Option<String>,
    token_ttl: Option<Duration>,
    bcrypt_cost: Option<u32>,
    store_timeout: Option<Duration>,
}

impl AppConfigBuilder {
    /// Set the listen port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the PostgreSQL DSN
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Set the private key file
    pub fn private_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.private_key_file = Some(path.into());
        self
    }

    /// Set the key id
    pub fn key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Set the signing algorithm
    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    /// Set the token lifetime
    pub fn token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = Some(ttl);
        self
    }

    /// Set the bcrypt cost
    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    /// Set the per-call store timeout
    pub fn store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            port: self.port.unwrap_or(defaults.port),
            database_url: self.database_url.or(defaults.database_url),
            private_key_file: self.private_key_file.unwrap_or(defaults.private_key_file),
            key_id: self.key_id.unwrap_or(defaults.key_id),
            algorithm: self.algorithm.unwrap_or(defaults.algorithm),
            token_ttl: self.token_ttl.unwrap_or(defaults.token_ttl),
            bcrypt_cost: self.bcrypt_cost.unwrap_or(defaults.bcrypt_cost),
            store_timeout: self.store_timeout.unwrap_or(defaults.store_timeout),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
///
/// All of these are fatal at startup: the process must not serve requests
/// with bad key material or settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("reading private key file {path}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("private key cannot be empty")]
    MissingPrivateKey,
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("key id cannot be blank")]
    EmptyKeyId,
    #[error("unsupported signing algorithm {0:?}")]
    UnsupportedAlgorithm(String),
    #[error("invalid bcrypt cost {0}, expected 4..=31")]
    InvalidCost(u32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.database_url.is_none());
        assert_eq!(config.key_id, "123456");
        assert_eq!(config.algorithm, "RS256");
        assert_eq!(config.token_ttl, Duration::from_secs(86400));
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn test_reads_environment_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SERVER_PORT", "9000"),
            ("DATABASE_URL", "postgres://localhost/blog"),
            ("AUTH_KEY_ID", "k1"),
            ("TOKEN_TTL_SECS", "60"),
            ("BCRYPT_COST", "4"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/blog"));
        assert_eq!(config.key_id, "k1");
        assert_eq!(config.token_ttl, Duration::from_secs(60));
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn test_blank_database_url_selects_memory_store() {
        let config = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "  ")])).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_rejects_unparsable_port() {
        let err = AppConfig::from_lookup(lookup_from(&[("SERVER_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "SERVER_PORT", .. }));
    }

    #[test]
    fn test_rejects_blank_key_id() {
        let err = AppConfig::builder().key_id(" ").build().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyKeyId));
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let err = AppConfig::builder()
            .token_ttl(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "TOKEN_TTL_SECS", .. }));
    }
}
