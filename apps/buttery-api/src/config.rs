//! API server configuration.
//!
//! Layers, lowest priority first:
//! 1. built-in defaults ([`ApiConfig::default`])
//! 2. optional `buttery.toml` in the working directory
//! 3. `BUTTERY_*` environment variables (`BUTTERY_PORT`, `BUTTERY_JWT_SECRET`, ...)

use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Signing secret used when none is configured. Rejected in production.
pub const DEV_JWT_SECRET: &str = "buttery-dev-secret-change-in-production";

/// Minimum signing secret length in production.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    #[default]
    Development,
    Production,
}

impl AppEnvironment {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite connection string
    pub database_url: String,

    /// Pool size
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,

    /// HS256 secret for session tokens
    pub jwt_secret: String,

    /// Session token and cookie lifetime in seconds
    pub session_lifetime_secs: i64,

    pub environment: AppEnvironment,

    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: "sqlite://buttery.db".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            session_lifetime_secs: 7 * 24 * 60 * 60,
            environment: AppEnvironment::Development,
            log_level: "info,sqlx=warn,tower_http=info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from defaults, `buttery.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(Environment::with_prefix("BUTTERY").try_parsing(true))
    }

    fn load_with(env: Environment) -> Result<Self, ConfigError> {
        let config: ApiConfig = Config::builder()
            .add_source(Config::try_from(&ApiConfig::default())?)
            .add_source(File::with_name("buttery").required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values the server cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("session_lifetime_secs".to_string()));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }

        if self.is_production()
            && (self.jwt_secret == DEV_JWT_SECRET || self.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN)
        {
            return Err(ConfigError::InsecureSecret);
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == AppEnvironment::Production
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("BUTTERY_JWT_SECRET must be set to at least {MIN_PRODUCTION_SECRET_LEN} bytes in production")]
    InsecureSecret,
}
