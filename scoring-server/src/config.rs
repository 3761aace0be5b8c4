//! Configuration module

use std::env;

use scoring_core::{ConfigError, ScoringConfig};

const DEFAULT_PORT: u16 = 8080;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Pipeline settings (model, normalization, threshold, audit path)
    pub scoring: ScoringConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: port_from(env::var("PORT").ok())?,

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            scoring: ScoringConfig::from_env()?,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Unset or blank means the default; anything else must be a valid port
fn port_from(value: Option<String>) -> Result<u16, ConfigError> {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(DEFAULT_PORT),
        Some(v) => v.parse().map_err(|_| ConfigError::InvalidNumber {
            name: "PORT".to_string(),
            value: v.to_string(),
        }),
    }
}

/// `LOG_FORMAT=json` switches the log output to JSON lines
pub fn json_logs_enabled() -> bool {
    env::var("LOG_FORMAT")
        .map(|s| s.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
