//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! Configuration is loaded once in `main` and carried in `AppState`; nothing reads
//! the environment after startup.

use std::env;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_JWT_EXPIRY_MINUTES,
    DEFAULT_MAX_CANCELLATIONS_PER_MONTH, DEFAULT_MAX_DAILY_RESERVATIONS_PER_USER,
    DEFAULT_MAX_RESERVATION_DAYS_ADVANCE, DEFAULT_PENALTY_DAYS, DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS,
    DEFAULT_RESERVATION_BLOCK_HOURS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_WORKING_HOURS_END, DEFAULT_WORKING_HOURS_START,
};
use crate::policy::ReservationPolicy;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub reservations: ReservationConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue("LOG_FORMAT".to_string())),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_minutes: i64,
    pub refresh_token_expiry_days: i64,
}

/// Reservation rules configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationConfig {
    /// Length of every reservation, in whole hours
    pub block_hours: u32,
    pub max_days_advance: u32,
    pub max_daily_per_user: u32,
    pub max_cancellations_per_month: u32,
    pub penalty_days: u32,
    pub working_hours_start: u32,
    pub working_hours_end: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            reservations: ReservationConfig::from_env()?,
        })
    }
}

/// Read an optional variable, falling back to `default` and failing on unparsable input
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: parse_var("LOG_FORMAT", LogFormat::Pretty)?,
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS)?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
            expiry_minutes: parse_var("JWT_EXPIRY_MINUTES", DEFAULT_JWT_EXPIRY_MINUTES)?,
            refresh_token_expiry_days: parse_var(
                "REFRESH_TOKEN_EXPIRY_DAYS",
                DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS,
            )?,
        })
    }
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            block_hours: DEFAULT_RESERVATION_BLOCK_HOURS,
            max_days_advance: DEFAULT_MAX_RESERVATION_DAYS_ADVANCE,
            max_daily_per_user: DEFAULT_MAX_DAILY_RESERVATIONS_PER_USER,
            max_cancellations_per_month: DEFAULT_MAX_CANCELLATIONS_PER_MONTH,
            penalty_days: DEFAULT_PENALTY_DAYS,
            working_hours_start: DEFAULT_WORKING_HOURS_START,
            working_hours_end: DEFAULT_WORKING_HOURS_END,
        }
    }
}

impl ReservationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            block_hours: parse_var("RESERVATION_BLOCK_HOURS", defaults.block_hours)?,
            max_days_advance: parse_var("MAX_RESERVATION_DAYS_ADVANCE", defaults.max_days_advance)?,
            max_daily_per_user: parse_var(
                "MAX_DAILY_RESERVATIONS_PER_USER",
                defaults.max_daily_per_user,
            )?,
            max_cancellations_per_month: parse_var(
                "MAX_CANCELLATIONS_PER_MONTH",
                defaults.max_cancellations_per_month,
            )?,
            penalty_days: parse_var("PENALTY_DAYS", defaults.penalty_days)?,
            working_hours_start: parse_var("WORKING_HOURS_START", defaults.working_hours_start)?,
            working_hours_end: parse_var("WORKING_HOURS_END", defaults.working_hours_end)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the evaluator cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_hours == 0 {
            return Err(ConfigError::InvalidValue("RESERVATION_BLOCK_HOURS".to_string()));
        }
        if self.max_daily_per_user == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_DAILY_RESERVATIONS_PER_USER".to_string(),
            ));
        }
        if self.max_cancellations_per_month == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_CANCELLATIONS_PER_MONTH".to_string(),
            ));
        }
        if self.penalty_days == 0 {
            return Err(ConfigError::InvalidValue("PENALTY_DAYS".to_string()));
        }
        if self.working_hours_end > 23 {
            return Err(ConfigError::InvalidValue("WORKING_HOURS_END".to_string()));
        }
        if self.working_hours_start >= self.working_hours_end {
            return Err(ConfigError::InvalidValue("WORKING_HOURS_START".to_string()));
        }
        if self.block_hours > self.working_hours_end - self.working_hours_start {
            return Err(ConfigError::InvalidValue("RESERVATION_BLOCK_HOURS".to_string()));
        }
        Ok(())
    }

    /// Build the explicit policy value handed to the evaluator
    pub fn policy(&self) -> ReservationPolicy {
        ReservationPolicy {
            block_minutes: self.block_hours * 60,
            working_hours: (self.working_hours_start, self.working_hours_end),
            max_advance_days: self.max_days_advance,
            max_daily_reservations: self.max_daily_per_user,
            max_cancellations_per_month: self.max_cancellations_per_month,
            penalty_days: self.penalty_days,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_defaults_and_rejects_garbage() {
        assert_eq!(parse_var("ROOMBOOK_TEST_UNSET_PORT", DEFAULT_SERVER_PORT).unwrap(), 8000);

        // SAFETY: the variable names are unique to this test
        unsafe {
            std::env::set_var("ROOMBOOK_TEST_PENALTY_DAYS", " 14 ");
            std::env::set_var("ROOMBOOK_TEST_BAD_PORT", "eighty");
        }
        assert_eq!(parse_var("ROOMBOOK_TEST_PENALTY_DAYS", DEFAULT_PENALTY_DAYS).unwrap(), 14);
        assert!(matches!(
            parse_var("ROOMBOOK_TEST_BAD_PORT", DEFAULT_SERVER_PORT),
            Err(ConfigError::InvalidValue(name)) if name == "ROOMBOOK_TEST_BAD_PORT"
        ));
    }

    #[test]
    fn test_default_reservation_policy() {
        let policy = ReservationConfig::default().policy();
        assert_eq!(policy.block_minutes, 60);
        assert_eq!(policy.working_hours, (8, 18));
        assert_eq!(policy.max_advance_days, 30);
        assert_eq!(policy.max_daily_reservations, 3);
        assert_eq!(policy.max_cancellations_per_month, 3);
        assert_eq!(policy.penalty_days, 7);
    }

    #[test]
    fn test_reservation_config_validation() {
        assert!(ReservationConfig::default().validate().is_ok());

        let zero_block = ReservationConfig { block_hours: 0, ..Default::default() };
        assert!(zero_block.validate().is_err());

        let inverted = ReservationConfig {
            working_hours_start: 18,
            working_hours_end: 8,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        let block_too_long = ReservationConfig {
            block_hours: 11,
            ..Default::default()
        };
        assert!(block_too_long.validate().is_err());

        let no_quota = ReservationConfig { max_daily_per_user: 0, ..Default::default() };
        assert!(no_quota.validate().is_err());

        let no_cancellations = ReservationConfig {
            max_cancellations_per_month: 0,
            ..Default::default()
        };
        assert!(matches!(
            no_cancellations.validate(),
            Err(ConfigError::InvalidValue(name)) if name == "MAX_CANCELLATIONS_PER_MONTH"
        ));

        let no_penalty = ReservationConfig { penalty_days: 0, ..Default::default() };
        assert!(no_penalty.validate().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
