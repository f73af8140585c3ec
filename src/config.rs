//! Configuration management for the customer core.
//!
//! Settings come from environment variables, optionally seeded from a `.env`
//! file. Every variable has a default, so an empty environment is valid.

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Configuration for the customer services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Default page size for customer listings (default: 20)
    pub page_size: usize,

    /// Maximum rows accepted by a single bulk import (default: 600)
    pub import_max_rows: usize,

    /// Log level used when `RUST_LOG` is unset (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `CUSTOMER_PAGE_SIZE`: Default listing page size (default: 20)
    /// - `IMPORT_MAX_ROWS`: Row limit per bulk import (default: 600)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        // A missing .env file is not an error
        let _ = dotenvy::dotenv();

        let defaults = Config::default();
        let page_size = Self::parse_env_positive("CUSTOMER_PAGE_SIZE", defaults.page_size)?;
        let import_max_rows = Self::parse_env_positive("IMPORT_MAX_ROWS", defaults.import_max_rows)?;

        let log_level = match env::var("LOG_LEVEL") {
            Ok(level) if level.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    var: "LOG_LEVEL".to_string(),
                    reason: "Cannot be empty".to_string(),
                })
            }
            Ok(level) => level.trim().to_lowercase(),
            Err(_) => defaults.log_level,
        };

        Ok(Config {
            page_size,
            import_max_rows,
            log_level,
        })
    }

    /// Parse an environment variable as a non-zero usize with a default value.
    fn parse_env_positive(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => match val.trim().parse::<usize>() {
                Ok(0) => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: "Must be greater than zero".to_string(),
                }),
                Ok(parsed) => Ok(parsed),
                Err(_) => Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Must be a positive number, got: {}", val),
                }),
            },
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            page_size: 20,
            import_max_rows: 600,
            log_level: "info".to_string(),
        }
    }
}
