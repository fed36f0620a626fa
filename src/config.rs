//! Runtime configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `FOOD_CART_DATA_PATH` - JSON file backing local storage (default: `data/local-storage.json`)
//! - `FOOD_CART_CHANNEL_BUFFER` - cart actor mailbox size, > 0 (default: 32)
//! - `FOOD_CART_FLAT_DELIVERY` - fixed delivery charge replacing both placeholder rules

use crate::model::DeliveryRules;
use std::path::PathBuf;
use thiserror::Error;

pub const DATA_PATH_VAR: &str = "FOOD_CART_DATA_PATH";
pub const CHANNEL_BUFFER_VAR: &str = "FOOD_CART_CHANNEL_BUFFER";
pub const FLAT_DELIVERY_VAR: &str = "FOOD_CART_FLAT_DELIVERY";

const DEFAULT_DATA_PATH: &str = "data/local-storage.json";
const DEFAULT_CHANNEL_BUFFER: usize = 32;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub channel_buffer: usize,
    pub delivery: DeliveryRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
            delivery: DeliveryRules::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = non_empty(lookup(DATA_PATH_VAR)) {
            config.data_path = PathBuf::from(path);
        }

        if let Some(raw) = non_empty(lookup(CHANNEL_BUFFER_VAR)) {
            config.channel_buffer = match raw.parse::<usize>() {
                Ok(0) => return Err(invalid(CHANNEL_BUFFER_VAR, "must be greater than 0")),
                Ok(n) => n,
                Err(e) => return Err(invalid(CHANNEL_BUFFER_VAR, &e.to_string())),
            };
        }

        if let Some(raw) = non_empty(lookup(FLAT_DELIVERY_VAR)) {
            let amount = raw
                .parse::<f64>()
                .map_err(|e| invalid(FLAT_DELIVERY_VAR, &e.to_string()))?;
            if !amount.is_finite() || amount < 0.0 {
                return Err(invalid(FLAT_DELIVERY_VAR, "must be a non-negative number"));
            }
            config.delivery = DeliveryRules::flat(amount);
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}
