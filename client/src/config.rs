//! Configuration management for the Soil Health Monitor
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SOIL_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Sensor gateway configuration
    pub sensor: SensorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorConfig {
    /// Base URL of the soil sensor gateway
    pub base_url: String,

    /// Seconds between automatic refreshes once polling is armed
    pub poll_interval_secs: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("SOIL_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("sensor.base_url", "http://100.78.1.8:3000")?
            .set_default("sensor.poll_interval_secs", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SOIL_ prefix)
            .add_source(
                Environment::with_prefix("SOIL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://100.78.1.8:3000".to_string(),
            poll_interval_secs: 30,
        }
    }
}
