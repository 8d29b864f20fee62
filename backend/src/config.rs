//! Configuration management for the farm risk server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FARM_RISK_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Narrative text generator configuration
    pub narrative: NarrativeConfig,

    /// Synthetic seeding configuration
    pub seeding: SeedingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NarrativeConfig {
    /// Base URL of the generateContent API
    pub api_endpoint: String,

    /// API key; explanations fall back to offline text when unset
    pub api_key: Option<String>,

    /// Preferred model
    pub model: String,

    /// Model retried once when the preferred model fails
    pub fallback_model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedingConfig {
    /// Grid edge used when a farm has none recorded
    pub default_grid_size: u8,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("FARM_RISK_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default(
                "narrative.api_endpoint",
                "https://generativelanguage.googleapis.com/v1beta",
            )?
            .set_default("narrative.model", "gemini-2.5-flash")?
            .set_default("narrative.fallback_model", "gemini-1.5-flash")?
            .set_default("narrative.timeout_secs", 20)?
            .set_default("seeding.default_grid_size", 8)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FARM_RISK_ prefix)
            .add_source(
                Environment::with_prefix("FARM_RISK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        shared::validate_grid_size(self.seeding.default_grid_size).map_err(|msg| {
            ConfigError::Message(format!(
                "seeding.default_grid_size = {}: {}",
                self.seeding.default_grid_size, msg
            ))
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            fallback_model: "gemini-1.5-flash".to_string(),
            timeout_secs: 20,
        }
    }
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            default_grid_size: shared::DEFAULT_GRID_SIZE,
        }
    }
}
