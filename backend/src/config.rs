//! Configuration management for the rain risk service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with RAINRISK_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Model training configuration
    pub model: ModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// CSV file with historical observations
    pub dataset_path: String,

    /// Number of trees in the forest
    pub n_trees: usize,

    /// Seed for bootstrap sampling, feature sampling and the holdout split
    pub seed: u64,

    /// Fraction of rows held out for evaluation; 0 trains on everything
    pub test_fraction: f64,

    /// Minimum samples a node needs before it may be split
    pub min_samples_split: usize,

    /// Maximum tree depth; unlimited when absent
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("RAINRISK_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("model.dataset_path", "data/weatherAUS.csv")?
            .set_default("model.n_trees", 100)?
            .set_default("model.seed", 42)?
            .set_default("model.test_fraction", 0.0)?
            .set_default("model.min_samples_split", 2)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (RAINRISK_ prefix)
            .add_source(
                Environment::with_prefix("RAINRISK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.model.validate()?;
        Ok(config)
    }
}

impl ModelConfig {
    /// Reject settings the trainer cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_trees == 0 {
            return Err(ConfigError::Message(
                "model.n_trees must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(ConfigError::Message(
                "model.test_fraction must be in [0, 1)".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(ConfigError::Message(
                "model.min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(ConfigError::Message(
                "model.max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
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

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dataset_path: "data/weatherAUS.csv".to_string(),
            n_trees: 100,
            seed: 42,
            test_fraction: 0.0,
            min_samples_split: 2,
            max_depth: None,
        }
    }
}
