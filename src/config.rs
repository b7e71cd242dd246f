//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default number of physical index shards
pub const DEFAULT_INDEX_SHARDS: u32 = 32;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Inverted index configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Physical shard count; fixed for the life of the index
    #[serde(default = "default_shards")]
    pub shards: u32,

    /// Idle scratch buffers kept for routing-hash computation
    #[serde(default = "default_scratch_pool_size")]
    pub scratch_pool_size: usize,
}

fn default_shards() -> u32 {
    DEFAULT_INDEX_SHARDS
}

fn default_scratch_pool_size() -> usize {
    64
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            shards: default_shards(),
            scratch_pool_size: default_scratch_pool_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("label-index").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing path that parses, else environment-only config
    ///
    /// Files that exist but fail to load are reported with `warn!` and skipped.
    pub fn load_first(config_paths: &[PathBuf]) -> Self {
        for path_opt in config_paths {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        match Self::from_env() {
            Ok(config) => {
                tracing::info!("Using default config with environment overrides");
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring environment overrides: {}", e);
                Self::default()
            }
        }
    }

    /// Reject settings the index cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index.shards == 0 {
            return Err(ConfigError::Invalid(
                "index.shards must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(shards) = std::env::var("LABEL_INDEX_SHARDS") {
            match shards.parse() {
                Ok(n) => self.index.shards = n,
                Err(_) => tracing::warn!("Ignoring invalid LABEL_INDEX_SHARDS={:?}", shards),
            }
        }

        if let Ok(level) = std::env::var("LABEL_INDEX_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LABEL_INDEX_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Label Index Configuration
#
# Environment variables override these settings:
# - LABEL_INDEX_SHARDS
# - LABEL_INDEX_LOG_LEVEL
# - LABEL_INDEX_LOG_FORMAT

[index]
# Number of physical shards; query shard totals must divide it
shards = 32

# Idle scratch buffers kept for label-set hashing
scratch_pool_size = 64

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
