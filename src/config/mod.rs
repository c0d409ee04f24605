//! Configuration management for mediafetch
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use mediafetch::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Extractor binary: {}", config.backend.binary);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `MEDIAFETCH__<section>__<key>`
//!
//! Examples:
//! - `MEDIAFETCH__BACKEND__BINARY=/opt/homebrew/bin/yt-dlp`
//! - `MEDIAFETCH__BACKEND__AUDIO_QUALITY=320`
//! - `MEDIAFETCH__DEFAULTS__OUTPUT_DIR=/srv/media`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/mediafetch.toml`.
//! This can be overridden using the `MEDIAFETCH_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{BackendConfig, Config, DefaultsConfig};
pub use sources::config_path;
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`MEDIAFETCH__*`)
    /// 2. TOML file (default: `config/mediafetch.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - Validation fails (empty binary, bad template, etc.)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
