//! Application settings loaded from `config.toml`.
//!
//! Every field has a default, so a missing file is not an error. The
//! `DATABASE_URL` environment variable takes precedence over the file.

use super::database::{DEFAULT_DATABASE_URL, get_database_url};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_VAR: &str = "JOBBOARD_CONFIG";

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database connection string
    pub database_url: String,
    /// Language used for category names when none is requested
    pub default_language: String,
    /// Directory holding seed data overriding the built-in definitions
    pub seed_dir: Option<PathBuf>,
    /// Purge routine settings
    pub purge: PurgeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            default_language: "en".to_string(),
            seed_dir: None,
            purge: PurgeConfig::default(),
        }
    }
}

/// Settings for the purge routine
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PurgeConfig {
    /// Tables to purge, most dependent first. Falls back to the built-in order.
    pub tables: Option<Vec<String>>,
}

impl PurgeConfig {
    /// The table order the purge routine should use.
    #[must_use]
    pub fn table_order(&self) -> Vec<String> {
        self.tables
            .clone()
            .unwrap_or_else(crate::core::purge::default_table_order)
    }
}

/// Parses configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config: {e}"),
    })
}

/// Loads configuration from `path`. A file that does not exist yields the defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        tracing::debug!("No config file at {:?}, using defaults", path_ref);
        return Ok(AppConfig::default());
    }

    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads the application configuration from `$JOBBOARD_CONFIG` or `./config.toml`,
/// then applies the `DATABASE_URL` override.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    let mut config = load_config(&path)?;
    config.database_url = get_database_url(&config.database_url);
    tracing::info!("Configuration loaded (database: {})", config.database_url);
    Ok(config)
}
