//! Configuration loader for Memory-Inspector
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use crate::core::types::ValueEncoding;
use crate::memory::AddressSpaceKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_inspector")]
    pub inspector: InspectorConfig,

    #[serde(default = "default_search")]
    pub search: SearchConfig,

    #[serde(default = "default_dump")]
    pub dump: DumpConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Initial inspector panel state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectorConfig {
    #[serde(default = "default_encoding")]
    pub default_encoding: ValueEncoding,
    #[serde(default = "default_hex_base")]
    pub hex_base: bool,
    #[serde(default = "default_address_space")]
    pub address_space: AddressSpaceKind,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_max_pattern_len")]
    pub max_pattern_len: usize,
}

/// Dump configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpConfig {
    #[serde(default = "default_dump_directory")]
    pub directory: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration or returns defaults if file doesn't exist
    pub fn load_or_default(&self) -> Config {
        self.load().unwrap_or_else(|_| Config::default())
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Default location of the configuration file
pub const DEFAULT_CONFIG_FILE: &str = "memory-inspector.toml";

/// Loads configuration from the default location, falling back to defaults
pub fn load_config() -> Config {
    ConfigLoader::new(DEFAULT_CONFIG_FILE).load_or_default()
}

// Default functions for serde
fn default_inspector() -> InspectorConfig {
    let defaults = default_config();
    InspectorConfig {
        default_encoding: defaults.inspector.default_encoding,
        hex_base: defaults.inspector.hex_base,
        address_space: defaults.inspector.address_space,
    }
}

fn default_search() -> SearchConfig {
    SearchConfig {
        max_pattern_len: default_config().search.max_pattern_len,
    }
}

fn default_dump() -> DumpConfig {
    DumpConfig {
        directory: default_config().dump.directory,
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_config().logging.level,
    }
}

// Individual field defaults
fn default_encoding() -> ValueEncoding {
    default_config().inspector.default_encoding
}

fn default_hex_base() -> bool {
    default_config().inspector.hex_base
}

fn default_address_space() -> AddressSpaceKind {
    default_config().inspector.address_space
}

fn default_max_pattern_len() -> usize {
    default_config().search.max_pattern_len
}

fn default_dump_directory() -> String {
    default_config().dump.directory
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for Config {
    fn default() -> Self {
        Config {
            inspector: default_inspector(),
            search: default_search(),
            dump: default_dump(),
            logging: default_logging(),
        }
    }
}
