//! Configuration validator for Memory-Inspector
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, DumpConfig, InspectorConfig, LoggingConfig, SearchConfig};
use crate::memory::AddressSpaceKind;

/// Upper bound on a search pattern; larger values are almost certainly typos
const MAX_PATTERN_LEN_LIMIT: usize = 1 << 20;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_inspector(&config.inspector)?;
        Self::validate_search(&config.search)?;
        Self::validate_dump(&config.dump)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates inspector configuration
    fn validate_inspector(inspector: &InspectorConfig) -> Result<(), ConfigError> {
        if inspector.hex_base && !inspector.default_encoding.supports_hex_base() {
            return Err(ConfigError::Invalid(format!(
                "hex_base cannot be enabled for the {} encoding",
                inspector.default_encoding
            )));
        }

        if !AddressSpaceKind::SELECTABLE.contains(&inspector.address_space) {
            return Err(ConfigError::Invalid(format!(
                "{} is a raw dump space and cannot be browsed",
                inspector.address_space
            )));
        }

        Ok(())
    }

    /// Validates search configuration
    fn validate_search(search: &SearchConfig) -> Result<(), ConfigError> {
        if search.max_pattern_len == 0 {
            return Err(ConfigError::Invalid(
                "Maximum pattern length must be at least 1".to_string(),
            ));
        }

        if search.max_pattern_len > MAX_PATTERN_LEN_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "Maximum pattern length cannot exceed {}",
                MAX_PATTERN_LEN_LIMIT
            )));
        }

        Ok(())
    }

    /// Validates dump configuration
    fn validate_dump(dump: &DumpConfig) -> Result<(), ConfigError> {
        if dump.directory.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Dump directory cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
