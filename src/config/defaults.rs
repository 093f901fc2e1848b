//! Default configuration values for Memory-Inspector

use crate::core::types::ValueEncoding;
use crate::memory::AddressSpaceKind;
use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub inspector: InspectorDefaults,
    pub search: SearchDefaults,
    pub dump: DumpDefaults,
    pub logging: LoggingDefaults,
}

/// Default inspector panel state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectorDefaults {
    pub default_encoding: ValueEncoding,
    pub hex_base: bool,
    pub address_space: AddressSpaceKind,
}

/// Default search limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDefaults {
    pub max_pattern_len: usize,
}

/// Default dump output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpDefaults {
    pub directory: String,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        inspector: InspectorDefaults {
            default_encoding: ValueEncoding::U8,
            hex_base: false,
            address_space: AddressSpaceKind::Effective,
        },
        search: SearchDefaults {
            max_pattern_len: 4096,
        },
        dump: DumpDefaults {
            directory: "dump".to_string(),
        },
        logging: LoggingDefaults {
            level: "info".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspector_defaults() {
        let config = default_config();
        assert_eq!(config.inspector.default_encoding, ValueEncoding::U8);
        assert!(!config.inspector.hex_base);
        assert_eq!(config.inspector.address_space, AddressSpaceKind::Effective);
    }

    #[test]
    fn test_search_and_dump_defaults() {
        let config = default_config();
        assert_eq!(config.search.max_pattern_len, 4096);
        assert_eq!(config.dump.directory, "dump");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_serialization() {
        let config = default_config();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("default_encoding = \"u8\""));
        assert!(serialized.contains("address_space = \"effective\""));

        let deserialized: ConfigDefaults = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.dump.directory, config.dump.directory);
        assert_eq!(
            deserialized.inspector.default_encoding,
            config.inspector.default_encoding
        );
    }
}
