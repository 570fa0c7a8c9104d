//! Translation run configuration and settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main translation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub naming: NamingConfig,
    pub mapping: MappingConfig,
}

/// Settings of the naming service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Placed after the fixed `__` marker of every synthesized name
    pub prefix: String,
    /// Identifiers that must never be handed out
    pub reserved: Vec<String>,
    /// Hints longer than this are truncated
    pub max_hint_length: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            reserved: Vec::new(),
            max_hint_length: 32,
        }
    }
}

/// Settings of the source-to-output mapping tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub enabled: bool,
    /// Line number of the first generated output line
    pub first_output_line: u32,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            first_output_line: 1,
        }
    }
}

impl TranslationConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io { path: path.to_path_buf(), error: e })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse { path: path.to_path_buf(), error: e })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize { error: e })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io { path: parent.to_path_buf(), error: e })?;
        }

        std::fs::write(path, content)
            .map_err(|e| ConfigError::Io { path: path.to_path_buf(), error: e })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.naming.max_hint_length == 0 {
            return Err(ConfigError::Invalid {
                field: "naming.max_hint_length".to_string(),
                message: "Hint length must be at least 1".to_string(),
            });
        }

        if !self.naming.prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            || self.naming.prefix.starts_with(|c: char| c.is_ascii_digit())
        {
            return Err(ConfigError::Invalid {
                field: "naming.prefix".to_string(),
                message: format!("'{}' cannot start an identifier", self.naming.prefix),
            });
        }

        if self.mapping.first_output_line == 0 {
            return Err(ConfigError::Invalid {
                field: "mapping.first_output_line".to_string(),
                message: "Output lines are numbered from 1".to_string(),
            });
        }

        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(&mut self, other: TranslationConfig) {
        let defaults = TranslationConfig::default();
        if other.naming.prefix != defaults.naming.prefix {
            self.naming.prefix = other.naming.prefix;
        }
        if other.naming.max_hint_length != defaults.naming.max_hint_length {
            self.naming.max_hint_length = other.naming.max_hint_length;
        }
        for name in other.naming.reserved {
            if !self.naming.reserved.contains(&name) {
                self.naming.reserved.push(name);
            }
        }
        if !other.mapping.enabled {
            self.mapping.enabled = false;
        }
        if other.mapping.first_output_line != defaults.mapping.first_output_line {
            self.mapping.first_output_line = other.mapping.first_output_line;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error for {path:?}: {error}")]
    Io { path: PathBuf, error: std::io::Error },

    #[error("Parse error for {path:?}: {error}")]
    Parse { path: PathBuf, error: toml::de::Error },

    #[error("Serialization error: {error}")]
    Serialize { error: toml::ser::Error },

    #[error("Invalid configuration for {field}: {message}")]
    Invalid { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = TranslationConfig::default();
        assert!(config.naming.prefix.is_empty());
        assert_eq!(config.naming.max_hint_length, 32);
        assert!(config.mapping.enabled);
        assert_eq!(config.mapping.first_output_line, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = TranslationConfig::default();
        config.naming.prefix = "9bad".to_string();
        assert!(config.validate().is_err());

        config.naming.prefix = "cc_".to_string();
        assert!(config.validate().is_ok());

        config.mapping.first_output_line = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("cecilifier.toml");

        let mut config = TranslationConfig::default();
        config.naming.prefix = "gen_".to_string();
        config.naming.reserved.push("il".to_string());
        config.mapping.first_output_line = 5;

        config.to_file(&config_path).unwrap();
        let loaded = TranslationConfig::from_file(&config_path).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("cecilifier.toml");
        std::fs::write(&config_path, "[mapping]\nenabled = false\n").unwrap();

        let loaded = TranslationConfig::from_file(&config_path).unwrap();
        assert!(!loaded.mapping.enabled);
        assert_eq!(loaded.mapping.first_output_line, 1);
        assert_eq!(loaded.naming.max_hint_length, 32);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = TranslationConfig::from_file(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_config_merge() {
        let mut base = TranslationConfig::default();
        base.naming.reserved.push("assembly".to_string());

        let mut other = TranslationConfig::default();
        other.naming.prefix = "x_".to_string();
        other.naming.reserved.push("assembly".to_string());
        other.naming.reserved.push("module".to_string());
        other.mapping.enabled = false;

        base.merge(other);

        assert_eq!(base.naming.prefix, "x_");
        assert_eq!(base.naming.reserved, vec!["assembly".to_string(), "module".to_string()]);
        assert!(!base.mapping.enabled);
    }
}
