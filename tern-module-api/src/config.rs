//! Per-module configuration - a TOML-backed key-value store
//!
//! The host hands each module its own `[modules.<name>]` section as an opaque
//! `ModuleConfig`; modules only ever see their own keys.

use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::path::Path;

use crate::error::ModuleError;

/// A module's configuration section.
pub struct ModuleConfig {
    values: HashMap<String, toml::Value>,
    dirty: bool,
}

impl ModuleConfig {
    /// Create a new empty config
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            dirty: false,
        }
    }

    /// Build a config from an already parsed TOML table (the host's
    /// `[modules.<name>]` section).
    pub fn from_table(table: toml::value::Table) -> Self {
        Self {
            values: table.into_iter().collect(),
            dirty: false,
        }
    }

    /// Load configuration from a standalone TOML file.
    ///
    /// Returns an empty config if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ModuleError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        let values: HashMap<String, toml::Value> =
            toml::from_str(&content).map_err(|e| ModuleError::Config(e.to_string()))?;
        Ok(Self {
            values,
            dirty: false,
        })
    }

    /// Save configuration to a TOML file
    pub fn save(&mut self, path: &Path) -> Result<(), ModuleError> {
        let content = toml::to_string_pretty(&self.values)
            .map_err(|e| ModuleError::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.exists()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        self.dirty = false;
        Ok(())
    }

    /// Get a configuration value
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values.get(key).and_then(|v| v.clone().try_into().ok())
    }

    /// Set a configuration value
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), ModuleError> {
        let toml_value =
            toml::Value::try_from(value).map_err(|e| ModuleError::Serialization(e.to_string()))?;
        self.values.insert(key.to_string(), toml_value);
        self.dirty = true;
        Ok(())
    }

    /// Whether the section has any keys at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if the config has been modified since loading/saving
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_get_set() {
        let mut config = ModuleConfig::new();

        config.set("string_key", "hello").unwrap();
        config.set("int_key", 42i64).unwrap();
        config.set("bool_key", true).unwrap();

        assert_eq!(
            config.get::<String>("string_key"),
            Some("hello".to_string())
        );
        assert_eq!(config.get::<i64>("int_key"), Some(42));
        assert_eq!(config.get::<bool>("bool_key"), Some(true));
        assert_eq!(config.get::<String>("missing"), None);
    }

    #[test]
    fn test_config_from_table() {
        let table: toml::value::Table = toml::from_str("enabled = false\nframes = 6").unwrap();
        let config = ModuleConfig::from_table(table);

        assert_eq!(config.get::<bool>("enabled"), Some(false));
        assert_eq!(config.get::<i64>("frames"), Some(6));
        assert!(!config.is_dirty());
    }

    #[test]
    fn test_config_dirty_tracking() {
        let mut config = ModuleConfig::new();
        assert!(!config.is_dirty());

        config.set("key", "value").unwrap();
        assert!(config.is_dirty());
    }

    #[test]
    fn test_config_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");

        let mut config = ModuleConfig::new();
        config.set("name", "visual-bell").unwrap();
        config.set("flash_frames", 8i64).unwrap();
        config.save(&config_path).unwrap();
        assert!(!config.is_dirty());

        let loaded = ModuleConfig::load(&config_path).unwrap();
        assert_eq!(
            loaded.get::<String>("name"),
            Some("visual-bell".to_string())
        );
        assert_eq!(loaded.get::<i64>("flash_frames"), Some(8));
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = ModuleConfig::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert!(config.is_empty());
    }
}
