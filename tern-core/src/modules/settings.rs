//! Host-side view of module configuration
//!
//! The terminal's config file carries one optional table per module:
//!
//! ```toml
//! [modules.visual-bell]
//! enabled = false
//! flash_frames = 8
//! ```
//!
//! `ModuleSettings` answers the two questions the manager asks (is there a
//! section, is the module enabled) and hands the section itself to the module
//! as an opaque [`ModuleConfig`].

use std::path::Path;

use tern_module_api::ModuleConfig;

use super::error::LoadError;

/// Parsed `[modules.*]` configuration sections.
#[derive(Debug, Default)]
pub struct ModuleSettings {
    sections: toml::value::Table,
}

impl ModuleSettings {
    /// Parse settings from the full host config document. Only the `modules`
    /// table is retained; a document without one yields empty settings.
    pub fn from_str(content: &str) -> Result<Self, LoadError> {
        let doc: toml::Value =
            toml::from_str(content).map_err(|e| LoadError::Settings(e.to_string()))?;
        let sections = doc
            .get("modules")
            .and_then(toml::Value::as_table)
            .cloned()
            .unwrap_or_default();
        Ok(Self { sections })
    }

    /// Load settings from the host config file.
    ///
    /// A missing file yields empty settings, not an error; module
    /// configuration is optional.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Whether a `[modules.<name>]` section exists.
    pub fn has_section(&self, name: &str) -> bool {
        self.sections
            .get(name)
            .is_some_and(toml::Value::is_table)
    }

    /// Whether the module is enabled. An absent section or an absent
    /// `enabled` key both mean enabled.
    pub fn enabled(&self, name: &str) -> bool {
        self.sections
            .get(name)
            .and_then(|section| section.get("enabled"))
            .and_then(toml::Value::as_bool)
            .unwrap_or(true)
    }

    /// The module's own section as an opaque config. Absent sections come
    /// back empty so `configure` is always callable.
    pub fn section(&self, name: &str) -> ModuleConfig {
        self.sections
            .get(name)
            .and_then(toml::Value::as_table)
            .cloned()
            .map(ModuleConfig::from_table)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
font = "monospace 11"

[modules.visual-bell]
enabled = false
flash_frames = 8

[modules.clipboard-sync]
primary = true
"#;

    #[test]
    fn test_parse_sections() {
        let settings = ModuleSettings::from_str(SAMPLE).unwrap();
        assert!(settings.has_section("visual-bell"));
        assert!(settings.has_section("clipboard-sync"));
        assert!(!settings.has_section("ligatures"));
    }

    #[test]
    fn test_enabled_key() {
        let settings = ModuleSettings::from_str(SAMPLE).unwrap();
        assert!(!settings.enabled("visual-bell"));
        // Section present, no enabled key.
        assert!(settings.enabled("clipboard-sync"));
        // No section at all.
        assert!(settings.enabled("ligatures"));
    }

    #[test]
    fn test_section_contents() {
        let settings = ModuleSettings::from_str(SAMPLE).unwrap();
        let section = settings.section("visual-bell");
        assert_eq!(section.get::<i64>("flash_frames"), Some(8));
        assert_eq!(section.get::<bool>("enabled"), Some(false));

        let missing = settings.section("ligatures");
        assert!(missing.is_empty());
    }

    #[test]
    fn test_document_without_modules_table() {
        let settings = ModuleSettings::from_str("font = \"monospace 11\"").unwrap();
        assert!(!settings.has_section("anything"));
        assert!(settings.enabled("anything"));
    }

    #[test]
    fn test_load_missing_file() {
        let settings = ModuleSettings::load(Path::new("/nonexistent/tern.toml")).unwrap();
        assert!(settings.enabled("anything"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tern.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let settings = ModuleSettings::load(&path).unwrap();
        assert!(!settings.enabled("visual-bell"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let result = ModuleSettings::from_str("[modules.broken");
        assert!(matches!(result, Err(LoadError::Settings(_))));
    }
}
