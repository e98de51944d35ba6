//! Module metadata and priority types

use serde::{Deserialize, Serialize};

/// Immutable metadata describing a module, used for introspection and listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Module name (unique within a manager)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Module version (semver)
    pub version: String,
}

impl ModuleInfo {
    /// Build a `ModuleInfo`, substituting `"0.0.0"` for an empty version.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let mut info = Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
        };
        if info.version.is_empty() {
            info.version = "0.0.0".to_string();
        }
        info
    }
}

impl Default for ModuleInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            version: "0.0.0".to_string(),
        }
    }
}

/// Named priority bands for dispatch ordering. Lower values run earlier.
///
/// The manager stores a raw `i32` per module, so anything between the bands
/// is fair game for fine-grained ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i32)]
pub enum Priority {
    /// Runs before everything else
    Highest = -100,
    /// Runs before the normal band
    High = -50,
    /// Default band
    Normal = 0,
    /// Runs after the normal band
    Low = 50,
    /// Runs last
    Lowest = 100,
}

impl From<Priority> for i32 {
    fn from(priority: Priority) -> Self {
        priority as i32
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Normal
    }
}

/// Event categories a module may opt into.
///
/// A module declares the capabilities it implements via
/// [`Module::capabilities`](crate::Module::capabilities); the manager only
/// invokes the matching handler on modules that declare the capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Receive terminal bell notifications
    Bell,
    /// Intercept key events before the terminal sees them
    KeyInput,
    /// Replace or decorate glyphs as they are drawn
    GlyphTransform,
    /// Handle OSC/DCS/APC escape strings
    EscapeString,
    /// Paint below the terminal cell grid
    BackgroundRender,
    /// Provide dynamic color schemes
    ColorProvider,
    /// Provide fallback fonts
    FontProvider,
    /// Filter terminal output
    OutputFilter,
    /// Handle URL activation
    UrlHandler,
    /// Bridge an external pipe/automation endpoint
    ExternalPipe,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_info_empty_version_defaults() {
        let info = ModuleInfo::new("bell", "rings a bell", "");
        assert_eq!(info.version, "0.0.0");
        assert_eq!(info.name, "bell");
    }

    #[test]
    fn test_module_info_explicit_version_kept() {
        let info = ModuleInfo::new("bell", "", "1.2.3");
        assert_eq!(info.version, "1.2.3");
        assert_eq!(info.description, "");
    }

    #[test]
    fn test_module_info_default() {
        let info = ModuleInfo::default();
        assert!(info.name.is_empty());
        assert_eq!(info.version, "0.0.0");
    }

    #[test]
    fn test_priority_ordering() {
        assert!(i32::from(Priority::Highest) < i32::from(Priority::High));
        assert!(i32::from(Priority::High) < i32::from(Priority::Normal));
        assert!(i32::from(Priority::Normal) < i32::from(Priority::Low));
        assert!(i32::from(Priority::Low) < i32::from(Priority::Lowest));
    }

    #[test]
    fn test_priority_normal_is_zero() {
        assert_eq!(i32::from(Priority::default()), 0);
    }

    #[test]
    fn test_capability_equality() {
        assert_eq!(Capability::Bell, Capability::Bell);
        assert_ne!(Capability::Bell, Capability::KeyInput);
    }
}
