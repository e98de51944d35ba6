//! XDG Base Directory paths for tern.
//!
//! The terminal resolves its config, module, and data locations through these
//! helpers so every crate in the workspace agrees on where things live.

use std::path::PathBuf;

/// Get the tern config directory.
///
/// Returns `$XDG_CONFIG_HOME/tern` if set, otherwise `~/.config/tern`.
/// This is where the terminal config and user-installed modules are stored.
///
/// # Examples
///
/// ```
/// use tern_paths::config_dir;
///
/// let config = config_dir();
/// let module_dir = config.join("modules");
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("tern")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config/tern")
    } else {
        PathBuf::from(".config/tern")
    }
}

/// Get the tern data directory.
///
/// Returns `$XDG_DATA_HOME/tern` if set, otherwise `~/.local/share/tern`.
/// Modules get a per-module subdirectory under `<data_dir>/modules` for any
/// persistent state they keep.
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join("tern")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".local/share/tern")
    } else {
        PathBuf::from(".local/share/tern")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_tern() {
        let path = config_dir();
        assert!(path.ends_with("tern"), "config_dir should end with 'tern'");
    }

    #[test]
    fn test_data_dir_ends_with_tern() {
        let path = data_dir();
        assert!(path.ends_with("tern"), "data_dir should end with 'tern'");
    }
}
