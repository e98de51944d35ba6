//! ModuleLoader - loads modules from native shared objects
//!
//! A loadable module is a shared object built against `tern-module-api` that
//! used [`export_module!`](tern_module_api::export_module) to emit the fixed
//! entry symbols. The loader probes the API version, instantiates exactly one
//! module per file, and registers it through the same path as statically
//! linked modules, so both kinds share identical lifecycle semantics.

use libloading::{Library, Symbol};
use std::path::{Path, PathBuf};

use tern_module_api::{API_VERSION, Module};

use super::error::LoadError;
use super::manager::ModuleManager;

const CREATE_SYMBOL: &[u8] = b"_tern_module_create";
const API_VERSION_SYMBOL: &[u8] = b"_tern_module_api_version";

/// Loads shared-object modules into a [`ModuleManager`].
#[derive(Debug, Default)]
pub struct ModuleLoader;

impl ModuleLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self
    }

    /// The directories the host scans for modules, in precedence order:
    /// every entry of `TERN_MODULE_PATH`, then the user module directory,
    /// then the system one. None of them have to exist.
    pub fn search_path() -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Ok(raw) = std::env::var("TERN_MODULE_PATH") {
            dirs.extend(std::env::split_paths(&raw));
        }
        dirs.push(tern_paths::config_dir().join("modules"));
        #[cfg(unix)]
        dirs.push(PathBuf::from("/usr/lib/tern/modules"));
        dirs
    }

    /// Load every shared-object module found directly in `dir`.
    ///
    /// A missing directory is a no-op; module directories are optional. Any
    /// per-file failure (open failure, missing symbol, version mismatch,
    /// duplicate name) is logged and that file is skipped; the scan
    /// continues. Returns how many modules were registered.
    pub fn load_from_directory(&self, manager: &mut ModuleManager, dir: &Path) -> usize {
        if !dir.exists() {
            tracing::debug!(dir = %dir.display(), "module directory does not exist");
            return 0;
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot read module directory");
                return 0;
            }
        };

        let mut loaded = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || !is_shared_object(&path) {
                continue;
            }
            match self.load_file(manager, &path) {
                Ok(name) => {
                    tracing::info!(module = %name, path = %path.display(), "module loaded");
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping module library");
                }
            }
        }
        loaded
    }

    /// Load modules from every directory in `dirs`. Returns the total count.
    pub fn load_from_directories(&self, manager: &mut ModuleManager, dirs: &[PathBuf]) -> usize {
        dirs.iter()
            .map(|dir| self.load_from_directory(manager, dir))
            .sum()
    }

    /// Load and register one shared object. Returns the module name.
    fn load_file(&self, manager: &mut ModuleManager, path: &Path) -> Result<String, LoadError> {
        // SAFETY: loading a module the user placed in a module directory.
        // The module is expected to follow the export_module! contract.
        let library = unsafe { Library::new(path)? };

        // SAFETY: calling a C function exported by the module.
        let api_version_fn: Symbol<extern "C" fn() -> u32> =
            unsafe { library.get(API_VERSION_SYMBOL)? };
        let found = api_version_fn();
        if found != API_VERSION {
            return Err(LoadError::ApiVersionMismatch {
                expected: API_VERSION,
                found,
            });
        }

        // SAFETY: the create function hands us a raw pointer we convert back
        // into the Box<dyn Module> the module built.
        let create_fn: Symbol<extern "C" fn() -> *mut dyn Module> =
            unsafe { library.get(CREATE_SYMBOL)? };
        let instance = unsafe { Box::from_raw(create_fn()) };

        let name = {
            let raw = instance.info().name;
            if raw.is_empty() {
                "unknown".to_string()
            } else {
                raw
            }
        };
        if !manager.register_loaded(instance, library) {
            return Err(LoadError::DuplicateName(name));
        }
        Ok(name)
    }
}

/// Whether the file name matches the platform's shared-object convention.
fn is_shared_object(path: &Path) -> bool {
    let extensions: &[&str] = if cfg!(target_os = "macos") {
        &["dylib", "so"]
    } else if cfg!(target_os = "windows") {
        &["dll"]
    } else {
        &["so"]
    };

    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_is_noop() {
        let loader = ModuleLoader::new();
        let mut manager = ModuleManager::with_data_root(PathBuf::from("/tmp/tern-test"));

        let loaded = loader.load_from_directory(&mut manager, Path::new("/nonexistent/modules"));
        assert_eq!(loaded, 0);
        assert_eq!(manager.module_count(), 0);
    }

    #[test]
    fn test_non_module_files_are_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("README.md"), "not a module").unwrap();
        std::fs::create_dir(dir.path().join("subdir.so")).unwrap();

        let loader = ModuleLoader::new();
        let mut manager = ModuleManager::with_data_root(PathBuf::from("/tmp/tern-test"));

        let loaded = loader.load_from_directory(&mut manager, dir.path());
        assert_eq!(loaded, 0);
    }

    #[test]
    fn test_bogus_shared_object_is_skipped() {
        let dir = TempDir::new().unwrap();
        let ext = if cfg!(target_os = "windows") { "dll" } else { "so" };
        std::fs::write(dir.path().join(format!("broken.{ext}")), b"\x7fELF junk").unwrap();

        let loader = ModuleLoader::new();
        let mut manager = ModuleManager::with_data_root(PathBuf::from("/tmp/tern-test"));

        // The open fails; the scan must survive it.
        let loaded = loader.load_from_directory(&mut manager, dir.path());
        assert_eq!(loaded, 0);
        assert_eq!(manager.module_count(), 0);
    }

    #[test]
    fn test_is_shared_object() {
        #[cfg(target_os = "linux")]
        {
            assert!(is_shared_object(Path::new("/x/libfoo.so")));
            assert!(!is_shared_object(Path::new("/x/libfoo.dylib")));
        }
        assert!(!is_shared_object(Path::new("/x/config.toml")));
        assert!(!is_shared_object(Path::new("/x/noext")));
    }

    #[test]
    fn test_search_path_includes_user_dir() {
        let dirs = ModuleLoader::search_path();
        assert!(dirs.iter().any(|d| d.ends_with("tern/modules")));
    }
}
