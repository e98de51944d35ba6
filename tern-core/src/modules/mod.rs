//! Module runtime for tern
//!
//! This module provides the infrastructure for registering and running
//! feature modules:
//!
//! - [`ModuleManager`]: registry, lifecycle orchestrator, and event
//!   dispatcher
//! - [`ModuleLoader`]: loads modules from native shared objects
//! - [`ModuleSettings`]: host configuration view (`[modules.<name>]`)
//! - [`LoadError`]: error type for loading and settings parsing
//!
//! # Module Discovery
//!
//! Shared-object modules are discovered from the directories returned by
//! [`ModuleLoader::search_path`]:
//! 1. Each entry of `TERN_MODULE_PATH` (colon-separated)
//! 2. User modules: `~/.config/tern/modules/`
//! 3. System modules: `/usr/lib/tern/modules/`
//!
//! Statically linked modules go through [`ModuleManager::register`] and share
//! identical lifecycle semantics from then on.
//!
//! # Example
//!
//! ```ignore
//! use tern_core::modules::{ModuleLoader, ModuleManager};
//!
//! let mut manager = ModuleManager::new();
//! manager.register(Box::new(MyBuiltin::default()));
//!
//! let loader = ModuleLoader::new();
//! loader.load_from_directory(&mut manager, &dir);
//!
//! manager.activate_all();
//! let consumed = manager.dispatch_key_event(&event);
//! ```

mod error;
mod loader;
mod manager;
mod settings;

pub use error::LoadError;
pub use loader::ModuleLoader;
pub use manager::ModuleManager;
pub use settings::ModuleSettings;
