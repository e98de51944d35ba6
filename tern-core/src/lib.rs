//! tern-core: Module runtime for the tern terminal emulator
//!
//! This crate hosts the pieces the terminal uses to run an open set of
//! feature modules:
//!
//! - **Module management** - [`ModuleManager`] registers modules, drives
//!   their lifecycle, and dispatches events to them in priority order
//! - **Dynamic loading** - [`ModuleLoader`] scans module directories for
//!   native shared objects and registers what it finds
//! - **Settings** - [`ModuleSettings`] is the host-side view of the
//!   `[modules.*]` configuration sections
//!
//! The escape-sequence engine, windowing backends, PTY, font cache, and
//! renderer are external collaborators; modules reach them only through the
//! opaque handles on [`ModuleContext`](tern_module_api::ModuleContext).
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tern_core::modules::{ModuleLoader, ModuleManager, ModuleSettings};
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut manager = ModuleManager::new();
//!
//!     let settings = Arc::new(ModuleSettings::load(
//!         &tern_paths::config_dir().join("tern.toml"),
//!     )?);
//!     manager.set_settings(Some(&settings));
//!
//!     let loader = ModuleLoader::new();
//!     for dir in ModuleLoader::search_path() {
//!         loader.load_from_directory(&mut manager, &dir);
//!     }
//!
//!     manager.activate_all();
//!
//!     // ... event loop dispatches as things happen:
//!     manager.dispatch_bell();
//!     Ok(())
//! }
//! ```

pub mod modules;

pub use modules::{LoadError, ModuleLoader, ModuleManager, ModuleSettings};
