//! tern-module-api - Module API for the tern terminal emulator
//!
//! This crate provides the traits and types needed to write feature modules
//! for tern. Modules are optional units of terminal functionality (clipboard
//! sync, dynamic colors, ligature shaping, ...) with a uniform lifecycle;
//! they can be linked into the host or built as native dynamic libraries and
//! loaded at run time.
//!
//! # Example
//!
//! ```ignore
//! use tern_module_api::{
//!     Capability, Module, ModuleConfig, ModuleContext, ModuleError, ModuleInfo, export_module,
//! };
//!
//! #[derive(Default)]
//! pub struct BellLogger {
//!     bells: u64,
//! }
//!
//! impl Module for BellLogger {
//!     fn info(&self) -> ModuleInfo {
//!         ModuleInfo::new("bell-logger", "Logs every bell", "0.1.0")
//!     }
//!
//!     fn capabilities(&self) -> &[Capability] {
//!         &[Capability::Bell]
//!     }
//!
//!     fn handle_bell(&mut self, ctx: &mut ModuleContext) {
//!         self.bells += 1;
//!         ctx.log_info("ding");
//!     }
//! }
//!
//! export_module!(BellLogger);
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod types;

pub use config::ModuleConfig;
pub use context::{BackendKind, HostResources, ModuleContext};
pub use error::ModuleError;
pub use event::{EscapeKind, EscapeString, GlyphEvent, KeyEvent, RenderSurface};
pub use types::{Capability, ModuleInfo, Priority};

/// Current module API version. Dynamically loaded modules must match this
/// exactly; the loader checks it before instantiating anything.
pub const API_VERSION: u32 = 1;

/// The core module trait - implement this to create a tern module.
///
/// Lifecycle calls and capability handlers all have default implementations,
/// so a module only overrides what it cares about. Whether a handler is ever
/// invoked is governed by [`capabilities`](Module::capabilities): the manager
/// only dispatches an event category to modules that declare it.
///
/// Activation state is tracked by the manager, not the module, which is what
/// makes `activate`/`deactivate` idempotent from the host's point of view.
pub trait Module: Send + Sync {
    /// Return module metadata. The name must be unique per manager;
    /// uniqueness is enforced at registration.
    fn info(&self) -> ModuleInfo;

    /// Event categories this module wants. Default: none.
    fn capabilities(&self) -> &[Capability] {
        &[]
    }

    /// The priority band this module starts in. Lower runs earlier.
    fn default_priority(&self) -> Priority {
        Priority::Normal
    }

    /// Called when the module is activated. A module with no setup work can
    /// rely on the default, which always succeeds.
    fn activate(&mut self, _ctx: &mut ModuleContext) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Called when the module is deactivated. Must tolerate being called
    /// after a failed or partial activation.
    fn deactivate(&mut self, _ctx: &mut ModuleContext) {}

    /// Called with the module's own config section. May be called any number
    /// of times, before or after activation, including when the module is
    /// disabled in the host config.
    fn configure(&mut self, _config: &ModuleConfig, _ctx: &mut ModuleContext) {}

    // ─── Capability handlers (default no-ops) ────────────────────────

    /// The terminal bell rang. Requires [`Capability::Bell`].
    fn handle_bell(&mut self, _ctx: &mut ModuleContext) {}

    /// A key event arrived. Return `true` to consume it; later modules and
    /// the terminal itself then never see it. Requires
    /// [`Capability::KeyInput`].
    fn handle_key_event(&mut self, _event: &KeyEvent, _ctx: &mut ModuleContext) -> bool {
        false
    }

    /// A glyph is about to be drawn. Return `true` if this module drew it.
    /// Requires [`Capability::GlyphTransform`].
    fn transform_glyph(&mut self, _glyph: &GlyphEvent, _ctx: &mut ModuleContext) -> bool {
        false
    }

    /// An OSC/DCS/APC string was parsed. Return `true` to consume it.
    /// Requires [`Capability::EscapeString`].
    fn handle_escape_string(&mut self, _seq: &EscapeString<'_>, _ctx: &mut ModuleContext) -> bool {
        false
    }

    /// The background is about to be painted. Requires
    /// [`Capability::BackgroundRender`].
    fn render_background(
        &mut self,
        _surface: &RenderSurface,
        _width: f64,
        _height: f64,
        _ctx: &mut ModuleContext,
    ) {
    }
}

/// Export a module type for dynamic loading.
///
/// This macro generates the C ABI entry points the tern module loader uses
/// to probe and instantiate a module from a shared object.
///
/// # Usage
///
/// ```ignore
/// tern_module_api::export_module!(MyModule);
/// ```
///
/// # Generated Functions
///
/// - `_tern_module_create()`: Creates a new module instance
/// - `_tern_module_api_version()`: Returns the API version
/// - `_tern_module_destroy()`: Destroys a module instance
#[macro_export]
macro_rules! export_module {
    ($module_type:ty) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn _tern_module_create() -> *mut dyn $crate::Module {
            let module: Box<dyn $crate::Module> = Box::new(<$module_type>::default());
            Box::into_raw(module)
        }

        #[unsafe(no_mangle)]
        pub extern "C" fn _tern_module_api_version() -> u32 {
            $crate::API_VERSION
        }

        #[unsafe(no_mangle)]
        pub extern "C" fn _tern_module_destroy(ptr: *mut dyn $crate::Module) {
            if !ptr.is_null() {
                unsafe {
                    drop(Box::from_raw(ptr));
                }
            }
        }
    };
}
