//! ModuleContext - a module's interface to the host terminal
//!
//! The host constructs exactly one [`ModuleManager`] per process and hands a
//! `&mut ModuleContext` into every lifecycle and handler call, so modules
//! never touch a global and never see a concrete host type.
//!
//! [`ModuleManager`]: ../tern_core/modules/struct.ModuleManager.html

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, Weak};

/// Which windowing backend the host is running under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// X11 windowing
    X11,
    /// Wayland windowing
    Wayland,
    /// No windowing (tests, automation)
    Headless,
}

/// Weak, type-erased references to the host's shared collaborators.
///
/// The host owns the underlying objects and keeps them alive for the
/// manager's lifetime; every slot is a `Weak`, so a getter returning `None`
/// means either the slot was never set, was cleared, or the host already
/// tore the resource down. Setting a slot with `None` clears it.
#[derive(Default)]
pub struct HostResources {
    terminal: Option<Weak<dyn Any + Send + Sync>>,
    window: Option<Weak<dyn Any + Send + Sync>>,
    pty: Option<Weak<dyn Any + Send + Sync>>,
    font_cache: Option<Weak<dyn Any + Send + Sync>>,
    renderer: Option<Weak<dyn Any + Send + Sync>>,
    color_scheme: Option<Weak<dyn Any + Send + Sync>>,
    backend: Option<BackendKind>,
}

fn downgrade<T: Any + Send + Sync>(handle: Option<&Arc<T>>) -> Option<Weak<dyn Any + Send + Sync>> {
    handle.map(|h| {
        // Clone first, then unsize at the binding; the coercion only fires
        // on the method-call form.
        let erased: Arc<dyn Any + Send + Sync> = h.clone();
        Arc::downgrade(&erased)
    })
}

fn upgrade<T: Any + Send + Sync>(slot: &Option<Weak<dyn Any + Send + Sync>>) -> Option<Arc<T>> {
    slot.as_ref()?.upgrade()?.downcast::<T>().ok()
}

impl HostResources {
    /// Set or clear the escape-engine/terminal-state handle.
    pub fn set_terminal<T: Any + Send + Sync>(&mut self, handle: Option<&Arc<T>>) {
        self.terminal = downgrade(handle);
    }

    /// Get the terminal handle, if set and still alive.
    pub fn terminal<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        upgrade(&self.terminal)
    }

    /// Set or clear the window handle.
    pub fn set_window<T: Any + Send + Sync>(&mut self, handle: Option<&Arc<T>>) {
        self.window = downgrade(handle);
    }

    /// Get the window handle, if set and still alive.
    pub fn window<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        upgrade(&self.window)
    }

    /// Set or clear the PTY handle.
    pub fn set_pty<T: Any + Send + Sync>(&mut self, handle: Option<&Arc<T>>) {
        self.pty = downgrade(handle);
    }

    /// Get the PTY handle, if set and still alive.
    pub fn pty<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        upgrade(&self.pty)
    }

    /// Set or clear the font-cache handle.
    pub fn set_font_cache<T: Any + Send + Sync>(&mut self, handle: Option<&Arc<T>>) {
        self.font_cache = downgrade(handle);
    }

    /// Get the font-cache handle, if set and still alive.
    pub fn font_cache<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        upgrade(&self.font_cache)
    }

    /// Set or clear the renderer handle.
    pub fn set_renderer<T: Any + Send + Sync>(&mut self, handle: Option<&Arc<T>>) {
        self.renderer = downgrade(handle);
    }

    /// Get the renderer handle, if set and still alive.
    pub fn renderer<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        upgrade(&self.renderer)
    }

    /// Set or clear the color-scheme handle.
    pub fn set_color_scheme<T: Any + Send + Sync>(&mut self, handle: Option<&Arc<T>>) {
        self.color_scheme = downgrade(handle);
    }

    /// Get the color-scheme handle, if set and still alive.
    pub fn color_scheme<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        upgrade(&self.color_scheme)
    }

    /// Set or clear the backend kind.
    pub fn set_backend(&mut self, backend: Option<BackendKind>) {
        self.backend = backend;
    }

    /// Get the backend kind, if set.
    pub fn backend(&self) -> Option<BackendKind> {
        self.backend
    }
}

/// A module's interface to the host.
///
/// One context is created per registered module and passed `&mut` into every
/// `configure`/`activate`/`deactivate` call and every capability handler. It
/// carries the module's name, a per-module data directory, logging helpers,
/// and a shared view of the host's [`HostResources`].
pub struct ModuleContext {
    module_name: String,
    data_dir: PathBuf,
    resources: Arc<RwLock<HostResources>>,
}

impl ModuleContext {
    /// Create a context for one module.
    pub fn new(
        module_name: String,
        data_dir: PathBuf,
        resources: Arc<RwLock<HostResources>>,
    ) -> Self {
        Self {
            module_name,
            data_dir,
            resources,
        }
    }

    /// The name of the module this context belongs to.
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Directory the module may use for persistent state. Not created
    /// automatically; modules that need it call `create_dir_all` themselves.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn resources(&self) -> RwLockReadGuard<'_, HostResources> {
        self.resources.read().unwrap_or_else(PoisonError::into_inner)
    }

    // ─── Host resources ──────────────────────────────────────────────

    /// The terminal handle, if the host has set one.
    pub fn terminal<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resources().terminal()
    }

    /// The window handle, if the host has set one.
    pub fn window<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resources().window()
    }

    /// The PTY handle, if the host has set one.
    pub fn pty<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resources().pty()
    }

    /// The font-cache handle, if the host has set one.
    pub fn font_cache<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resources().font_cache()
    }

    /// The renderer handle, if the host has set one.
    pub fn renderer<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resources().renderer()
    }

    /// The color-scheme handle, if the host has set one.
    pub fn color_scheme<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resources().color_scheme()
    }

    /// Which windowing backend the host is running under.
    pub fn backend(&self) -> Option<BackendKind> {
        self.resources().backend()
    }

    // ─── Logging ─────────────────────────────────────────────────────

    /// Log an info message (automatically prefixed with the module name)
    pub fn log_info(&self, message: &str) {
        tracing::info!(module = %self.module_name, "{}", message);
    }

    /// Log a warning message
    pub fn log_warn(&self, message: &str) {
        tracing::warn!(module = %self.module_name, "{}", message);
    }

    /// Log an error message
    pub fn log_error(&self, message: &str) {
        tracing::error!(module = %self.module_name, "{}", message);
    }

    /// Log a debug message
    pub fn log_debug(&self, message: &str) {
        tracing::debug!(module = %self.module_name, "{}", message);
    }
}
