//! ModuleManager - registry, lifecycle orchestrator, and event dispatcher

use libloading::Library;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tern_module_api::{
    BackendKind, Capability, EscapeString, GlyphEvent, HostResources, KeyEvent, Module,
    ModuleContext, ModuleInfo, RenderSurface,
};

use super::settings::ModuleSettings;

/// A registered module with its runtime state.
///
/// The `active` flag and priority live here rather than inside the module,
/// so only the manager ever flips them; that is what keeps
/// activate/deactivate idempotent regardless of what the module does.
struct ModuleEntry {
    /// Metadata, with defensive fallbacks already applied
    info: ModuleInfo,
    /// The module instance. Declared before `library` so it drops first;
    /// a dynamically loaded instance must not outlive its backing code.
    instance: Box<dyn Module>,
    /// Context handed into every call on this module
    context: ModuleContext,
    active: bool,
    priority: i32,
    /// Keeps the shared object mapped for .so-loaded modules
    library: Option<Library>,
}

/// The module manager registers, configures, activates, and dispatches
/// events to modules.
///
/// Registration order is preserved and serves as the tie-break for
/// equal-priority dispatch. All calls are synchronous and expected on the
/// host's single event-loop thread; dispatch callbacks must not re-enter the
/// manager.
pub struct ModuleManager {
    /// Registered modules, in registration order
    entries: Vec<ModuleEntry>,
    /// Shared host resource slots, visible to every module context
    resources: Arc<RwLock<HostResources>>,
    /// Host configuration, if any. Weak: the host owns it.
    settings: Option<Weak<ModuleSettings>>,
    /// Root for per-module data directories
    data_root: PathBuf,
    /// Libraries of unregistered modules stay mapped for the process
    /// lifetime; code from them may still be referenced.
    retained: Vec<Library>,
}

impl ModuleManager {
    /// Create a manager with the default per-module data root
    /// (`<data_dir>/modules`).
    pub fn new() -> Self {
        Self::with_data_root(tern_paths::data_dir().join("modules"))
    }

    /// Create a manager that places module data under `data_root`.
    pub fn with_data_root(data_root: PathBuf) -> Self {
        Self {
            entries: Vec::new(),
            resources: Arc::new(RwLock::new(HostResources::default())),
            settings: None,
            data_root,
            retained: Vec::new(),
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.info.name == name)
    }

    fn resources_mut(&self) -> RwLockWriteGuard<'_, HostResources> {
        self.resources
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn resources_read(&self) -> RwLockReadGuard<'_, HostResources> {
        self.resources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ─── Registry ────────────────────────────────────────────────────

    /// Register a statically linked module.
    ///
    /// Returns `false` (and leaves the existing entry untouched) if a module
    /// with the same name is already registered.
    pub fn register(&mut self, module: Box<dyn Module>) -> bool {
        self.register_entry(module, None)
    }

    /// Register a module together with the shared object it came from.
    /// Shares the exact semantics of [`register`](Self::register).
    pub(crate) fn register_loaded(&mut self, module: Box<dyn Module>, library: Library) -> bool {
        self.register_entry(module, Some(library))
    }

    fn register_entry(&mut self, instance: Box<dyn Module>, library: Option<Library>) -> bool {
        let info = normalize_info(instance.info());
        if self.index_of(&info.name).is_some() {
            tracing::warn!(module = %info.name, "module already registered, ignoring duplicate");
            // A loaded duplicate's instance must drop before its library.
            drop(instance);
            drop(library);
            return false;
        }

        let priority = i32::from(instance.default_priority());
        let context = ModuleContext::new(
            info.name.clone(),
            self.data_root.join(&info.name),
            Arc::clone(&self.resources),
        );
        tracing::debug!(module = %info.name, version = %info.version, "module registered");
        self.entries.push(ModuleEntry {
            info,
            instance,
            context,
            active: false,
            priority,
            library,
        });
        true
    }

    /// Remove a module from the registry.
    ///
    /// Does **not** deactivate it first; callers that want teardown call
    /// [`deactivate_module`](Self::deactivate_module) before unregistering.
    /// A shared-object module's library stays mapped for the rest of the
    /// process lifetime.
    pub fn unregister(&mut self, name: &str) -> bool {
        let Some(idx) = self.index_of(name) else {
            return false;
        };
        let entry = self.entries.remove(idx);
        let ModuleEntry {
            instance, library, ..
        } = entry;
        // Instance code may live in the library; drop it first, then retain
        // the mapping.
        drop(instance);
        if let Some(library) = library {
            self.retained.push(library);
        }
        tracing::debug!(module = %name, "module unregistered");
        true
    }

    /// Look up a module by name.
    pub fn get_module(&self, name: &str) -> Option<&dyn Module> {
        self.index_of(name).map(|i| self.entries[i].instance.as_ref())
    }

    /// Look up a module by name, mutably.
    pub fn get_module_mut(&mut self, name: &str) -> Option<&mut (dyn Module + 'static)> {
        self.index_of(name)
            .map(|i| self.entries[i].instance.as_mut())
    }

    /// Whether a module with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Snapshot of every registered module's metadata, in registration
    /// order and independent of activation state.
    pub fn list_modules(&self) -> Vec<ModuleInfo> {
        self.entries.iter().map(|e| e.info.clone()).collect()
    }

    /// Number of registered modules.
    pub fn module_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the named module is currently active.
    pub fn is_active(&self, name: &str) -> bool {
        self.index_of(name).is_some_and(|i| self.entries[i].active)
    }

    /// The module's dispatch priority, if registered.
    pub fn priority(&self, name: &str) -> Option<i32> {
        self.index_of(name).map(|i| self.entries[i].priority)
    }

    /// Override a module's dispatch priority. Any integer is accepted;
    /// lower runs earlier.
    pub fn set_priority(&mut self, name: &str, priority: i32) -> bool {
        let Some(idx) = self.index_of(name) else {
            return false;
        };
        self.entries[idx].priority = priority;
        true
    }

    // ─── Host resources ──────────────────────────────────────────────

    /// Set or clear the host settings consulted by
    /// [`activate_all`](Self::activate_all).
    pub fn set_settings(&mut self, settings: Option<&Arc<ModuleSettings>>) {
        self.settings = settings.map(Arc::downgrade);
    }

    fn settings(&self) -> Option<Arc<ModuleSettings>> {
        self.settings.as_ref()?.upgrade()
    }

    /// Set or clear the terminal handle.
    pub fn set_terminal<T: Any + Send + Sync>(&mut self, handle: Option<&Arc<T>>) {
        self.resources_mut().set_terminal(handle);
    }

    /// The terminal handle, if set and still alive.
    pub fn terminal<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resources_read().terminal()
    }

    /// Set or clear the window handle.
    pub fn set_window<T: Any + Send + Sync>(&mut self, handle: Option<&Arc<T>>) {
        self.resources_mut().set_window(handle);
    }

    /// The window handle, if set and still alive.
    pub fn window<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resources_read().window()
    }

    /// Set or clear the PTY handle.
    pub fn set_pty<T: Any + Send + Sync>(&mut self, handle: Option<&Arc<T>>) {
        self.resources_mut().set_pty(handle);
    }

    /// The PTY handle, if set and still alive.
    pub fn pty<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resources_read().pty()
    }

    /// Set or clear the font-cache handle.
    pub fn set_font_cache<T: Any + Send + Sync>(&mut self, handle: Option<&Arc<T>>) {
        self.resources_mut().set_font_cache(handle);
    }

    /// The font-cache handle, if set and still alive.
    pub fn font_cache<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resources_read().font_cache()
    }

    /// Set or clear the renderer handle.
    pub fn set_renderer<T: Any + Send + Sync>(&mut self, handle: Option<&Arc<T>>) {
        self.resources_mut().set_renderer(handle);
    }

    /// The renderer handle, if set and still alive.
    pub fn renderer<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resources_read().renderer()
    }

    /// Set or clear the color-scheme handle.
    pub fn set_color_scheme<T: Any + Send + Sync>(&mut self, handle: Option<&Arc<T>>) {
        self.resources_mut().set_color_scheme(handle);
    }

    /// The color-scheme handle, if set and still alive.
    pub fn color_scheme<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.resources_read().color_scheme()
    }

    /// Set or clear the backend kind.
    pub fn set_backend(&mut self, backend: Option<BackendKind>) {
        self.resources_mut().set_backend(backend);
    }

    /// The backend kind, if set.
    pub fn backend(&self) -> Option<BackendKind> {
        self.resources_read().backend()
    }

    // ─── Lifecycle ───────────────────────────────────────────────────

    /// Configure and activate every registered module, in registration
    /// order.
    ///
    /// When settings are present, `configure` is called with the module's
    /// own section even if the module turns out to be disabled; a disabled
    /// module must still be able to react to its settings. Activation
    /// failures are logged and do not stop the remaining modules.
    pub fn activate_all(&mut self) {
        let settings = self.settings();
        for idx in 0..self.entries.len() {
            let name = self.entries[idx].info.name.clone();

            if let Some(settings) = settings.as_deref() {
                self.configure_entry(idx, settings);
                if !settings.enabled(&name) {
                    tracing::debug!(module = %name, "module disabled in settings, skipping activation");
                    continue;
                }
            }

            self.activate_module(&name);
        }
    }

    /// Activate one module.
    ///
    /// Returns `true` if the module is active afterwards, including the
    /// already-active case. A module whose `activate` errors or panics is
    /// left inactive and `false` is returned.
    pub fn activate_module(&mut self, name: &str) -> bool {
        let Some(idx) = self.index_of(name) else {
            return false;
        };
        let entry = &mut self.entries[idx];
        if entry.active {
            return true;
        }

        let result = catch_unwind(AssertUnwindSafe(|| {
            entry.instance.activate(&mut entry.context)
        }));
        match result {
            Ok(Ok(())) => {
                entry.active = true;
                tracing::debug!(module = %name, "module activated");
                true
            }
            Ok(Err(e)) => {
                tracing::warn!(module = %name, error = %e, "module activation failed");
                false
            }
            Err(_) => {
                tracing::error!(module = %name, "module panicked during activation");
                false
            }
        }
    }

    /// Deactivate one module. No-op if inactive; the active flag is cleared
    /// unconditionally, even if the module's teardown panics.
    pub fn deactivate_module(&mut self, name: &str) {
        let Some(idx) = self.index_of(name) else {
            return;
        };
        let entry = &mut self.entries[idx];
        if !entry.active {
            return;
        }

        let result = catch_unwind(AssertUnwindSafe(|| {
            entry.instance.deactivate(&mut entry.context)
        }));
        if result.is_err() {
            tracing::error!(module = %name, "module panicked during deactivation");
        }
        entry.active = false;
        tracing::debug!(module = %name, "module deactivated");
    }

    /// Deactivate every registered module, enabled or not. Idempotent.
    pub fn deactivate_all(&mut self) {
        for idx in 0..self.entries.len() {
            let name = self.entries[idx].info.name.clone();
            self.deactivate_module(&name);
        }
    }

    /// Re-run `configure` on one module with its current settings section.
    /// Returns `false` when the module is unknown or no settings are set.
    pub fn configure_module(&mut self, name: &str) -> bool {
        let Some(settings) = self.settings() else {
            return false;
        };
        let Some(idx) = self.index_of(name) else {
            return false;
        };
        self.configure_entry(idx, &settings);
        true
    }

    /// Re-run `configure` on every registered module.
    pub fn configure_all(&mut self) {
        let Some(settings) = self.settings() else {
            return;
        };
        for idx in 0..self.entries.len() {
            self.configure_entry(idx, &settings);
        }
    }

    fn configure_entry(&mut self, idx: usize, settings: &ModuleSettings) {
        let entry = &mut self.entries[idx];
        let section = settings.section(&entry.info.name);
        let result = catch_unwind(AssertUnwindSafe(|| {
            entry.instance.configure(&section, &mut entry.context)
        }));
        if result.is_err() {
            tracing::error!(module = %entry.info.name, "module panicked during configure");
        }
    }

    // ─── Dispatch ────────────────────────────────────────────────────

    /// Active modules declaring `capability`, sorted by ascending priority.
    /// The sort is stable, so equal priorities keep registration order.
    fn candidates(&self, capability: Capability) -> Vec<usize> {
        let mut candidates: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.active && e.instance.capabilities().contains(&capability))
            .map(|(i, _)| i)
            .collect();
        candidates.sort_by_key(|&i| self.entries[i].priority);
        candidates
    }

    /// A handler panicked; log it and take the module out of dispatch.
    fn quarantine(&mut self, idx: usize) {
        let entry = &mut self.entries[idx];
        tracing::error!(module = %entry.info.name, "module panicked in handler, deactivating");
        entry.active = false;
    }

    /// Notify every active bell handler that the terminal bell rang.
    pub fn dispatch_bell(&mut self) {
        for idx in self.candidates(Capability::Bell) {
            let entry = &mut self.entries[idx];
            let result = catch_unwind(AssertUnwindSafe(|| {
                entry.instance.handle_bell(&mut entry.context)
            }));
            if result.is_err() {
                self.quarantine(idx);
            }
        }
    }

    /// Offer a key event to active input handlers. Returns `true` as soon
    /// as one consumes it; handlers after the consumer never see the event.
    pub fn dispatch_key_event(&mut self, event: &KeyEvent) -> bool {
        for idx in self.candidates(Capability::KeyInput) {
            let entry = &mut self.entries[idx];
            let result = catch_unwind(AssertUnwindSafe(|| {
                entry.instance.handle_key_event(event, &mut entry.context)
            }));
            match result {
                Ok(true) => return true,
                Ok(false) => {}
                Err(_) => self.quarantine(idx),
            }
        }
        false
    }

    /// Offer a glyph to active glyph transformers. Returns `true` if one of
    /// them drew it.
    pub fn dispatch_glyph(&mut self, glyph: &GlyphEvent) -> bool {
        for idx in self.candidates(Capability::GlyphTransform) {
            let entry = &mut self.entries[idx];
            let result = catch_unwind(AssertUnwindSafe(|| {
                entry.instance.transform_glyph(glyph, &mut entry.context)
            }));
            match result {
                Ok(true) => return true,
                Ok(false) => {}
                Err(_) => self.quarantine(idx),
            }
        }
        false
    }

    /// Offer a parsed escape string to active escape handlers. Returns
    /// `true` if one consumed it.
    pub fn dispatch_escape_string(&mut self, seq: &EscapeString<'_>) -> bool {
        for idx in self.candidates(Capability::EscapeString) {
            let entry = &mut self.entries[idx];
            let result = catch_unwind(AssertUnwindSafe(|| {
                entry
                    .instance
                    .handle_escape_string(seq, &mut entry.context)
            }));
            match result {
                Ok(true) => return true,
                Ok(false) => {}
                Err(_) => self.quarantine(idx),
            }
        }
        false
    }

    /// Let every active background provider paint, in priority order.
    pub fn dispatch_background_render(&mut self, surface: &RenderSurface, width: f64, height: f64) {
        for idx in self.candidates(Capability::BackgroundRender) {
            let entry = &mut self.entries[idx];
            let result = catch_unwind(AssertUnwindSafe(|| {
                entry
                    .instance
                    .render_background(surface, width, height, &mut entry.context)
            }));
            if result.is_err() {
                self.quarantine(idx);
            }
        }
    }
}

impl Default for ModuleManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply the defensive fallbacks for malformed metadata: listing and
/// registration must not break on a module that returns empty strings.
fn normalize_info(mut info: ModuleInfo) -> ModuleInfo {
    if info.name.is_empty() {
        info.name = "unknown".to_string();
    }
    if info.version.is_empty() {
        info.version = "0.0.0".to_string();
    }
    info
}
