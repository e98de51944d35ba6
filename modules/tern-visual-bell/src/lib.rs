//! Visual Bell - a sample tern module
//!
//! Replaces the audible bell with a short background flash. Demonstrates:
//! - Declaring capabilities (`Bell` + `BackgroundRender`)
//! - Reading the module's own config section in `configure`
//! - Building as a loadable shared object with `export_module!`
//!
//! ## Building
//!
//! ```bash
//! cargo build --release -p tern-visual-bell
//! ```
//!
//! ## Installing
//!
//! ```bash
//! mkdir -p ~/.config/tern/modules
//! cp target/release/libtern_visual_bell.so ~/.config/tern/modules/visual-bell.so
//! ```

use tern_module_api::{
    Capability, Module, ModuleConfig, ModuleContext, ModuleError, ModuleInfo, RenderSurface,
    export_module,
};

/// How many background passes a flash lasts by default.
const DEFAULT_FLASH_FRAMES: u32 = 6;

/// Flashes the terminal background whenever the bell rings.
pub struct VisualBell {
    /// Bells observed since activation
    bells_seen: u64,
    /// Remaining frames of the current flash
    flash_frames: u32,
    /// Configured flash length, in background passes
    frames_per_flash: u32,
}

impl Default for VisualBell {
    fn default() -> Self {
        Self {
            bells_seen: 0,
            flash_frames: 0,
            frames_per_flash: DEFAULT_FLASH_FRAMES,
        }
    }
}

impl VisualBell {
    /// Bells observed since activation.
    pub fn bells_seen(&self) -> u64 {
        self.bells_seen
    }

    /// Current flash intensity in `0.0..=1.0`. The host's renderer blends
    /// the flash color at this alpha over the background.
    pub fn flash_level(&self) -> f32 {
        if self.frames_per_flash == 0 {
            0.0
        } else {
            self.flash_frames as f32 / self.frames_per_flash as f32
        }
    }
}

impl Module for VisualBell {
    fn info(&self) -> ModuleInfo {
        ModuleInfo::new(
            "visual-bell",
            "Flashes the background instead of sounding the bell",
            env!("CARGO_PKG_VERSION"),
        )
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::Bell, Capability::BackgroundRender]
    }

    fn activate(&mut self, ctx: &mut ModuleContext) -> Result<(), ModuleError> {
        self.bells_seen = 0;
        self.flash_frames = 0;
        ctx.log_info("visual bell active");
        Ok(())
    }

    fn deactivate(&mut self, _ctx: &mut ModuleContext) {
        self.flash_frames = 0;
    }

    fn configure(&mut self, config: &ModuleConfig, ctx: &mut ModuleContext) {
        if let Some(frames) = config.get::<u32>("flash_frames") {
            if frames == 0 {
                ctx.log_warn("flash_frames must be at least 1, keeping previous value");
            } else {
                self.frames_per_flash = frames;
            }
        }
    }

    fn handle_bell(&mut self, ctx: &mut ModuleContext) {
        self.bells_seen += 1;
        self.flash_frames = self.frames_per_flash;
        ctx.log_debug("bell, starting flash");
    }

    fn render_background(
        &mut self,
        _surface: &RenderSurface,
        _width: f64,
        _height: f64,
        _ctx: &mut ModuleContext,
    ) {
        // The host reads flash_level() when compositing this pass; we only
        // advance the decay here.
        if self.flash_frames > 0 {
            self.flash_frames -= 1;
        }
    }
}

export_module!(VisualBell);

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::{Arc, RwLock};
    use tern_module_api::HostResources;

    fn ctx() -> ModuleContext {
        ModuleContext::new(
            "visual-bell".to_string(),
            PathBuf::from("/tmp/visual-bell"),
            Arc::new(RwLock::new(HostResources::default())),
        )
    }

    fn surface() -> RenderSurface {
        RenderSurface::new(Arc::new(()))
    }

    #[test]
    fn test_declares_bell_and_background() {
        let module = VisualBell::default();
        assert!(module.capabilities().contains(&Capability::Bell));
        assert!(module.capabilities().contains(&Capability::BackgroundRender));
        assert!(!module.capabilities().contains(&Capability::KeyInput));
    }

    #[test]
    fn test_bell_starts_flash_and_render_decays_it() {
        let mut module = VisualBell::default();
        let mut ctx = ctx();
        module.activate(&mut ctx).unwrap();

        assert_eq!(module.flash_level(), 0.0);
        module.handle_bell(&mut ctx);
        assert_eq!(module.bells_seen(), 1);
        assert_eq!(module.flash_level(), 1.0);

        let surface = surface();
        for _ in 0..DEFAULT_FLASH_FRAMES {
            module.render_background(&surface, 800.0, 600.0, &mut ctx);
        }
        assert_eq!(module.flash_level(), 0.0);

        // Extra passes after the flash ended are harmless.
        module.render_background(&surface, 800.0, 600.0, &mut ctx);
        assert_eq!(module.flash_level(), 0.0);
    }

    #[test]
    fn test_configure_overrides_flash_length() {
        let mut module = VisualBell::default();
        let mut ctx = ctx();

        let mut config = ModuleConfig::new();
        config.set("flash_frames", 2i64).unwrap();
        module.configure(&config, &mut ctx);

        module.handle_bell(&mut ctx);
        let surface = surface();
        module.render_background(&surface, 800.0, 600.0, &mut ctx);
        assert_eq!(module.flash_level(), 0.5);
    }

    #[test]
    fn test_configure_rejects_zero_frames() {
        let mut module = VisualBell::default();
        let mut ctx = ctx();

        let mut config = ModuleConfig::new();
        config.set("flash_frames", 0i64).unwrap();
        module.configure(&config, &mut ctx);

        assert_eq!(module.frames_per_flash, DEFAULT_FLASH_FRAMES);
    }

    #[test]
    fn test_deactivate_clears_flash() {
        let mut module = VisualBell::default();
        let mut ctx = ctx();
        module.handle_bell(&mut ctx);
        module.deactivate(&mut ctx);
        assert_eq!(module.flash_level(), 0.0);
    }
}
