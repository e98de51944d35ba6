//! Event payloads handed to module capability handlers

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// X11-style modifier bits carried in [`KeyEvent::modifiers`].
pub mod modifiers {
    /// Shift
    pub const SHIFT: u32 = 1 << 0;
    /// Caps lock
    pub const LOCK: u32 = 1 << 1;
    /// Control
    pub const CONTROL: u32 = 1 << 2;
    /// Alt / Meta
    pub const MOD1: u32 = 1 << 3;
    /// Super
    pub const MOD4: u32 = 1 << 6;
}

/// A key press as seen by the input layer, before the terminal consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Resolved key symbol
    pub keyval: u32,
    /// Hardware keycode
    pub keycode: u32,
    /// Modifier bitmask (see [`modifiers`])
    pub modifiers: u32,
}

/// Category of escape string forwarded to [`Module::handle_escape_string`].
///
/// [`Module::handle_escape_string`]: crate::Module::handle_escape_string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKind {
    /// Operating System Command
    Osc,
    /// Device Control String
    Dcs,
    /// Application Program Command
    Apc,
}

/// A parsed escape string, borrowed from the escape-sequence engine's buffer.
#[derive(Debug, Clone, Copy)]
pub struct EscapeString<'a> {
    /// Which introducer the string arrived under
    pub kind: EscapeKind,
    /// The string payload, introducer and terminator stripped
    pub bytes: &'a [u8],
}

/// Opaque, cloneable handle to the host's drawing surface.
///
/// The core never interprets this; a module that knows the concrete renderer
/// type can [`downcast`](RenderSurface::downcast) to it.
#[derive(Clone)]
pub struct RenderSurface(Arc<dyn Any + Send + Sync>);

impl RenderSurface {
    /// Wrap a concrete surface handle.
    pub fn new<T: Any + Send + Sync>(inner: Arc<T>) -> Self {
        Self(inner)
    }

    /// Wrap an already type-erased handle.
    pub fn from_erased(inner: Arc<dyn Any + Send + Sync>) -> Self {
        Self(inner)
    }

    /// Recover the concrete surface type, if `T` matches what the host put in.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.0).downcast::<T>().ok()
    }
}

impl fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderSurface").finish_non_exhaustive()
    }
}

/// A glyph about to be drawn, offered to [`Capability::GlyphTransform`]
/// modules before the font cache renders it.
///
/// [`Capability::GlyphTransform`]: crate::Capability::GlyphTransform
#[derive(Debug, Clone)]
pub struct GlyphEvent {
    /// The codepoint being drawn
    pub codepoint: char,
    /// Surface to draw into
    pub surface: RenderSurface,
    /// Cell origin x, in pixels
    pub x: f64,
    /// Cell origin y, in pixels
    pub y: f64,
    /// Cell width, in pixels
    pub width: f64,
    /// Cell height, in pixels
    pub height: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_event_modifiers() {
        let event = KeyEvent {
            keyval: 0x61,
            keycode: 38,
            modifiers: modifiers::CONTROL | modifiers::SHIFT,
        };
        assert_ne!(event.modifiers & modifiers::CONTROL, 0);
        assert_ne!(event.modifiers & modifiers::SHIFT, 0);
        assert_eq!(event.modifiers & modifiers::MOD1, 0);
    }

    #[test]
    fn test_render_surface_downcast() {
        struct FakeSurface {
            id: u32,
        }

        let surface = RenderSurface::new(Arc::new(FakeSurface { id: 7 }));
        let recovered = surface.downcast::<FakeSurface>().unwrap();
        assert_eq!(recovered.id, 7);
    }

    #[test]
    fn test_render_surface_downcast_wrong_type() {
        let surface = RenderSurface::new(Arc::new(42u32));
        assert!(surface.downcast::<String>().is_none());
    }

    #[test]
    fn test_escape_string_borrows_payload() {
        let buffer = b"52;c;aGVsbG8=";
        let seq = EscapeString {
            kind: EscapeKind::Osc,
            bytes: buffer,
        };
        assert_eq!(seq.kind, EscapeKind::Osc);
        assert_eq!(seq.bytes, buffer);
    }
}
