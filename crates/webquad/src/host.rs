//! Types exchanged with the host 3D engine.

use crate::error::Result;
use crate::frame::Surface;

/// Snapshot of the host window reported on every window event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    pub width: u32,
    pub height: u32,
    pub closed: bool,
}

/// Pointer position in device space: both axes in `[-1, 1]`, origin at the
/// viewport center, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPointer {
    pub x: f32,
    pub y: f32,
}

/// Navigation keys the host forwards individually (they produce no text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

/// Input and window events routed from the host into the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Window(WindowState),
    /// A typed character, control characters included.
    Keystroke(char),
    NavigationKey(NavigationKey),
    /// Primary button press or release; `pointer` is `None` when the pointer
    /// is outside the viewport.
    MouseButton {
        released: bool,
        pointer: Option<NormalizedPointer>,
    },
}

/// Returned from every frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSignal {
    Continue,
    Stop,
}

/// The texture slot of the host's full-screen quad.
///
/// The quad is expected to alpha-blend the texture over the scene.
pub trait TextureSlot {
    /// Recreate the backing texture at a new size.
    fn reallocate(&mut self, width: u32, height: u32) -> Result<()>;

    /// Push the composited surface. Dimensions always match the last
    /// `reallocate`.
    fn upload(&mut self, surface: &Surface) -> Result<()>;
}

/// Surface size for a host window under a UI scale factor.
pub fn scaled_size(width: u32, height: u32, ui_scale: f32) -> (u32, u32) {
    let scale = f64::from(ui_scale);
    (
        (f64::from(width) * scale).round() as u32,
        (f64::from(height) * scale).round() as u32,
    )
}
