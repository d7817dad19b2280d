//! Routes winit window events into the bridge's host events.

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use crate::host::{HostEvent, NavigationKey, NormalizedPointer, WindowState};

/// Tracks window size and cursor so winit events can be expressed as
/// [`HostEvent`]s and device-space pointers.
#[derive(Debug, Clone)]
pub struct WinitInput {
    size: PhysicalSize<u32>,
    cursor: Option<PhysicalPosition<f64>>,
}

impl WinitInput {
    pub fn new(size: PhysicalSize<u32>) -> Self {
        Self { size, cursor: None }
    }

    pub fn window_state(&self, closed: bool) -> WindowState {
        WindowState {
            width: self.size.width,
            height: self.size.height,
            closed,
        }
    }

    /// Cursor in device space, `None` while it is outside the window.
    pub fn pointer(&self) -> Option<NormalizedPointer> {
        let pos = self.cursor?;
        let (w, h) = (f64::from(self.size.width), f64::from(self.size.height));
        if w <= 0.0 || h <= 0.0 || pos.x < 0.0 || pos.y < 0.0 || pos.x >= w || pos.y >= h {
            return None;
        }
        Some(NormalizedPointer {
            x: (pos.x / w * 2.0 - 1.0) as f32,
            y: (1.0 - pos.y / h * 2.0) as f32,
        })
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Vec<HostEvent> {
        match event {
            WindowEvent::Resized(size) => {
                self.size = *size;
                vec![HostEvent::Window(self.window_state(false))]
            }
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                vec![HostEvent::Window(self.window_state(true))]
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(*position);
                Vec::new()
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                Vec::new()
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => vec![HostEvent::MouseButton {
                released: *state == ElementState::Released,
                pointer: self.pointer(),
            }],
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                if let Some(key) = navigation_key(&event.logical_key) {
                    return vec![HostEvent::NavigationKey(key)];
                }
                if let Some(ch) = control_char(&event.logical_key) {
                    return vec![HostEvent::Keystroke(ch)];
                }
                event
                    .text
                    .as_ref()
                    .map(|text| {
                        text.chars()
                            .filter(|c| !c.is_control())
                            .map(HostEvent::Keystroke)
                            .collect()
                    })
                    .unwrap_or_default()
            }
            _ => Vec::new(),
        }
    }
}

fn navigation_key(key: &Key) -> Option<NavigationKey> {
    match key {
        Key::Named(NamedKey::ArrowLeft) => Some(NavigationKey::Left),
        Key::Named(NamedKey::ArrowRight) => Some(NavigationKey::Right),
        Key::Named(NamedKey::ArrowUp) => Some(NavigationKey::Up),
        Key::Named(NamedKey::ArrowDown) => Some(NavigationKey::Down),
        Key::Named(NamedKey::Home) => Some(NavigationKey::Home),
        Key::Named(NamedKey::End) => Some(NavigationKey::End),
        _ => None,
    }
}

/// Keys whose keystroke is a control character. Escape stays with the host.
fn control_char(key: &Key) -> Option<char> {
    match key {
        Key::Named(NamedKey::Backspace) => Some('\u{8}'),
        Key::Named(NamedKey::Tab) => Some('\t'),
        Key::Named(NamedKey::Delete) => Some('\u{7f}'),
        Key::Named(NamedKey::Enter) => Some('\r'),
        _ => None,
    }
}
