//! Translation of host input into the browser engine's event schema.

use crate::host::{NavigationKey, NormalizedPointer};

/// Windows virtual-key codes for the navigation keys.
pub const VK_END: u32 = 0x23;
pub const VK_HOME: u32 = 0x24;
pub const VK_LEFT: u32 = 0x25;
pub const VK_UP: u32 = 0x26;
pub const VK_RIGHT: u32 = 0x27;
pub const VK_DOWN: u32 = 0x28;

/// Keystroke codes sent as raw key presses rather than text.
const CONTROL_KEYS: [u32; 4] = [
    7,   // escape
    8,   // backspace
    9,   // tab
    127, // delete
];

/// Kind of a [`KeyEvent`]. The bridge only emits `RawKeyDown`, `Char` and
/// `KeyUp`; `KeyDown` completes the engine's schema for backends that
/// synthesize their own key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    RawKeyDown,
    KeyDown,
    KeyUp,
    Char,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// Keyboard event as the engine consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub windows_key_code: u32,
    pub character: u32,
    pub unmodified_character: u32,
    pub modifiers: Modifiers,
}

impl NavigationKey {
    pub fn virtual_key_code(self) -> u32 {
        match self {
            Self::Left => VK_LEFT,
            Self::Right => VK_RIGHT,
            Self::Up => VK_UP,
            Self::Down => VK_DOWN,
            Self::Home => VK_HOME,
            Self::End => VK_END,
        }
    }
}

/// A press followed immediately by its release, both carrying `code`.
fn key_press(first: KeyEventKind, code: u32) -> [KeyEvent; 2] {
    let down = KeyEvent {
        kind: first,
        windows_key_code: code,
        character: code,
        unmodified_character: code,
        modifiers: Modifiers::NONE,
    };
    let up = KeyEvent {
        kind: KeyEventKind::KeyUp,
        ..down
    };
    [down, up]
}

/// Translate a typed character. Printable input goes out as a character
/// event, control keys as a raw key down.
pub fn translate_keystroke(ch: char) -> [KeyEvent; 2] {
    let code = u32::from(ch);
    let first = if CONTROL_KEYS.contains(&code) {
        KeyEventKind::RawKeyDown
    } else {
        KeyEventKind::Char
    };
    key_press(first, code)
}

pub fn translate_navigation_key(key: NavigationKey) -> [KeyEvent; 2] {
    key_press(KeyEventKind::RawKeyDown, key.virtual_key_code())
}

/// Pointer position in browser pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

/// Map a device-space pointer onto a `width x height` texture.
pub fn pointer_to_pixels(pointer: NormalizedPointer, width: u32, height: u32) -> PixelPoint {
    let (w, h) = (width as f32, height as f32);
    PixelPoint {
        x: (pointer.x + 1.0) / 2.0 * w,
        y: h - (pointer.y + 1.0) / 2.0 * h,
    }
}

/// Mouse button of a [`MouseClick`]. Host clicks are always `Left`; the
/// other buttons exist for engine backends forwarding richer input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

/// A button press or release at a pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseClick {
    pub x: i32,
    pub y: i32,
    pub button: MouseButton,
    pub released: bool,
    pub click_count: u32,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseMove {
    pub x: i32,
    pub y: i32,
    pub leave: bool,
}

/// Decides which pointer input reaches the page.
#[derive(Debug, Clone)]
pub struct InputTranslator {
    mouse_routing: bool,
}

impl InputTranslator {
    pub fn new(mouse_routing: bool) -> Self {
        Self { mouse_routing }
    }

    pub fn mouse_routing(&self) -> bool {
        self.mouse_routing
    }

    pub fn set_mouse_routing(&mut self, enabled: bool) {
        self.mouse_routing = enabled;
    }

    fn routed_point(
        &self,
        pointer: Option<NormalizedPointer>,
        width: u32,
        height: u32,
    ) -> Option<(i32, i32)> {
        if !self.mouse_routing {
            return None;
        }
        let point = pointer_to_pixels(pointer?, width, height);
        // The engine takes whole pixels.
        Some((point.x as i32, point.y as i32))
    }

    /// Left-button press or release, if routing is on and the pointer is
    /// over the viewport.
    pub fn mouse_click(
        &self,
        released: bool,
        pointer: Option<NormalizedPointer>,
        width: u32,
        height: u32,
    ) -> Option<MouseClick> {
        let (x, y) = self.routed_point(pointer, width, height)?;
        Some(MouseClick {
            x,
            y,
            button: MouseButton::Left,
            released,
            click_count: 1,
            modifiers: Modifiers::NONE,
        })
    }

    pub fn mouse_move(
        &self,
        pointer: Option<NormalizedPointer>,
        width: u32,
        height: u32,
    ) -> Option<MouseMove> {
        let (x, y) = self.routed_point(pointer, width, height)?;
        Some(MouseMove { x, y, leave: false })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ptr(x: f32, y: f32) -> Option<NormalizedPointer> {
        Some(NormalizedPointer { x, y })
    }

    #[test]
    fn pointer_corners_and_center() {
        let p = pointer_to_pixels(NormalizedPointer { x: -1.0, y: -1.0 }, 800, 600);
        assert_eq!(p, PixelPoint { x: 0.0, y: 600.0 });
        let p = pointer_to_pixels(NormalizedPointer { x: 1.0, y: 1.0 }, 800, 600);
        assert_eq!(p, PixelPoint { x: 800.0, y: 0.0 });
        let p = pointer_to_pixels(NormalizedPointer { x: 0.0, y: 0.0 }, 800, 600);
        assert_eq!(p, PixelPoint { x: 400.0, y: 300.0 });
    }

    #[test]
    fn printable_keystroke_is_char_then_key_up() {
        let [first, second] = translate_keystroke('a');
        assert_eq!(first.kind, KeyEventKind::Char);
        assert_eq!(second.kind, KeyEventKind::KeyUp);
        for ev in [first, second] {
            assert_eq!(ev.windows_key_code, 97);
            assert_eq!(ev.character, 97);
            assert_eq!(ev.unmodified_character, 97);
            assert_eq!(ev.modifiers, Modifiers::NONE);
        }
    }

    #[test]
    fn control_keystrokes_are_raw_key_down() {
        for code in [7u8, 8, 9, 127] {
            let [first, second] = translate_keystroke(char::from(code));
            assert_eq!(first.kind, KeyEventKind::RawKeyDown, "code {}", code);
            assert_eq!(second.kind, KeyEventKind::KeyUp);
            assert_eq!(second.windows_key_code, u32::from(code));
        }
        // Carriage return is not in the control set.
        assert_eq!(translate_keystroke('\r')[0].kind, KeyEventKind::Char);
    }

    #[test]
    fn navigation_keys_use_virtual_key_codes() {
        let [down, up] = translate_navigation_key(NavigationKey::Left);
        assert_eq!(down.kind, KeyEventKind::RawKeyDown);
        assert_eq!(down.windows_key_code, VK_LEFT);
        assert_eq!(up, KeyEvent { kind: KeyEventKind::KeyUp, ..down });
        assert_eq!(NavigationKey::End.virtual_key_code(), 0x23);
        assert_eq!(NavigationKey::Down.virtual_key_code(), 0x28);
    }

    #[test]
    fn click_is_single_left_button() {
        let input = InputTranslator::new(true);
        let click = input.mouse_click(true, ptr(0.0, 0.0), 100, 50).unwrap();
        assert_eq!(
            click,
            MouseClick {
                x: 50,
                y: 25,
                button: MouseButton::Left,
                released: true,
                click_count: 1,
                modifiers: Modifiers::NONE,
            }
        );
    }

    #[test]
    fn routing_disabled_or_outside_suppresses_pointer_events() {
        let mut input = InputTranslator::new(true);
        assert!(input.mouse_move(None, 100, 50).is_none());
        assert!(input.mouse_click(false, None, 100, 50).is_none());

        input.set_mouse_routing(false);
        assert!(input.mouse_move(ptr(0.5, 0.5), 100, 50).is_none());
        assert!(input.mouse_click(false, ptr(0.5, 0.5), 100, 50).is_none());

        input.set_mouse_routing(true);
        assert_eq!(
            input.mouse_move(ptr(0.5, 0.5), 100, 50),
            Some(MouseMove { x: 75, y: 12, leave: false })
        );
    }
}
