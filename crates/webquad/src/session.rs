//! Seams to the offscreen browser engine.
//!
//! The engine is split the way offscreen engines expose themselves: a
//! process-wide [`BrowserEngine`] that is initialized once and pumped every
//! frame, one [`BrowserSession`] (the browser instance commands go to), and
//! the [`BrowserClient`] callbacks the engine fires synchronously from inside
//! [`BrowserEngine::pump_message_loop`].

use std::path::PathBuf;

use serde_json::Value;
use webquad_config::BrowserConfig;

use crate::bindings::BindingManifest;
use crate::error::{BridgeError, Result};
use crate::input::{KeyEvent, MouseClick, MouseMove};

/// Which layer a paint callback carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintLayer {
    /// The page itself.
    View,
    /// The popup overlay (select dropdowns and the like).
    Popup,
}

impl TryFrom<i32> for PaintLayer {
    type Error = BridgeError;

    /// Map the engine's raw paint element type. Anything but view (0) or
    /// popup (1) breaks the engine contract.
    fn try_from(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(Self::View),
            1 => Ok(Self::Popup),
            other => Err(BridgeError::UnknownPaintLayer(other)),
        }
    }
}

/// A rectangle in browser (top-left origin) pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Details of a failed page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub url: String,
    pub code: i32,
    pub text: String,
}

/// Opaque native handle of the host window the session is parented to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowHandle(pub u64);

/// Engine-wide settings passed to [`BrowserEngine::initialize`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub windowless_rendering_enabled: bool,
    pub locales_dir: Option<PathBuf>,
    pub resources_dir: Option<PathBuf>,
    pub subprocess_path: Option<PathBuf>,
    /// Chromium command-line switches as `(name, value)`; empty value for flags.
    pub switches: Vec<(String, String)>,
}

impl EngineSettings {
    pub fn from_config(config: &BrowserConfig) -> Self {
        let mut switches = Vec::new();
        if config.disable_gpu_compositing {
            switches.push(("disable-gpu-compositing".to_string(), String::new()));
        }
        if config.enable_begin_frame_scheduling {
            switches.push(("enable-begin-frame-scheduling".to_string(), String::new()));
        }

        Self {
            windowless_rendering_enabled: true,
            locales_dir: config.locales_dir.clone(),
            resources_dir: config.resources_dir.clone(),
            subprocess_path: config.subprocess_path.clone(),
            switches,
        }
    }
}

/// Options for the single browser session a bridge owns.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub parent: WindowHandle,
    pub offscreen: bool,
    pub transparent: bool,
    pub windowless_frame_rate: u32,
    pub initial_url: String,
}

/// Callbacks the engine delivers while it is being pumped.
pub trait BrowserClient {
    /// The rectangle the engine should lay the page out in.
    fn view_rect(&self) -> ViewRect;

    /// A freshly rendered top-left BGRA buffer for `layer`.
    fn on_paint(&mut self, layer: PaintLayer, buffer: &[u8], width: u32, height: u32);

    fn on_popup_show(&mut self, visible: bool);

    fn on_popup_size(&mut self, rect: ViewRect);

    fn on_console_message(&mut self, message: &str, source: &str, line: u32);

    /// The main frame finished loading.
    fn on_load_end(&mut self);

    fn on_load_error(&mut self, error: &LoadError);

    /// Page script invoked a bound native function, or a method of a bound
    /// object (named `object.method`).
    fn on_native_call(&mut self, name: &str, args: &[Value]);
}

/// Commands accepted by a browser instance.
pub trait BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<()>;

    fn execute_script(&mut self, code: &str) -> Result<()>;

    fn call_function(&mut self, name: &str, args: &[Value]) -> Result<()>;

    /// Install the set of native names exposed to page script.
    fn set_bindings(&mut self, manifest: &BindingManifest) -> Result<()>;

    fn send_focus(&mut self, focused: bool) -> Result<()>;

    fn send_key_event(&mut self, event: &KeyEvent) -> Result<()>;

    fn send_mouse_click(&mut self, click: &MouseClick) -> Result<()>;

    fn send_mouse_move(&mut self, movement: &MouseMove) -> Result<()>;

    /// Tell the engine the view rect changed; it answers with new paints.
    fn was_resized(&mut self) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

/// Process-wide engine state.
pub trait BrowserEngine {
    type Session: BrowserSession;

    fn initialize(&mut self, settings: &EngineSettings) -> Result<()>;

    fn create_session(&mut self, options: &SessionOptions) -> Result<Self::Session>;

    /// Run one step of the engine's message loop, firing any queued
    /// callbacks into `client` before returning.
    fn pump_message_loop(&mut self, client: &mut dyn BrowserClient);

    /// Release engine-wide resources. Called once, after the session closed.
    fn shutdown(&mut self);
}

/// Render `name(args...)` as a script statement, for engines without a
/// native call-function command.
pub fn format_function_call(name: &str, args: &[Value]) -> String {
    let args = args.iter().map(Value::to_string).collect::<Vec<_>>().join(",");
    format!("{}({});", name, args)
}
