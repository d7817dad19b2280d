//! Offscreen browser UI for real-time 3D hosts.
//!
//! This crate composites the paints of a windowless browser engine (the page
//! plus its popup layer) into a single texture for a full-screen quad,
//! forwards host keyboard and mouse input to the page, and bridges calls
//! between page script and native code.
//!
//! The browser engine and the host engine are collaborators behind traits:
//! an engine backend implements [`BrowserEngine`]/[`BrowserSession`] and
//! calls back into a [`BrowserClient`]; the host supplies a [`TextureSlot`]
//! and feeds [`HostEvent`]s. [`WebQuad`] ties them together and is driven by
//! calling [`WebQuad::tick`] once per rendered frame.
//!
//! ```ignore
//! let mut ui = WebQuad::new(engine, texture, window, &WebQuadConfig::load())?;
//! ui.bind_function("call_native", |page, _args| {
//!     let _ = page.call_function("color_text_red", Vec::new(), true);
//! })?;
//! ui.load_file("ui/main.html")?;
//! loop {
//!     for event in pending_host_events() {
//!         ui.handle_event(event)?;
//!     }
//!     if ui.tick(pointer())? == TickSignal::Stop {
//!         break;
//!     }
//! }
//! ```

mod bindings;
mod bridge;
mod compositor;
mod error;
mod frame;
mod host;
mod input;
mod lifecycle;
mod popup;
mod session;
mod texture;
mod winit_input;

pub use bindings::{BindingManifest, BoundObject, JsBindings, JsContext, NativeHandler};
pub use bridge::{HostWindow, WebQuad};
pub use compositor::Compositor;
pub use error::{BridgeError, Result};
pub use frame::{BgraPixel, RgbaPixel, Surface, BYTES_PER_PIXEL};
pub use host::{
    scaled_size, HostEvent, NavigationKey, NormalizedPointer, TextureSlot, TickSignal, WindowState,
};
pub use input::{
    pointer_to_pixels, translate_keystroke, translate_navigation_key, InputTranslator, KeyEvent,
    KeyEventKind, Modifiers, MouseButton, MouseClick, MouseMove, PixelPoint, VK_DOWN, VK_END,
    VK_HOME, VK_LEFT, VK_RIGHT, VK_UP,
};
pub use lifecycle::{DeferredCall, LoadGate, BLANK_PAGE_URL};
pub use popup::PopupOverlay;
pub use session::{
    format_function_call, BrowserClient, BrowserEngine, BrowserSession, EngineSettings, LoadError,
    PaintLayer, SessionOptions, ViewRect, WindowHandle,
};
pub use texture::WgpuTextureSlot;
pub use webquad_config::WebQuadConfig;
pub use winit_input::WinitInput;
