//! The public bridge: owns the engine, its single session and the
//! composited view, and is driven once per host frame.

use std::path::Path;

use serde_json::Value;
use url::Url;
use webquad_config::WebQuadConfig;

use crate::bindings::{BoundObject, JsBindings, JsContext};
use crate::compositor::Compositor;
use crate::error::{BridgeError, Result};
use crate::frame::Surface;
use crate::host::{scaled_size, HostEvent, NormalizedPointer, TextureSlot, TickSignal, WindowState};
use crate::input::{translate_keystroke, translate_navigation_key, InputTranslator, KeyEvent};
use crate::lifecycle::{LoadGate, BLANK_PAGE_URL};
use crate::popup::PopupOverlay;
use crate::session::{
    BrowserClient, BrowserEngine, BrowserSession, EngineSettings, LoadError, PaintLayer,
    SessionOptions, ViewRect, WindowHandle,
};

/// The host window the browser view is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostWindow {
    pub handle: WindowHandle,
    pub width: u32,
    pub height: u32,
}

/// State touched by engine callbacks.
#[derive(Debug)]
struct ViewState {
    compositor: Compositor,
    popup: PopupOverlay,
    gate: LoadGate,
    bindings: JsBindings,
}

/// Callback target handed to the engine for the duration of one pump.
struct PumpClient<'a, S: BrowserSession> {
    view: &'a mut ViewState,
    session: &'a mut S,
}

impl<S: BrowserSession> BrowserClient for PumpClient<'_, S> {
    fn view_rect(&self) -> ViewRect {
        let (width, height) = self.view.compositor.dimensions();
        ViewRect {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    fn on_paint(&mut self, layer: PaintLayer, buffer: &[u8], width: u32, height: u32) {
        let view = &mut *self.view;
        view.compositor
            .on_paint(layer, buffer, width, height, &mut view.popup);
    }

    fn on_popup_show(&mut self, visible: bool) {
        self.view.popup.on_popup_show(visible);
    }

    fn on_popup_size(&mut self, rect: ViewRect) {
        self.view
            .popup
            .on_popup_size(rect.x, rect.y, rect.width, rect.height);
    }

    fn on_console_message(&mut self, message: &str, source: &str, line: u32) {
        log::info!("{} ({}:{})", message, source, line);
    }

    fn on_load_end(&mut self) {
        self.view.gate.on_load_end(&mut *self.session);
    }

    fn on_load_error(&mut self, error: &LoadError) {
        // Report only: the page stays unloaded and deferred calls stay queued.
        log::error!(
            "failed to load {}: {} (error {})",
            error.url,
            error.text,
            error.code
        );
    }

    fn on_native_call(&mut self, name: &str, args: &[Value]) {
        let view = &mut *self.view;
        let Some(handler) = view.bindings.handler_mut(name) else {
            log::warn!("page called unbound native function {:?}", name);
            return;
        };
        let mut ctx = JsContext {
            gate: &mut view.gate,
            session: &mut *self.session,
        };
        handler(&mut ctx, args);
    }
}

/// Offscreen browser view composited onto a host texture.
///
/// Everything runs on the host's frame thread: engine callbacks only fire
/// inside [`WebQuad::tick`], and input arrives between ticks through
/// [`WebQuad::handle_event`]. After [`WebQuad::shutdown`] every command
/// returns [`BridgeError::ShutDown`] and ticks return [`TickSignal::Stop`].
pub struct WebQuad<E: BrowserEngine, T: TextureSlot> {
    engine: E,
    session: Option<E::Session>,
    texture: T,
    view: ViewState,
    input: InputTranslator,
    ui_scale: f32,
}

impl<E: BrowserEngine, T: TextureSlot> WebQuad<E, T> {
    /// Initialize the engine, open the session on the blank page and size
    /// the view to `window`.
    pub fn new(mut engine: E, mut texture: T, window: HostWindow, config: &WebQuadConfig) -> Result<Self> {
        engine.initialize(&EngineSettings::from_config(&config.browser))?;

        let ui_scale = config.view.ui_scale;
        let (width, height) = scaled_size(window.width, window.height, ui_scale);
        texture.reallocate(width, height)?;

        let options = SessionOptions {
            parent: window.handle,
            offscreen: true,
            transparent: config.browser.transparent_painting,
            windowless_frame_rate: config.browser.windowless_frame_rate,
            initial_url: BLANK_PAGE_URL.to_string(),
        };
        let mut session = engine.create_session(&options)?;
        session.send_focus(true)?;
        session.was_resized()?;
        log::info!("browser session created at {}x{}", width, height);

        let mut bridge = Self {
            engine,
            session: Some(session),
            texture,
            view: ViewState {
                compositor: Compositor::new(width, height),
                popup: PopupOverlay::new(),
                gate: LoadGate::new(),
                bindings: JsBindings::new(),
            },
            input: InputTranslator::new(config.input.mouse_routing),
            ui_scale,
        };
        bridge.flush_texture()?;
        Ok(bridge)
    }

    fn session_mut(&mut self) -> Result<&mut E::Session> {
        self.session.as_mut().ok_or(BridgeError::ShutDown)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_shut_down() {
            return Err(BridgeError::ShutDown);
        }
        Ok(())
    }

    pub fn is_shut_down(&self) -> bool {
        self.session.is_none()
    }

    pub fn is_loaded(&self) -> bool {
        self.view.gate.is_loaded()
    }

    /// Deferred requests waiting for the page to load.
    pub fn pending_calls(&self) -> usize {
        self.view.gate.pending()
    }

    pub fn surface(&self) -> &Surface {
        self.view.compositor.surface()
    }

    pub fn popup(&self) -> &PopupOverlay {
        &self.view.popup
    }

    pub fn texture(&self) -> &T {
        &self.texture
    }

    pub fn session(&self) -> Option<&E::Session> {
        self.session.as_ref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Navigate to `url`; an empty URL loads the blank page.
    pub fn load_url(&mut self, url: &str) -> Result<()> {
        let manifest = self.view.bindings.manifest();
        let session = self.session.as_mut().ok_or(BridgeError::ShutDown)?;
        session.set_bindings(&manifest)?;

        let target = self.view.gate.begin_navigation(url);
        log::debug!("navigating to {}", target);
        session.navigate(&target)
    }

    /// Show an HTML document given as a string.
    pub fn load_html_string(&mut self, html: &str) -> Result<()> {
        self.load_url(&format!("data:text/html;charset=utf-8,{}", percent_encode(html)))
    }

    /// Show a local file; relative paths resolve against the working directory.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = std::path::absolute(path.as_ref())?;
        let url = Url::from_file_path(&path)
            .map_err(|()| BridgeError::InvalidPath(path.display().to_string()))?;
        self.load_url(url.as_str())
    }

    /// Run `code` in the page. With `defer_until_load` it waits for the
    /// current page to finish loading first.
    pub fn run_script(&mut self, code: &str, defer_until_load: bool) -> Result<()> {
        let session = self.session.as_mut().ok_or(BridgeError::ShutDown)?;
        self.view.gate.run_script(session, code, defer_until_load)
    }

    /// Call the page's global function `name` with JSON arguments.
    pub fn call_function(&mut self, name: &str, args: Vec<Value>, defer_until_load: bool) -> Result<()> {
        let session = self.session.as_mut().ok_or(BridgeError::ShutDown)?;
        self.view
            .gate
            .call_function(session, name, args, defer_until_load)
    }

    fn rebind(&mut self) -> Result<()> {
        let manifest = self.view.bindings.manifest();
        self.session_mut()?.set_bindings(&manifest)
    }

    /// Expose a native function to page script under `name`.
    pub fn bind_function<F>(&mut self, name: impl Into<String>, handler: F) -> Result<()>
    where
        F: FnMut(&mut JsContext<'_>, &[Value]) + 'static,
    {
        self.ensure_running()?;
        self.view.bindings.bind_function(name, Box::new(handler));
        self.rebind()
    }

    pub fn bind_object(&mut self, name: impl Into<String>, object: BoundObject) -> Result<()> {
        self.ensure_running()?;
        self.view.bindings.bind_object(name, object);
        self.rebind()
    }

    pub fn bind_property(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        self.ensure_running()?;
        self.view.bindings.bind_property(name, value.into());
        self.rebind()
    }

    pub fn mouse_routing(&self) -> bool {
        self.input.mouse_routing()
    }

    pub fn set_mouse_routing(&mut self, enabled: bool) {
        self.input.set_mouse_routing(enabled);
    }

    /// Per-frame driver: pump the engine, push the surface to the texture if
    /// anything changed and forward the pointer.
    pub fn tick(&mut self, pointer: Option<NormalizedPointer>) -> Result<TickSignal> {
        let Some(session) = self.session.as_mut() else {
            return Ok(TickSignal::Stop);
        };

        let mut client = PumpClient {
            view: &mut self.view,
            session,
        };
        self.engine.pump_message_loop(&mut client);

        // The texture holds this pump's paints even if the move fails.
        self.flush_texture()?;

        let (width, height) = self.view.compositor.dimensions();
        if let Some(movement) = self.input.mouse_move(pointer, width, height) {
            self.session_mut()?.send_mouse_move(&movement)?;
        }
        Ok(TickSignal::Continue)
    }

    /// Upload the surface if it changed. A failed upload stays dirty and is
    /// retried on the next flush.
    fn flush_texture(&mut self) -> Result<()> {
        if self.view.compositor.is_dirty() {
            self.texture.upload(self.view.compositor.surface())?;
            self.view.compositor.take_dirty();
        }
        Ok(())
    }

    /// Route one host event.
    pub fn handle_event(&mut self, event: HostEvent) -> Result<()> {
        match event {
            HostEvent::Window(window) => self.on_window_event(window),
            HostEvent::Keystroke(ch) => self.send_key_press(translate_keystroke(ch)),
            HostEvent::NavigationKey(key) => self.send_key_press(translate_navigation_key(key)),
            HostEvent::MouseButton { released, pointer } => {
                let (width, height) = self.view.compositor.dimensions();
                match self.input.mouse_click(released, pointer, width, height) {
                    Some(click) => self.session_mut()?.send_mouse_click(&click),
                    None => Ok(()),
                }
            }
        }
    }

    fn send_key_press(&mut self, events: [KeyEvent; 2]) -> Result<()> {
        let session = self.session_mut()?;
        for event in &events {
            session.send_key_event(event)?;
        }
        Ok(())
    }

    /// React to the host window changing: shut down when it closed, or
    /// reallocate the view when its pixel size changed.
    pub fn on_window_event(&mut self, window: WindowState) -> Result<()> {
        if self.session.is_none() {
            return Ok(());
        }
        if window.closed {
            log::info!("host window closed, shutting down browser");
            self.shutdown();
            return Ok(());
        }

        let (width, height) = scaled_size(window.width, window.height, self.ui_scale);
        let current = self.view.compositor.dimensions();
        if current == (width, height) {
            return Ok(());
        }

        log::debug!(
            "resizing view {}x{} -> {}x{}",
            current.0,
            current.1,
            width,
            height
        );
        // The compositor only takes the new size once the texture has it, so
        // a failed reallocation is retried by the next identical event.
        self.texture.reallocate(width, height)?;
        self.view.compositor.reallocate(width, height);
        self.session_mut()?.was_resized()?;
        self.flush_texture()
    }

    /// Close the session and release the engine. Runs once; later calls are
    /// no-ops.
    pub fn shutdown(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        if let Err(e) = session.close() {
            log::warn!("closing browser session failed: {}", e);
        }
        drop(session);
        self.engine.shutdown();
        log::info!("browser engine shut down");
    }
}

impl<E: BrowserEngine, T: TextureSlot> Drop for WebQuad<E, T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Percent-encode text for a `data:` URL, keeping only unreserved bytes.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.~".contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}
