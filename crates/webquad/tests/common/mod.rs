#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;
use webquad::{
    BindingManifest, BridgeError, BrowserClient, BrowserEngine, BrowserSession, EngineSettings,
    HostWindow, KeyEvent, LoadError, MouseClick, MouseMove, PaintLayer, Result, SessionOptions,
    Surface, TextureSlot, ViewRect, WebQuad, WebQuadConfig, WindowHandle,
};

/// Everything the fake engine was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Initialize(EngineSettings),
    CreateSession(SessionOptions),
    Navigate(String),
    ExecuteScript(String),
    CallFunction(String, Vec<Value>),
    SetBindings(BindingManifest),
    Focus(bool),
    Key(KeyEvent),
    Click(MouseClick),
    Move(MouseMove),
    WasResized,
    Close,
    Shutdown,
}

/// Callbacks fired on the next pump.
#[derive(Debug, Clone)]
pub enum Callback {
    Paint {
        layer: PaintLayer,
        buffer: Vec<u8>,
        width: u32,
        height: u32,
    },
    PopupShow(bool),
    PopupSize(ViewRect),
    Console(String),
    LoadEnd,
    LoadError(LoadError),
    NativeCall(String, Vec<Value>),
    QueryViewRect,
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub commands: Vec<Command>,
    pub queued: VecDeque<Callback>,
    pub view_rects: Vec<ViewRect>,
    pub pumps: usize,
    /// Make every `execute_script` fail.
    pub fail_scripts: bool,
    /// Make every `send_mouse_move` fail.
    pub fail_moves: bool,
    /// Make engine initialization fail.
    pub fail_initialize: bool,
    /// Number of upcoming texture reallocations that fail.
    pub failing_reallocations: usize,
}

pub type Shared = Rc<RefCell<Recorder>>;

pub struct FakeEngine {
    rec: Shared,
}

pub struct FakeSession {
    rec: Shared,
}

impl FakeSession {
    fn record(&self, command: Command) -> Result<()> {
        self.rec.borrow_mut().commands.push(command);
        Ok(())
    }
}

impl BrowserSession for FakeSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.record(Command::Navigate(url.to_string()))
    }

    fn execute_script(&mut self, code: &str) -> Result<()> {
        if self.rec.borrow().fail_scripts {
            return Err(BridgeError::Session(format!("rejected {}", code)));
        }
        self.record(Command::ExecuteScript(code.to_string()))
    }

    fn call_function(&mut self, name: &str, args: &[Value]) -> Result<()> {
        self.record(Command::CallFunction(name.to_string(), args.to_vec()))
    }

    fn set_bindings(&mut self, manifest: &BindingManifest) -> Result<()> {
        self.record(Command::SetBindings(manifest.clone()))
    }

    fn send_focus(&mut self, focused: bool) -> Result<()> {
        self.record(Command::Focus(focused))
    }

    fn send_key_event(&mut self, event: &KeyEvent) -> Result<()> {
        self.record(Command::Key(*event))
    }

    fn send_mouse_click(&mut self, click: &MouseClick) -> Result<()> {
        self.record(Command::Click(*click))
    }

    fn send_mouse_move(&mut self, movement: &MouseMove) -> Result<()> {
        if self.rec.borrow().fail_moves {
            return Err(BridgeError::Session("mouse move rejected".into()));
        }
        self.record(Command::Move(*movement))
    }

    fn was_resized(&mut self) -> Result<()> {
        self.record(Command::WasResized)
    }

    fn close(&mut self) -> Result<()> {
        self.record(Command::Close)
    }
}

impl BrowserEngine for FakeEngine {
    type Session = FakeSession;

    fn initialize(&mut self, settings: &EngineSettings) -> Result<()> {
        if self.rec.borrow().fail_initialize {
            return Err(BridgeError::InitFailed("missing resources".into()));
        }
        self.rec
            .borrow_mut()
            .commands
            .push(Command::Initialize(settings.clone()));
        Ok(())
    }

    fn create_session(&mut self, options: &SessionOptions) -> Result<FakeSession> {
        self.rec
            .borrow_mut()
            .commands
            .push(Command::CreateSession(options.clone()));
        Ok(FakeSession {
            rec: self.rec.clone(),
        })
    }

    fn pump_message_loop(&mut self, client: &mut dyn BrowserClient) {
        self.rec.borrow_mut().pumps += 1;
        loop {
            let next = self.rec.borrow_mut().queued.pop_front();
            let Some(callback) = next else {
                break;
            };
            match callback {
                Callback::Paint {
                    layer,
                    buffer,
                    width,
                    height,
                } => client.on_paint(layer, &buffer, width, height),
                Callback::PopupShow(visible) => client.on_popup_show(visible),
                Callback::PopupSize(rect) => client.on_popup_size(rect),
                Callback::Console(message) => client.on_console_message(&message, "page.js", 1),
                Callback::LoadEnd => client.on_load_end(),
                Callback::LoadError(error) => client.on_load_error(&error),
                Callback::NativeCall(name, args) => client.on_native_call(&name, &args),
                Callback::QueryViewRect => {
                    let rect = client.view_rect();
                    self.rec.borrow_mut().view_rects.push(rect);
                }
            }
        }
    }

    fn shutdown(&mut self) {
        self.rec.borrow_mut().commands.push(Command::Shutdown);
    }
}

/// Texture slot keeping every uploaded surface.
#[derive(Debug, Default)]
pub struct FakeTexture {
    rec: Shared,
    pub size: (u32, u32),
    pub reallocations: Vec<(u32, u32)>,
    pub uploads: Vec<Surface>,
}

impl TextureSlot for FakeTexture {
    fn reallocate(&mut self, width: u32, height: u32) -> Result<()> {
        {
            let mut rec = self.rec.borrow_mut();
            if rec.failing_reallocations > 0 {
                rec.failing_reallocations -= 1;
                return Err(BridgeError::GpuError(format!(
                    "cannot allocate {}x{} texture",
                    width, height
                )));
            }
        }
        self.size = (width, height);
        self.reallocations.push((width, height));
        Ok(())
    }

    fn upload(&mut self, surface: &Surface) -> Result<()> {
        assert_eq!(surface.dimensions(), self.size, "upload size must match slot");
        self.uploads.push(surface.clone());
        Ok(())
    }
}

pub type TestBridge = WebQuad<FakeEngine, FakeTexture>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn bridge_with_config(width: u32, height: u32, config: &WebQuadConfig) -> Result<(TestBridge, Shared)> {
    let rec = Shared::default();
    let bridge = bridge_on(&rec, width, height, config)?;
    Ok((bridge, rec))
}

/// Build a bridge around an existing recorder, so failures can be armed
/// before construction.
pub fn bridge_on(rec: &Shared, width: u32, height: u32, config: &WebQuadConfig) -> Result<TestBridge> {
    init_logging();
    let engine = FakeEngine { rec: rec.clone() };
    let window = HostWindow {
        handle: WindowHandle(42),
        width,
        height,
    };
    let texture = FakeTexture {
        rec: rec.clone(),
        ..FakeTexture::default()
    };
    WebQuad::new(engine, texture, window, config)
}

pub fn bridge(width: u32, height: u32) -> Result<(TestBridge, Shared)> {
    bridge_with_config(width, height, &WebQuadConfig::default())
}

/// Take and clear the recorded commands.
pub fn take_commands(rec: &Shared) -> Vec<Command> {
    std::mem::take(&mut rec.borrow_mut().commands)
}

pub fn queue(rec: &Shared, callback: Callback) {
    rec.borrow_mut().queued.push_back(callback);
}

/// A top-left BGRA buffer of one repeated pixel.
pub fn solid(width: u32, height: u32, bgra: [u8; 4]) -> Vec<u8> {
    bgra.repeat((width * height) as usize)
}
