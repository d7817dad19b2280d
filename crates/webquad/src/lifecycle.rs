//! Page load gate: script issued before the page finished loading is held
//! back and replayed once the load completes.

use std::collections::VecDeque;

use serde_json::Value;

use crate::error::Result;
use crate::session::BrowserSession;

/// Blank page used when asked to navigate nowhere.
pub const BLANK_PAGE_URL: &str = "about:blank";

/// A script request held until the page loads.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredCall {
    Script(String),
    Function { name: String, args: Vec<Value> },
}

impl DeferredCall {
    fn execute(&self, session: &mut dyn BrowserSession) -> Result<()> {
        match self {
            Self::Script(code) => session.execute_script(code),
            Self::Function { name, args } => session.call_function(name, args),
        }
    }
}

/// Tracks whether the current page has loaded.
///
/// Scripts and function calls keep separate queues; on load completion all
/// scripts run before any function call, each queue in submission order.
/// Neither queue is bounded.
#[derive(Debug, Default)]
pub struct LoadGate {
    loaded: bool,
    scripts: VecDeque<DeferredCall>,
    calls: VecDeque<DeferredCall>,
}

impl LoadGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of queued requests across both queues.
    pub fn pending(&self) -> usize {
        self.scripts.len() + self.calls.len()
    }

    /// Resolve the target URL of a navigation and mark the page as not
    /// loaded. The flag drops at request time, before the engine confirms
    /// anything.
    pub fn begin_navigation(&mut self, url: &str) -> String {
        self.loaded = false;
        if url.is_empty() {
            BLANK_PAGE_URL.to_string()
        } else {
            url.to_string()
        }
    }

    pub fn run_script(
        &mut self,
        session: &mut dyn BrowserSession,
        code: &str,
        defer_until_load: bool,
    ) -> Result<()> {
        let call = DeferredCall::Script(code.to_string());
        if defer_until_load && !self.loaded {
            self.scripts.push_back(call);
            return Ok(());
        }
        call.execute(session)
    }

    pub fn call_function(
        &mut self,
        session: &mut dyn BrowserSession,
        name: &str,
        args: Vec<Value>,
        defer_until_load: bool,
    ) -> Result<()> {
        let call = DeferredCall::Function {
            name: name.to_string(),
            args,
        };
        if defer_until_load && !self.loaded {
            self.calls.push_back(call);
            return Ok(());
        }
        call.execute(session)
    }

    /// Mark the page loaded and take everything queued, scripts first.
    pub fn complete_load(&mut self) -> Vec<DeferredCall> {
        self.loaded = true;
        self.scripts.drain(..).chain(self.calls.drain(..)).collect()
    }

    /// Mark the page loaded and replay the queues against `session`.
    ///
    /// A failing request is logged and the replay continues; the queues are
    /// empty afterwards either way. Returns how many requests ran cleanly.
    pub fn on_load_end(&mut self, session: &mut dyn BrowserSession) -> usize {
        let pending = self.complete_load();
        if !pending.is_empty() {
            log::debug!("page loaded, replaying {} deferred call(s)", pending.len());
        }

        let mut ok = 0;
        for call in &pending {
            match call.execute(session) {
                Ok(()) => ok += 1,
                Err(e) => log::error!("deferred call {:?} failed: {}", call, e),
            }
        }
        ok
    }
}
