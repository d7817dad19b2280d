//! Native functions, objects and values exposed to page script.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::Result;
use crate::lifecycle::LoadGate;
use crate::session::BrowserSession;

/// Handler for a call from page script. The context lets it answer back.
pub type NativeHandler = Box<dyn FnMut(&mut JsContext<'_>, &[Value])>;

/// Access to the page handed to native handlers.
///
/// Requests go through the load gate exactly like calls made on the bridge.
pub struct JsContext<'a> {
    pub(crate) gate: &'a mut LoadGate,
    pub(crate) session: &'a mut dyn BrowserSession,
}

impl JsContext<'_> {
    pub fn run_script(&mut self, code: &str, defer_until_load: bool) -> Result<()> {
        self.gate.run_script(self.session, code, defer_until_load)
    }

    pub fn call_function(&mut self, name: &str, args: Vec<Value>, defer_until_load: bool) -> Result<()> {
        self.gate.call_function(self.session, name, args, defer_until_load)
    }

    pub fn is_loaded(&self) -> bool {
        self.gate.is_loaded()
    }
}

/// An object whose methods page script can call.
#[derive(Default)]
pub struct BoundObject {
    methods: BTreeMap<String, NativeHandler>,
}

impl BoundObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: FnMut(&mut JsContext<'_>, &[Value]) + 'static,
    {
        self.methods.insert(name.into(), Box::new(handler));
        self
    }
}

impl fmt::Debug for BoundObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundObject")
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Names and values a session must expose, without the handlers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingManifest {
    pub functions: Vec<String>,
    /// Object name with its method names.
    pub objects: Vec<(String, Vec<String>)>,
    pub properties: Vec<(String, Value)>,
}

/// Everything bound into the page's global scope.
#[derive(Default)]
pub struct JsBindings {
    functions: BTreeMap<String, NativeHandler>,
    objects: BTreeMap<String, BoundObject>,
    properties: BTreeMap<String, Value>,
}

impl JsBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_function(&mut self, name: impl Into<String>, handler: NativeHandler) {
        self.functions.insert(name.into(), handler);
    }

    pub fn bind_object(&mut self, name: impl Into<String>, object: BoundObject) {
        self.objects.insert(name.into(), object);
    }

    pub fn bind_property(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }

    pub fn manifest(&self) -> BindingManifest {
        BindingManifest {
            functions: self.functions.keys().cloned().collect(),
            objects: self
                .objects
                .iter()
                .map(|(name, obj)| (name.clone(), obj.methods.keys().cloned().collect()))
                .collect(),
            properties: self
                .properties
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }

    /// Find the handler for a call name: a bound function, or
    /// `object.method` for a bound object.
    pub fn handler_mut(&mut self, name: &str) -> Option<&mut NativeHandler> {
        if let Some(handler) = self.functions.get_mut(name) {
            return Some(handler);
        }
        let (object, method) = name.split_once('.')?;
        self.objects.get_mut(object)?.methods.get_mut(method)
    }
}

impl fmt::Debug for JsBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsBindings")
            .field("manifest", &self.manifest())
            .finish()
    }
}
