//! Error types for the browser bridge.

use thiserror::Error;

/// Result type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur while driving the embedded browser.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The engine reported a paint for a layer kind the bridge doesn't know.
    ///
    /// This is an engine contract violation, never a stale callback.
    #[error("unknown paint element type: {0}")]
    UnknownPaintLayer(i32),

    /// Engine-wide initialization failed. Returned by engine backends from
    /// [`BrowserEngine::initialize`](crate::BrowserEngine::initialize).
    #[error("browser engine initialization failed: {0}")]
    InitFailed(String),

    /// The browser session rejected a command.
    #[error("browser session error: {0}")]
    Session(String),

    /// The bridge has already been shut down.
    #[error("bridge has been shutdown")]
    ShutDown,

    /// A local file could not be turned into a navigable URL.
    #[error("invalid file path: {0}")]
    InvalidPath(String),

    /// GPU/wgpu error.
    #[error("GPU error: {0}")]
    GpuError(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
