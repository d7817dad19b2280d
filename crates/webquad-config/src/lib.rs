//! WebQuad configuration system
//!
//! This crate provides centralized configuration for the WebQuad browser
//! overlay, loading settings from `webquad.toml` with environment variable
//! overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for WebQuad
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WebQuadConfig {
    /// Browser engine settings
    pub browser: BrowserConfig,
    /// Composited view settings
    pub view: ViewConfig,
    /// Input routing settings
    pub input: InputConfig,
}

/// Browser engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Maximum rate at which the offscreen view repaints
    pub windowless_frame_rate: u32,
    /// Directory holding the engine's locale packs
    pub locales_dir: Option<PathBuf>,
    /// Directory holding the engine's resource packs
    pub resources_dir: Option<PathBuf>,
    /// Helper executable spawned for renderer subprocesses
    pub subprocess_path: Option<PathBuf>,
    /// Pass `disable-gpu-compositing` to the engine
    pub disable_gpu_compositing: bool,
    /// Pass `enable-begin-frame-scheduling` to the engine
    pub enable_begin_frame_scheduling: bool,
    /// Paint with a transparent page background
    pub transparent_painting: bool,
}

/// Composited view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Ratio between the host window size and the browser surface size
    pub ui_scale: f32,
}

/// Input routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Forward mouse clicks and movement to the page on startup
    pub mouse_routing: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            windowless_frame_rate: 60,
            locales_dir: None,
            resources_dir: None,
            subprocess_path: None,
            // Same switches the offscreen SDL sample uses for OSR performance
            disable_gpu_compositing: true,
            enable_begin_frame_scheduling: true,
            transparent_painting: true,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { ui_scale: 1.0 }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_routing: true,
        }
    }
}

fn env_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl WebQuadConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the webquad.toml configuration file
    ///
    /// # Returns
    /// * `Ok(WebQuadConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (webquad.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_file_or_default("webquad.toml")
    }

    /// Load configuration from `path`, falling back to defaults when the file
    /// is missing or malformed
    pub fn load_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from_file(path).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("WEBQUAD_FRAME_RATE") {
            if let Ok(rate) = val.parse::<u32>() {
                self.browser.windowless_frame_rate = rate;
            }
        }
        if let Ok(dir) = std::env::var("WEBQUAD_RESOURCES_DIR") {
            self.browser.resources_dir = Some(PathBuf::from(dir));
        }
        if let Ok(dir) = std::env::var("WEBQUAD_LOCALES_DIR") {
            self.browser.locales_dir = Some(PathBuf::from(dir));
        }
        if let Ok(path) = std::env::var("WEBQUAD_SUBPROCESS_PATH") {
            self.browser.subprocess_path = Some(PathBuf::from(path));
        }

        if let Ok(val) = std::env::var("WEBQUAD_UI_SCALE") {
            if let Ok(scale) = val.parse::<f32>() {
                if scale > 0.0 {
                    self.view.ui_scale = scale;
                }
            }
        }

        if let Ok(val) = std::env::var("WEBQUAD_MOUSE_ROUTING") {
            self.input.mouse_routing = env_flag(&val);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from webquad.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
