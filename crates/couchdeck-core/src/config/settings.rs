use crate::Result;
use crate::layout::PadMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub keybindings: KeybindingConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,
}

impl Config {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Grid sizing, in host viewport units (terminal cells for the TUI host)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(default = "default_icon_width")]
    pub icon_width: f64,

    #[serde(default = "default_icon_height")]
    pub icon_height: f64,

    /// Cells never shrink below this width; height follows the aspect ratio
    #[serde(default = "default_min_icon_width")]
    pub min_icon_width: f64,

    #[serde(default = "default_spacing")]
    pub spacing: f64,

    #[serde(default = "default_padding")]
    pub padding: f64,

    #[serde(default = "default_min_columns")]
    pub min_columns: usize,

    #[serde(default = "default_min_rows")]
    pub min_rows: usize,

    #[serde(default)]
    pub max_columns: Option<usize>,

    #[serde(default)]
    pub pad_mode: PadMode,
}

fn default_icon_width() -> f64 {
    18.0
}
fn default_icon_height() -> f64 {
    5.0
}
fn default_min_icon_width() -> f64 {
    10.0
}
fn default_spacing() -> f64 {
    2.0
}
fn default_padding() -> f64 {
    2.0
}
fn default_min_columns() -> usize {
    3
}
fn default_min_rows() -> usize {
    2
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            icon_width: default_icon_width(),
            icon_height: default_icon_height(),
            min_icon_width: default_min_icon_width(),
            spacing: default_spacing(),
            padding: default_padding(),
            min_columns: default_min_columns(),
            min_rows: default_min_rows(),
            max_columns: None,
            pad_mode: PadMode::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationConfig {
    /// Wrap around grid edges instead of propagating the key
    #[serde(default = "default_true")]
    pub wrap: bool,

    /// Frames a deferred focus is retried before giving up
    #[serde(default = "default_focus_retry_limit")]
    pub focus_retry_limit: u32,

    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,

    #[serde(default = "default_true")]
    pub sound_feedback: bool,
}

fn default_true() -> bool {
    true
}
fn default_focus_retry_limit() -> u32 {
    5
}
fn default_long_press_ms() -> u64 {
    800
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            wrap: true,
            focus_retry_limit: default_focus_retry_limit(),
            long_press_ms: default_long_press_ms(),
            sound_feedback: true,
        }
    }
}

/// Shortcut strings such as `"Ctrl+q"`, parsed by [`crate::input::KeyChord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeybindingConfig {
    #[serde(default = "default_exit_shortcut")]
    pub exit: String,

    #[serde(default = "default_home_shortcut")]
    pub home: String,
}

fn default_exit_shortcut() -> String {
    "Ctrl+q".to_string()
}
fn default_home_shortcut() -> String {
    "Ctrl+o".to_string()
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            exit: default_exit_shortcut(),
            home: default_home_shortcut(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Frames spent fading in or out; 0 switches instantly
    #[serde(default = "default_fade_frames")]
    pub fade_frames: u32,

    #[serde(default = "default_true")]
    pub auto_hide_when_apps_running: bool,

    #[serde(default = "default_true")]
    pub start_shown: bool,
}

fn default_fade_frames() -> u32 {
    8
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            fade_frames: default_fade_frames(),
            auto_hide_when_apps_running: true,
            start_shown: true,
        }
    }
}
