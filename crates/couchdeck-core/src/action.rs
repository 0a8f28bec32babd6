//! What a cell does when it is activated.

use couchdeck_types::ActivationModifiers;
use serde::{Deserialize, Serialize};

/// Settings sub-lists reachable from the settings menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubListKind {
    Layout,
    Navigation,
}

impl SubListKind {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            SubListKind::Layout => "Layout",
            SubListKind::Navigation => "Navigation",
        }
    }
}

/// In-memory toggles exposed by the settings sub-lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    WrapNavigation,
    SoundFeedback,
    PadWithSpacing,
    AutoHideWhenAppsRunning,
}

/// The closed set of things a cell can do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LaunchApp { app_id: String },
    OpenSettings,
    OpenSubList(SubListKind),
    ToggleSetting(SettingKey),
    Back,
    HideOverlay,
}

/// Receiver of invoked actions; implemented by the modal controller
pub trait ActionTarget {
    fn launch_app(&mut self, app_id: &str, modifiers: ActivationModifiers);
    fn open_settings(&mut self);
    fn open_sub_list(&mut self, kind: SubListKind);
    fn toggle_setting(&mut self, key: SettingKey);
    fn go_back(&mut self);
    fn hide_overlay(&mut self);
}

impl Action {
    pub fn invoke<T: ActionTarget + ?Sized>(&self, target: &mut T, modifiers: ActivationModifiers) {
        match self {
            Action::LaunchApp { app_id } => target.launch_app(app_id, modifiers),
            Action::OpenSettings => target.open_settings(),
            Action::OpenSubList(kind) => target.open_sub_list(*kind),
            Action::ToggleSetting(key) => target.toggle_setting(*key),
            Action::Back => target.go_back(),
            Action::HideOverlay => target.hide_overlay(),
        }
    }
}
