//! Shared types for couchdeck launcher components.
//!
//! This crate provides the plain data types used by couchdeck-core and
//! couchdeck-tui: app entries as reported by the inventory backend, the
//! semantic input vocabulary the navigation core understands, and the small
//! geometry and state enums the views expose to hosts.

use serde::{Deserialize, Serialize};

/// Whether an application currently has windows open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeState {
    #[default]
    Stopped,
    Running,
}

/// An installed application as reported by the inventory backend.
///
/// The core never mutates entries; it re-derives its cells from a fresh
/// snapshot on every reload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEntry {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec: Option<String>,
    #[serde(default)]
    pub runtime_state: RuntimeState,
    #[serde(default)]
    pub is_favorite: bool,
}

impl AppEntry {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_exec(mut self, exec: impl Into<String>) -> Self {
        self.exec = Some(exec.into());
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.runtime_state == RuntimeState::Running
    }
}

/// Directional movement requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    /// Linear forward traversal (Tab), always wraps
    TabForward,
    /// Linear backward traversal (Shift+Tab), always wraps
    TabBackward,
}

impl Direction {
    /// Whether this direction moves along a row rather than a column.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(
            self,
            Direction::Left | Direction::Right | Direction::TabForward | Direction::TabBackward
        )
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::TabForward => Direction::TabBackward,
            Direction::TabBackward => Direction::TabForward,
        }
    }
}

/// Modifier flags supplied to the activation collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationModifiers {
    /// Open a new window instead of focusing an existing one
    pub new_window: bool,
}

/// The only input language the navigation core accepts.
///
/// Hosts classify raw key and pointer events into these; anything that does
/// not map to one of them is propagated untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavEvent {
    Back,
    Movement { direction: Direction },
    Select { modifiers: ActivationModifiers },
    PointerActivate { id: String },
}

/// Layout box of a placed cell, in viewport units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CellBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CellBox {
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x1 && x < self.x2 && y >= self.y1 && y < self.y2
    }
}

/// Which of the mutually exclusive views is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Grid,
    SettingsList,
    SubList,
}

/// Visibility phase of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalPhase {
    #[default]
    Hidden,
    Showing,
    Shown,
    Hiding,
}

impl ModalPhase {
    /// Whether the overlay is on screen (including while fading).
    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, ModalPhase::Hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_entry_defaults_from_minimal_json() {
        let entry: AppEntry = serde_json::from_str(r#"{"id":"firefox","displayName":"Firefox"}"#)
            .unwrap();
        assert_eq!(entry.id, "firefox");
        assert_eq!(entry.runtime_state, RuntimeState::Stopped);
        assert!(!entry.is_favorite);
        assert!(entry.exec.is_none());
    }

    #[test]
    fn test_app_entry_builder() {
        let entry = AppEntry::new("kodi", "Kodi")
            .with_exec("kodi")
            .with_icon("kodi");
        assert_eq!(entry.exec.as_deref(), Some("kodi"));
        assert_eq!(entry.icon.as_deref(), Some("kodi"));
        assert!(!entry.is_running());
    }

    #[test]
    fn test_nav_event_tagged_serialization() {
        let event = NavEvent::Movement {
            direction: Direction::Left,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"movement","direction":"left"}"#);
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::TabForward.opposite(), Direction::TabBackward);
        assert!(Direction::TabBackward.is_horizontal());
        assert!(!Direction::Down.is_horizontal());
    }

    #[test]
    fn test_cell_box_contains_is_half_open() {
        let b = CellBox::new(0.0, 0.0, 10.0, 5.0);
        assert!(b.contains(0.0, 0.0));
        assert!(b.contains(9.9, 4.9));
        assert!(!b.contains(10.0, 2.0));
        assert!(!b.contains(2.0, 5.0));
        assert!((b.width() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_modal_phase_visibility() {
        assert!(!ModalPhase::Hidden.is_visible());
        assert!(ModalPhase::Showing.is_visible());
        assert!(ModalPhase::Hiding.is_visible());
    }
}

/// Property-based tests for the geometry helpers.
#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn cell_box_contains_its_origin(
            x in -1e4f64..1e4,
            y in -1e4f64..1e4,
            w in 0.1f64..1e3,
            h in 0.1f64..1e3,
        ) {
            let b = CellBox::new(x, y, x + w, y + h);
            prop_assert!(b.contains(x, y));
            prop_assert!(!b.contains(x + w, y));
        }
    }
}
