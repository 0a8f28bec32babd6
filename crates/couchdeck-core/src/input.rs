//! Raw input vocabulary, semantic classification and shortcut parsing.

use crate::config::KeybindingConfig;
use crate::{Error, Result};
use couchdeck_types::{ActivationModifiers, Direction, NavEvent};
use tracing::warn;

/// Keys the core can reason about; hosts translate their native key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Backspace,
    /// Dedicated "back" button on remotes
    Back,
    Enter,
    Space,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Menu,
    Char(char),
    F(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)] // Modifier flags are independent
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub super_key: bool,
}

impl KeyModifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        super_key: false,
    };

    /// Flags handed to the activation collaborator
    #[must_use]
    pub fn activation(self) -> ActivationModifiers {
        ActivationModifiers {
            new_window: self.ctrl || self.shift,
        }
    }
}

/// Unclassified input as delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    Key { key: Key, modifiers: KeyModifiers },
    PointerDown { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    Scroll { delta: f64 },
}

impl RawInput {
    #[must_use]
    pub fn key(key: Key) -> Self {
        RawInput::Key {
            key,
            modifiers: KeyModifiers::NONE,
        }
    }
}

/// Map a key press to a semantic navigation event.
///
/// Returns `None` for anything outside the Back / Movement / Select
/// vocabulary so the caller can propagate it untouched. Pointer activation is
/// produced by hit-testing, not here.
#[must_use]
pub fn classify_key(key: Key, modifiers: KeyModifiers) -> Option<NavEvent> {
    if modifiers.alt || modifiers.super_key {
        return None;
    }

    let movement = |direction| Some(NavEvent::Movement { direction });

    match key {
        Key::Escape | Key::Backspace | Key::Back => Some(NavEvent::Back),
        Key::Up if !modifiers.ctrl => movement(Direction::Up),
        Key::Down if !modifiers.ctrl => movement(Direction::Down),
        Key::Left if !modifiers.ctrl => movement(Direction::Left),
        Key::Right if !modifiers.ctrl => movement(Direction::Right),
        Key::Tab if modifiers.shift => movement(Direction::TabBackward),
        Key::Tab => movement(Direction::TabForward),
        Key::BackTab => movement(Direction::TabBackward),
        Key::Enter | Key::Space => Some(NavEvent::Select {
            modifiers: modifiers.activation(),
        }),
        _ => None,
    }
}

/// A parsed shortcut such as `Ctrl+Shift+q`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    /// Parse a `+`-separated shortcut string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShortcut`] if no key or an unknown key is given.
    pub fn parse(shortcut: &str) -> Result<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let mut key_part: Option<&str> = None;

        for part in shortcut.split('+').map(str::trim) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                "alt" => modifiers.alt = true,
                "super" | "meta" | "logo" => modifiers.super_key = true,
                "" => {}
                _ => key_part = Some(part),
            }
        }

        let key = key_part
            .and_then(parse_key)
            .ok_or_else(|| Error::InvalidShortcut(shortcut.to_string()))?;

        Ok(Self { key, modifiers })
    }

    #[must_use]
    pub fn matches(&self, key: Key, modifiers: KeyModifiers) -> bool {
        if self.modifiers != modifiers {
            return false;
        }
        match (self.key, key) {
            (Key::Char(expected), Key::Char(actual)) => expected.eq_ignore_ascii_case(&actual),
            (expected, actual) => expected == actual,
        }
    }
}

fn parse_key(key: &str) -> Option<Key> {
    let lower = key.to_lowercase();
    Some(match lower.as_str() {
        "escape" | "esc" => Key::Escape,
        "backspace" => Key::Backspace,
        "back" => Key::Back,
        "enter" | "return" => Key::Enter,
        "space" => Key::Space,
        "tab" => Key::Tab,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "menu" => Key::Menu,
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        _ => {
            if let Some(n) = lower.strip_prefix('f')
                && let Ok(n) = n.parse::<u8>()
                && (1..=12).contains(&n)
            {
                return Some(Key::F(n));
            }
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => Key::Char(c),
                _ => return None,
            }
        }
    })
}

/// Global shortcuts recognised before view navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Dismiss the overlay
    Exit,
    /// Show the overlay / return to the grid
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    pub exit: KeyChord,
    pub home: KeyChord,
}

impl Keymap {
    /// Build from config, falling back to the default chord (with a
    /// warning) for any binding that does not parse.
    #[must_use]
    pub fn from_config(config: &KeybindingConfig) -> Self {
        let defaults = KeybindingConfig::default();
        let parse_or_default = |value: &str, fallback: &str| {
            KeyChord::parse(value).unwrap_or_else(|e| {
                warn!("{e}, using {fallback}");
                KeyChord::parse(fallback).unwrap_or(KeyChord {
                    key: Key::Escape,
                    modifiers: KeyModifiers {
                        ctrl: true,
                        ..KeyModifiers::NONE
                    },
                })
            })
        };
        Self {
            exit: parse_or_default(&config.exit, &defaults.exit),
            home: parse_or_default(&config.home, &defaults.home),
        }
    }

    #[must_use]
    pub fn shortcut(&self, key: Key, modifiers: KeyModifiers) -> Option<Shortcut> {
        if self.exit.matches(key, modifiers) {
            Some(Shortcut::Exit)
        } else if self.home.matches(key, modifiers) {
            Some(Shortcut::Home)
        } else {
            None
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeybindingConfig::default())
    }
}
