//! Terminal host for the couchdeck launcher.
//!
//! Provides the concrete collaborators the core is driven with when running
//! inside a terminal: a JSON app catalog, a compositor-backed launcher, sound
//! cues, a status-line notifier and the crossterm input mapping.

pub mod catalog;
pub mod compositor;
pub mod host;
pub mod keys;
pub mod launcher;
pub mod sound;
pub mod watcher;
