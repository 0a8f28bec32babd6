pub mod action;
pub mod collection;
pub mod config;
pub mod grid_view;
pub mod input;
pub mod long_press;
pub mod menu_list;
pub mod modal;
pub mod scheduler;
pub mod services;
pub mod view_state;

// Exposed for benchmarks - pure functions, also usable by hosts
pub mod layout;
pub mod navigator;
pub mod reconcile;

mod error;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use grid_view::GridView;
pub use modal::{HideReason, InputOutcome, LauncherEvent, ModalController};

pub use couchdeck_types::*;
