//! Collaborators the core calls into.
//!
//! The core never owns the app inventory, the launcher, the sound player or
//! the compositor grab; hosts inject implementations of these traits. All
//! methods take `&self` so a single `Rc` can be shared between the views and
//! the modal controller.

use crate::Result;
use couchdeck_types::{ActivationModifiers, AppEntry, RuntimeState};
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

/// Source of installed applications
pub trait AppInventory {
    fn all_apps(&self) -> Vec<AppEntry>;

    /// Favorite ids in favorite-list order
    fn favorite_ids(&self) -> Vec<String>;

    fn running_ids(&self) -> HashSet<String>;

    /// Everything a reload needs, captured at one point in time.
    fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            apps: self.all_apps(),
            favorites: self.favorite_ids(),
            running: self.running_ids(),
        }
    }
}

/// Launches or focuses applications
pub trait Activator {
    /// Launch the app or focus its existing window.
    ///
    /// # Errors
    ///
    /// Returns an error if the app could not be started.
    fn activate(&self, entry: &AppEntry, modifiers: ActivationModifiers) -> Result<()>;

    /// Secondary action bound to a long press.
    ///
    /// # Errors
    ///
    /// Returns an error if the host fails to perform the action.
    fn open_context_menu(&self, entry: &AppEntry) -> Result<()> {
        let _ = entry;
        Ok(())
    }
}

/// Fire-and-forget cues (typically sounds)
pub trait InputFeedback {
    fn on_focus_moved(&self);
    fn on_item_activated(&self);
}

/// User-visible notifications
pub trait Notifier {
    fn notify_error(&self, title: &str, message: &str);
}

/// Token proving an exclusive input grab is held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabToken(pub u64);

/// Exclusive keyboard/pointer grab provided by the compositor
pub trait InputGrab {
    /// # Errors
    ///
    /// Returns [`crate::Error::Grab`] if another client holds the input.
    fn acquire(&self) -> Result<GrabToken>;

    fn release(&self, token: GrabToken);
}

/// Feedback sink that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl InputFeedback for SilentFeedback {
    fn on_focus_moved(&self) {}
    fn on_item_activated(&self) {}
}

/// Wraps a feedback sink behind a runtime on/off switch
pub struct FeedbackGate {
    inner: Rc<dyn InputFeedback>,
    enabled: Cell<bool>,
}

impl FeedbackGate {
    pub fn new(inner: Rc<dyn InputFeedback>, enabled: bool) -> Self {
        Self {
            inner,
            enabled: Cell::new(enabled),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}

impl InputFeedback for FeedbackGate {
    fn on_focus_moved(&self) {
        if self.enabled.get() {
            self.inner.on_focus_moved();
        }
    }

    fn on_item_activated(&self) {
        if self.enabled.get() {
            self.inner.on_item_activated();
        }
    }
}

/// A point-in-time view of the inventory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySnapshot {
    pub apps: Vec<AppEntry>,
    pub favorites: Vec<String>,
    pub running: HashSet<String>,
}

impl InventorySnapshot {
    /// Apps in grid order: favorites in favorite-list order, then running
    /// non-favorites, then everything else. The latter two groups are sorted
    /// by display name, case-insensitively, with the id as tie-break.
    ///
    /// Favorite ids that name no installed app are skipped. Runtime state and
    /// the favorite flag on each returned entry reflect this snapshot.
    #[must_use]
    pub fn ordered(&self) -> Vec<AppEntry> {
        order_apps(&self.apps, &self.favorites, &self.running)
    }

    /// Number of running apps known to the inventory.
    #[must_use]
    pub fn running_count(&self) -> usize {
        self.running.len()
    }
}

/// See [`InventorySnapshot::ordered`].
#[must_use]
pub fn order_apps(
    apps: &[AppEntry],
    favorites: &[String],
    running: &HashSet<String>,
) -> Vec<AppEntry> {
    let favorite_set: HashSet<&str> = favorites.iter().map(String::as_str).collect();

    let annotate = |app: &AppEntry| {
        let mut app = app.clone();
        app.is_favorite = favorite_set.contains(app.id.as_str());
        app.runtime_state = if running.contains(&app.id) {
            RuntimeState::Running
        } else {
            RuntimeState::Stopped
        };
        app
    };

    let mut ordered: Vec<AppEntry> = Vec::with_capacity(apps.len());
    let mut placed: HashSet<&str> = HashSet::new();

    for id in favorites {
        if placed.contains(id.as_str()) {
            continue;
        }
        if let Some(app) = apps.iter().find(|a| &a.id == id) {
            placed.insert(id.as_str());
            ordered.push(annotate(app));
        }
    }

    let sort_key = |app: &AppEntry| (app.display_name.to_lowercase(), app.id.clone());

    let mut running_apps: Vec<AppEntry> = apps
        .iter()
        .filter(|a| !favorite_set.contains(a.id.as_str()) && running.contains(&a.id))
        .map(annotate)
        .collect();
    running_apps.sort_by_key(sort_key);

    let mut others: Vec<AppEntry> = apps
        .iter()
        .filter(|a| !favorite_set.contains(a.id.as_str()) && !running.contains(&a.id))
        .map(annotate)
        .collect();
    others.sort_by_key(sort_key);

    ordered.extend(running_apps);
    ordered.extend(others);
    ordered
}
