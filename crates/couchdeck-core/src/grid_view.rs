//! The application grid: ordering, reload, layout, focus and activation.

use crate::action::Action;
use crate::collection::{Cell, FocusableCollection};
use crate::config::LayoutConfig;
use crate::layout::{GridGeometry, LayoutParams, compute_layout, content_height, place};
use crate::navigator::{Navigation, next_index};
use crate::reconcile::{dedup_by_id, reconcile};
use crate::services::{Activator, AppInventory, InputFeedback, InventorySnapshot, order_apps};
use couchdeck_types::{ActivationModifiers, AppEntry, Direction};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

/// Result of [`GridView::select_by_id`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Focused,
    /// The cell exists but has not been placed yet
    DeferredUntilMapped,
    /// No such cell; try once more after the next reload
    DeferredUntilReload,
}

/// Result of activating a grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    Activated(String),
    Failed(String),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingSelect {
    AwaitingReload(String),
    AwaitingMap(String),
}

/// Counts reported by a completed reload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReloadSummary {
    pub added: usize,
    pub removed: usize,
    pub duplicates: usize,
}

pub struct GridView {
    collection: FocusableCollection,
    entries: HashMap<String, AppEntry>,
    layout: LayoutConfig,
    geometry: GridGeometry,
    viewport: (f64, f64),
    scroll_offset: f64,
    wrap: bool,
    reload_in_flight: bool,
    pending_select: Option<PendingSelect>,
    inventory: Rc<dyn AppInventory>,
    activator: Rc<dyn Activator>,
    feedback: Rc<dyn InputFeedback>,
}

impl GridView {
    pub fn new(
        layout: LayoutConfig,
        wrap: bool,
        inventory: Rc<dyn AppInventory>,
        activator: Rc<dyn Activator>,
        feedback: Rc<dyn InputFeedback>,
    ) -> Self {
        Self {
            collection: FocusableCollection::new(),
            entries: HashMap::new(),
            layout,
            geometry: GridGeometry::default(),
            viewport: (0.0, 0.0),
            scroll_offset: 0.0,
            wrap,
            reload_in_flight: false,
            pending_select: None,
            inventory,
            activator,
            feedback,
        }
    }

    #[must_use]
    pub fn collection(&self) -> &FocusableCollection {
        &self.collection
    }

    #[must_use]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&AppEntry> {
        self.entries.get(id)
    }

    #[must_use]
    pub fn focused_id(&self) -> Option<&str> {
        self.collection.focused_id()
    }

    #[must_use]
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: bool) {
        self.wrap = wrap;
    }

    #[must_use]
    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn set_layout_config(&mut self, layout: LayoutConfig) {
        self.layout = layout;
        self.relayout();
    }

    #[must_use]
    pub fn is_reload_in_flight(&self) -> bool {
        self.reload_in_flight
    }

    #[must_use]
    pub fn has_pending_select(&self) -> bool {
        self.pending_select.is_some()
    }

    pub fn cancel_pending_select(&mut self) {
        if let Some(pending) = self.pending_select.take() {
            debug!("Dropping pending grid selection {pending:?}");
        }
    }

    /// Claim the reload slot. Returns false (and drops the request) while a
    /// reload is already in flight.
    ///
    /// Hosts that fetch the inventory off the UI thread call this before the
    /// fetch and [`Self::complete_reload`] once the snapshot arrives.
    /// [`Self::reload`] does both in one go.
    pub fn request_reload(&mut self) -> bool {
        if self.reload_in_flight {
            debug!("Reload already in flight, dropping request");
            return false;
        }
        self.reload_in_flight = true;
        true
    }

    /// Apply a fetched inventory snapshot and release the reload slot.
    pub fn complete_reload(&mut self, snapshot: &InventorySnapshot) -> ReloadSummary {
        let (apps, duplicates) = dedup_by_id(snapshot.apps.clone());
        let ordered = order_apps(&apps, &snapshot.favorites, &snapshot.running);

        let plan = reconcile(&self.collection.ids(), ordered.clone());
        let summary = ReloadSummary {
            added: plan.additions.len(),
            removed: plan.removals.len(),
            duplicates: duplicates.len(),
        };

        for id in &plan.removals {
            self.entries.remove(id);
        }

        // Survivors keep their cell; only presentation is refreshed
        for entry in &ordered {
            self.collection.update(&entry.id, |cell| {
                cell.label.clone_from(&entry.display_name);
                cell.icon.clone_from(&entry.icon);
                cell.badge = entry.is_running();
            });
        }

        self.collection.apply(plan, |entry| make_cell(&entry));
        self.entries = ordered.into_iter().map(|e| (e.id.clone(), e)).collect();
        self.reload_in_flight = false;

        if summary.added > 0 || summary.removed > 0 {
            info!(
                "Grid reloaded: {} added, {} removed, {} total",
                summary.added,
                summary.removed,
                self.collection.len()
            );
        }

        self.relayout();
        self.resolve_pending_after_reload();
        summary
    }

    /// Synchronous reload against the injected inventory.
    pub fn reload(&mut self) -> Option<ReloadSummary> {
        if !self.request_reload() {
            return None;
        }
        let snapshot = self.inventory.snapshot();
        Some(self.complete_reload(&snapshot))
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
        self.relayout();
    }

    fn relayout(&mut self) {
        let (width, height) = self.viewport;
        self.geometry = compute_layout(&LayoutParams::from_config(&self.layout, width, height));

        // An empty geometry unmaps every cell
        for index in 0..self.collection.len() {
            self.collection.set_bounds(index, place(&self.geometry, index));
        }

        self.clamp_scroll();
        self.resolve_pending_after_map();
    }

    fn resolve_pending_after_map(&mut self) {
        let Some(PendingSelect::AwaitingMap(id)) = &self.pending_select else {
            return;
        };
        let id = id.clone();
        match self.collection.get(&id) {
            Some(cell) if cell.is_mapped() => {
                self.pending_select = None;
                self.focus_and_reveal(&id);
            }
            Some(_) => {}
            None => {
                debug!("Pending selection {id} vanished before it was mapped");
                self.pending_select = None;
            }
        }
    }

    fn resolve_pending_after_reload(&mut self) {
        let Some(PendingSelect::AwaitingReload(id)) = self.pending_select.take() else {
            return;
        };
        if self.select_by_id(&id) == SelectOutcome::DeferredUntilReload {
            warn!("App {id} still missing after reload, giving up on selecting it");
            self.pending_select = None;
        }
    }

    /// Focus `id` now if it is placed, otherwise remember it for the next
    /// layout pass or reload. Only the latest request is remembered.
    pub fn select_by_id(&mut self, id: &str) -> SelectOutcome {
        match self.collection.get(id) {
            Some(cell) if cell.is_mapped() => {
                self.pending_select = None;
                self.focus_and_reveal(id);
                SelectOutcome::Focused
            }
            Some(_) => {
                self.pending_select = Some(PendingSelect::AwaitingMap(id.to_string()));
                SelectOutcome::DeferredUntilMapped
            }
            None => {
                self.pending_select = Some(PendingSelect::AwaitingReload(id.to_string()));
                SelectOutcome::DeferredUntilReload
            }
        }
    }

    /// Focus a placed cell. Fails if the cell is missing or not yet mapped.
    pub fn try_focus(&mut self, id: &str) -> bool {
        match self.collection.get(id) {
            Some(cell) if cell.is_mapped() => {
                self.focus_and_reveal(id);
                true
            }
            _ => false,
        }
    }

    /// Focus the first cell, if it is placed.
    pub fn try_focus_first(&mut self) -> bool {
        match self.collection.at(0).map(|c| c.id.clone()) {
            Some(id) => self.try_focus(&id),
            None => false,
        }
    }

    fn focus_and_reveal(&mut self, id: &str) {
        if self.collection.focus(id) {
            self.scroll_into_view(id);
        }
    }

    /// Move focus in `direction`. Returns what the navigator decided; a
    /// `Propagate` result leaves focus untouched.
    pub fn handle_movement(&mut self, direction: Direction) -> Navigation {
        let count = self.collection.len();
        let navigation = match self.collection.focused_index() {
            Some(current) => {
                next_index(current, direction, self.geometry.columns, count, self.wrap)
            }
            None if count > 0 && self.geometry.columns > 0 => Navigation::FocusFirst,
            None => Navigation::Propagate,
        };

        if let Some(target) = navigation.target()
            && let Some(id) = self.collection.at(target).map(|c| c.id.clone())
        {
            self.focus_and_reveal(&id);
            self.feedback.on_focus_moved();
        }
        navigation
    }

    pub fn activate_focused(&mut self, modifiers: ActivationModifiers) -> ActivationOutcome {
        match self.collection.focused_id().map(str::to_string) {
            Some(id) => self.activate_by_id(&id, modifiers),
            None => ActivationOutcome::NotFound,
        }
    }

    /// Hand the app to the activator. Failures are logged and reported, never
    /// propagated.
    pub fn activate_by_id(&mut self, id: &str, modifiers: ActivationModifiers) -> ActivationOutcome {
        let Some(entry) = self.entries.get(id) else {
            warn!("Activation requested for unknown app {id}");
            return ActivationOutcome::NotFound;
        };

        self.feedback.on_item_activated();
        match self.activator.activate(entry, modifiers) {
            Ok(()) => {
                info!("Activated {id} (new window: {})", modifiers.new_window);
                ActivationOutcome::Activated(id.to_string())
            }
            Err(e) => {
                error!("Failed to activate {id}: {e}");
                ActivationOutcome::Failed(e.to_string())
            }
        }
    }

    /// Secondary action for a long press. Returns false if it failed.
    pub fn open_context_menu(&mut self, id: &str) -> bool {
        let Some(entry) = self.entries.get(id) else {
            return false;
        };
        match self.activator.open_context_menu(entry) {
            Ok(()) => true,
            Err(e) => {
                error!("Context action for {id} failed: {e}");
                false
            }
        }
    }

    /// Adjust the scroll offset so the cell's box (plus row padding) is
    /// inside the viewport.
    pub fn scroll_into_view(&mut self, id: &str) {
        let Some(bounds) = self.collection.get(id).and_then(Cell::bounds) else {
            return;
        };
        let height = self.viewport.1;
        let top = bounds.y1 - self.geometry.top_padding;
        let bottom = bounds.y2 + self.geometry.bottom_padding;

        if top < self.scroll_offset {
            self.scroll_offset = top;
        } else if bottom > self.scroll_offset + height {
            self.scroll_offset = bottom - height;
        }
        self.clamp_scroll();
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_offset += delta;
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let max = (content_height(&self.geometry, self.collection.len()) - self.viewport.1).max(0.0);
        self.scroll_offset = self.scroll_offset.clamp(0.0, max);
    }

    /// Id of the cell under a viewport point, accounting for scroll.
    #[must_use]
    pub fn cell_at(&self, x: f64, y: f64) -> Option<&str> {
        let y = y + self.scroll_offset;
        self.collection
            .iter()
            .find(|cell| cell.bounds().is_some_and(|b| b.contains(x, y)))
            .map(|cell| cell.id.as_str())
    }

    /// Action of the focused cell.
    #[must_use]
    pub fn focused_action(&self) -> Option<Action> {
        self.collection.focused().map(|c| c.action.clone())
    }
}

fn make_cell(entry: &AppEntry) -> Cell {
    Cell::new(
        entry.id.clone(),
        entry.display_name.clone(),
        Action::LaunchApp {
            app_id: entry.id.clone(),
        },
    )
    .with_icon(entry.icon.clone())
    .with_badge(entry.is_running())
}
