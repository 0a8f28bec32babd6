//! Ordered, id-keyed container of focusable cells.

use crate::action::Action;
use crate::reconcile::{Identified, Reconciliation, reorder_survivors};
use couchdeck_types::CellBox;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// One focusable unit in a grid or list
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: String,
    pub label: String,
    pub icon: Option<String>,
    pub action: Action,
    /// Marks running apps in the grid
    pub badge: bool,
    selected: bool,
    bounds: Option<CellBox>,
}

impl Cell {
    pub fn new(id: impl Into<String>, label: impl Into<String>, action: Action) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            action,
            badge: false,
            selected: false,
            bounds: None,
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    #[must_use]
    pub fn with_badge(mut self, badge: bool) -> Self {
        self.badge = badge;
        self
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    #[must_use]
    pub fn bounds(&self) -> Option<CellBox> {
        self.bounds
    }

    /// A cell is mapped once a layout pass has placed it.
    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.bounds.is_some()
    }
}

impl Identified for Cell {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Ordered cells plus an id index for O(1) lookup.
///
/// Order is meaningful (it determines spatial layout) and contiguous; ids
/// are unique. At most one cell is selected and it is always the focused one.
#[derive(Debug, Clone, Default)]
pub struct FocusableCollection {
    cells: Vec<Cell>,
    positions: HashMap<String, usize>,
    focused: Option<String>,
}

impl FocusableCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.id.clone()).collect()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Cell> {
        self.position(id).map(|i| &self.cells[i])
    }

    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Insert at `index` (clamped to the end). Rejects duplicate ids.
    pub fn insert(&mut self, index: usize, cell: Cell) -> bool {
        if self.contains(&cell.id) {
            warn!("Refusing to insert duplicate cell id: {}", cell.id);
            return false;
        }
        let index = index.min(self.cells.len());
        self.cells.insert(index, cell);
        self.reindex();
        true
    }

    pub fn push(&mut self, cell: Cell) -> bool {
        let end = self.cells.len();
        self.insert(end, cell)
    }

    /// Remove a cell. If it held focus, focus moves to the first surviving
    /// cell before the cell is dropped.
    pub fn remove(&mut self, id: &str) -> Option<Cell> {
        let index = self.position(id)?;
        if self.focused.as_deref() == Some(id) {
            let fallback = self
                .cells
                .iter()
                .find(|c| c.id != id)
                .map(|c| c.id.clone());
            self.set_focus_inner(fallback);
        }
        let cell = self.cells.remove(index);
        self.reindex();
        Some(cell)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.positions.clear();
        self.focused = None;
    }

    #[must_use]
    pub fn focused_id(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    #[must_use]
    pub fn focused_index(&self) -> Option<usize> {
        self.focused.as_deref().and_then(|id| self.position(id))
    }

    #[must_use]
    pub fn focused(&self) -> Option<&Cell> {
        self.focused_index().map(|i| &self.cells[i])
    }

    /// Focus a cell by id. Returns false if no such cell exists.
    pub fn focus(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.set_focus_inner(Some(id.to_string()));
        true
    }

    pub fn focus_index(&mut self, index: usize) -> bool {
        match self.cells.get(index) {
            Some(cell) => {
                let id = cell.id.clone();
                self.set_focus_inner(Some(id));
                true
            }
            None => false,
        }
    }

    pub fn clear_focus(&mut self) {
        self.set_focus_inner(None);
    }

    fn set_focus_inner(&mut self, id: Option<String>) {
        if let Some(old) = self.focused.take()
            && let Some(&i) = self.positions.get(&old)
        {
            self.cells[i].selected = false;
        }
        if let Some(new) = &id
            && let Some(&i) = self.positions.get(new)
        {
            self.cells[i].selected = true;
        }
        self.focused = id;
    }

    pub fn set_bounds(&mut self, index: usize, bounds: Option<CellBox>) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.bounds = bounds;
        }
    }

    /// Mutate a cell in place. The closure must not change the cell's id.
    pub fn update<F: FnOnce(&mut Cell)>(&mut self, id: &str, f: F) {
        if let Some(i) = self.position(id) {
            let cell = &mut self.cells[i];
            f(cell);
        }
    }

    /// Reorder survivors to match the relative order in `target`.
    pub fn reorder(&mut self, target: &[String]) {
        let mut ids = self.ids();
        reorder_survivors(&mut ids, target);
        let mut by_id: HashMap<String, Cell> =
            self.cells.drain(..).map(|c| (c.id.clone(), c)).collect();
        self.cells = ids.iter().filter_map(|id| by_id.remove(id)).collect();
        self.reindex();
    }

    /// Apply a reconciliation: removals first (handing focus off a removed
    /// cell before it is dropped), then survivors are repositioned, then
    /// additions are inserted in ascending index order.
    pub fn apply<T, F>(&mut self, reconciliation: Reconciliation<T>, mut make_cell: F)
    where
        F: FnMut(T) -> Cell,
    {
        let removed: HashSet<&str> = reconciliation.removals.iter().map(String::as_str).collect();
        let mut focus_lost = false;

        if let Some(focused) = self.focused.clone()
            && removed.contains(focused.as_str())
        {
            let fallback = self
                .cells
                .iter()
                .find(|c| !removed.contains(c.id.as_str()))
                .map(|c| c.id.clone());
            debug!("Focused cell {focused} removed, handing focus to {fallback:?}");
            focus_lost = fallback.is_none();
            self.set_focus_inner(fallback);
        }

        self.cells.retain(|c| !removed.contains(c.id.as_str()));
        self.reindex();
        self.reorder(&reconciliation.target_order);

        for (item, index) in reconciliation.additions {
            let cell = make_cell(item);
            self.insert(index, cell);
        }

        if focus_lost && !self.cells.is_empty() {
            self.focus_index(0);
        }
    }

    fn reindex(&mut self) {
        self.positions.clear();
        for (i, cell) in self.cells.iter().enumerate() {
            self.positions.insert(cell.id.clone(), i);
        }
    }
}
