//! Single-column menus: the settings list and its sub-lists.

use crate::action::{Action, SettingKey, SubListKind};
use crate::collection::{Cell, FocusableCollection};
use crate::config::Config;
use crate::layout::PadMode;
use crate::navigator::{Navigation, next_in_list};
use crate::services::InputFeedback;
use couchdeck_types::{CellBox, Direction};
use std::rc::Rc;

/// Height of one menu row in viewport units
pub const DEFAULT_ROW_HEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    Settings,
    Sub(SubListKind),
}

impl MenuKind {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            MenuKind::Settings => "Settings",
            MenuKind::Sub(kind) => kind.title(),
        }
    }
}

/// Result of a movement inside a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuMove {
    Moved(usize),
    /// Down past the end of a sub-list
    Back,
    Propagate,
}

pub struct MenuListView {
    kind: MenuKind,
    collection: FocusableCollection,
    row_height: f64,
    feedback: Rc<dyn InputFeedback>,
}

impl MenuListView {
    pub fn new(kind: MenuKind, config: &Config, feedback: Rc<dyn InputFeedback>) -> Self {
        let mut collection = FocusableCollection::new();
        for cell in menu_items(kind, config) {
            collection.push(cell);
        }
        Self {
            kind,
            collection,
            row_height: DEFAULT_ROW_HEIGHT,
            feedback,
        }
    }

    #[must_use]
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    #[must_use]
    pub fn kind(&self) -> MenuKind {
        self.kind
    }

    #[must_use]
    pub fn collection(&self) -> &FocusableCollection {
        &self.collection
    }

    #[must_use]
    pub fn focused_id(&self) -> Option<&str> {
        self.collection.focused_id()
    }

    /// Place rows top to bottom. A non-positive width unplaces every row.
    #[allow(clippy::cast_precision_loss)]
    pub fn set_viewport(&mut self, width: f64, _height: f64) {
        if width <= 0.0 {
            for index in 0..self.collection.len() {
                self.collection.set_bounds(index, None);
            }
            return;
        }
        for index in 0..self.collection.len() {
            let y1 = index as f64 * self.row_height;
            self.collection
                .set_bounds(index, Some(CellBox::new(0.0, y1, width, y1 + self.row_height)));
        }
    }

    /// Focus a placed row. Fails if the row is missing or unplaced.
    pub fn try_focus(&mut self, id: &str) -> bool {
        match self.collection.get(id) {
            Some(cell) if cell.is_mapped() => self.collection.focus(id),
            _ => false,
        }
    }

    pub fn try_focus_first(&mut self) -> bool {
        match self.collection.at(0).map(|c| c.id.clone()) {
            Some(id) => self.try_focus(&id),
            None => false,
        }
    }

    pub fn handle_movement(&mut self, direction: Direction) -> MenuMove {
        let count = self.collection.len();
        let navigation = match self.collection.focused_index() {
            Some(current) => next_in_list(current, direction, count),
            None if count > 0 => Navigation::FocusFirst,
            None => Navigation::Propagate,
        };

        if let Some(target) = navigation.target() {
            if !self.collection.at(target).is_some_and(Cell::is_mapped) {
                return MenuMove::Propagate;
            }
            self.collection.focus_index(target);
            self.feedback.on_focus_moved();
            return MenuMove::Moved(target);
        }

        let past_end = matches!(direction, Direction::Down | Direction::TabForward)
            && self.collection.focused_index() == count.checked_sub(1);
        if matches!(self.kind, MenuKind::Sub(_)) && past_end {
            MenuMove::Back
        } else {
            MenuMove::Propagate
        }
    }

    /// Action of the focused row, signalling activation feedback.
    pub fn activate_focused(&mut self) -> Option<Action> {
        let action = self.collection.focused().map(|c| c.action.clone())?;
        self.feedback.on_item_activated();
        Some(action)
    }

    #[must_use]
    pub fn cell_at(&self, x: f64, y: f64) -> Option<&str> {
        self.collection
            .iter()
            .find(|cell| cell.bounds().is_some_and(|b| b.contains(x, y)))
            .map(|cell| cell.id.as_str())
    }

    /// Rewrite toggle labels after a setting changed.
    pub fn refresh_labels(&mut self, config: &Config) {
        for fresh in menu_items(self.kind, config) {
            self.collection.update(&fresh.id, |cell| cell.label = fresh.label.clone());
        }
    }

    #[must_use]
    pub fn focused_action(&self) -> Option<Action> {
        self.collection.focused().map(|c| c.action.clone())
    }
}

fn toggle_label(name: &str, on: bool) -> String {
    format!("{name}: {}", if on { "on" } else { "off" })
}

/// Rows for a menu, with toggle labels reflecting `config`.
#[must_use]
pub fn menu_items(kind: MenuKind, config: &Config) -> Vec<Cell> {
    match kind {
        MenuKind::Settings => vec![
            Cell::new(
                "settings.layout",
                SubListKind::Layout.title(),
                Action::OpenSubList(SubListKind::Layout),
            ),
            Cell::new(
                "settings.navigation",
                SubListKind::Navigation.title(),
                Action::OpenSubList(SubListKind::Navigation),
            ),
            Cell::new("settings.close", "Close launcher", Action::HideOverlay),
        ],
        MenuKind::Sub(SubListKind::Layout) => vec![
            Cell::new(
                "layout.pad_with_spacing",
                toggle_label(
                    "Pad with spacing",
                    config.layout.pad_mode == PadMode::Spacing,
                ),
                Action::ToggleSetting(SettingKey::PadWithSpacing),
            ),
            Cell::new(
                "layout.auto_hide",
                toggle_label(
                    "Hide while apps run",
                    config.overlay.auto_hide_when_apps_running,
                ),
                Action::ToggleSetting(SettingKey::AutoHideWhenAppsRunning),
            ),
            Cell::new("layout.back", "Back", Action::Back),
        ],
        MenuKind::Sub(SubListKind::Navigation) => vec![
            Cell::new(
                "navigation.wrap",
                toggle_label("Wrap around edges", config.navigation.wrap),
                Action::ToggleSetting(SettingKey::WrapNavigation),
            ),
            Cell::new(
                "navigation.sound",
                toggle_label("Sound feedback", config.navigation.sound_feedback),
                Action::ToggleSetting(SettingKey::SoundFeedback),
            ),
            Cell::new("navigation.back", "Back", Action::Back),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::SilentFeedback;

    fn menu(kind: MenuKind) -> MenuListView {
        let mut menu = MenuListView::new(kind, &Config::default(), Rc::new(SilentFeedback));
        menu.set_viewport(40.0, 10.0);
        menu
    }

    #[test]
    fn test_list_does_not_wrap() {
        let mut settings = menu(MenuKind::Settings);
        assert!(settings.try_focus_first());

        assert_eq!(settings.handle_movement(Direction::Up), MenuMove::Propagate);
        assert_eq!(settings.handle_movement(Direction::Down), MenuMove::Moved(1));
        assert_eq!(settings.handle_movement(Direction::Down), MenuMove::Moved(2));
        assert_eq!(settings.handle_movement(Direction::Down), MenuMove::Propagate);
        assert_eq!(settings.handle_movement(Direction::Left), MenuMove::Propagate);
    }

    #[test]
    fn test_sub_list_down_past_end_goes_back() {
        let mut sub = menu(MenuKind::Sub(SubListKind::Navigation));
        assert!(sub.try_focus("navigation.back"));
        assert_eq!(sub.handle_movement(Direction::Down), MenuMove::Back);
    }

    #[test]
    fn test_unplaced_rows_cannot_take_focus() {
        let mut sub = MenuListView::new(
            MenuKind::Sub(SubListKind::Layout),
            &Config::default(),
            Rc::new(SilentFeedback),
        );
        assert!(!sub.try_focus_first());
        sub.set_viewport(20.0, 5.0);
        assert!(sub.try_focus_first());
    }

    #[test]
    fn test_movement_skips_unplaced_rows() {
        let mut unplaced = MenuListView::new(
            MenuKind::Settings,
            &Config::default(),
            Rc::new(SilentFeedback),
        );
        assert_eq!(unplaced.handle_movement(Direction::Down), MenuMove::Propagate);
        assert_eq!(unplaced.focused_id(), None);

        let mut sub = menu(MenuKind::Sub(SubListKind::Layout));
        assert!(sub.try_focus_first());
        let first = sub.focused_id().map(str::to_string);

        sub.set_viewport(0.0, 5.0);
        assert!(sub.collection().iter().all(|c| !c.is_mapped()));
        assert_eq!(sub.handle_movement(Direction::Down), MenuMove::Propagate);
        assert_eq!(sub.focused_id().map(str::to_string), first);
    }

    #[test]
    fn test_refresh_labels_reflects_toggle() {
        let mut config = Config::default();
        let mut sub = MenuListView::new(
            MenuKind::Sub(SubListKind::Navigation),
            &config,
            Rc::new(SilentFeedback),
        );
        assert_eq!(
            sub.collection().get("navigation.wrap").unwrap().label,
            "Wrap around edges: on"
        );

        config.navigation.wrap = false;
        sub.refresh_labels(&config);
        assert_eq!(
            sub.collection().get("navigation.wrap").unwrap().label,
            "Wrap around edges: off"
        );
    }

    #[test]
    fn test_cell_at_hits_rows() {
        let settings = menu(MenuKind::Settings);
        assert_eq!(settings.cell_at(3.0, 1.5), Some("settings.navigation"));
        assert_eq!(settings.cell_at(3.0, 7.0), None);
    }
}
