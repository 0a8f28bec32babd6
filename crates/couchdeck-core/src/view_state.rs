//! Exclusive visibility of the grid, the settings list and one sub-list.
//!
//! Every transition hands back a [`FocusRequest`] naming the anchor that
//! should take focus in the newly visible view. The caller resolves it with
//! [`ViewStateMachine::apply_focus`], retrying on later frames while the
//! target is not yet placed.

use crate::action::SubListKind;
use crate::config::Config;
use crate::grid_view::GridView;
use crate::menu_list::{MenuKind, MenuListView};
use crate::services::InputFeedback;
use couchdeck_types::ViewState;
use std::rc::Rc;
use tracing::debug;

/// Which view should take focus, and on what
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRequest {
    pub view: ViewState,
    /// `None` focuses the first cell
    pub target: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusResult {
    Focused,
    /// Target exists but is not placed yet; try again next frame
    NotReady,
    /// Nothing to focus (empty view, or the view is no longer visible)
    Nothing,
}

struct SubList {
    view: MenuListView,
    opener: String,
}

pub struct ViewStateMachine {
    state: ViewState,
    grid: GridView,
    settings: MenuListView,
    sub_list: Option<SubList>,
    remembered_grid_focus: Option<String>,
    viewport: (f64, f64),
    feedback: Rc<dyn InputFeedback>,
}

impl ViewStateMachine {
    pub fn new(grid: GridView, config: &Config, feedback: Rc<dyn InputFeedback>) -> Self {
        let settings = MenuListView::new(MenuKind::Settings, config, Rc::clone(&feedback));
        Self {
            state: ViewState::Grid,
            grid,
            settings,
            sub_list: None,
            remembered_grid_focus: None,
            viewport: (0.0, 0.0),
            feedback,
        }
    }

    #[must_use]
    pub fn state(&self) -> ViewState {
        self.state
    }

    #[must_use]
    pub fn grid(&self) -> &GridView {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridView {
        &mut self.grid
    }

    #[must_use]
    pub fn settings(&self) -> &MenuListView {
        &self.settings
    }

    #[must_use]
    pub fn sub_list(&self) -> Option<&MenuListView> {
        self.sub_list.as_ref().map(|s| &s.view)
    }

    /// The visible menu, if a menu is visible.
    #[must_use]
    pub fn active_menu(&self) -> Option<&MenuListView> {
        match self.state {
            ViewState::Grid => None,
            ViewState::SettingsList => Some(&self.settings),
            ViewState::SubList => self.sub_list(),
        }
    }

    pub fn active_menu_mut(&mut self) -> Option<&mut MenuListView> {
        match self.state {
            ViewState::Grid => None,
            ViewState::SettingsList => Some(&mut self.settings),
            ViewState::SubList => self.sub_list.as_mut().map(|s| &mut s.view),
        }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
        self.grid.set_viewport(width, height);
        self.settings.set_viewport(width, height);
        if let Some(sub) = &mut self.sub_list {
            sub.view.set_viewport(width, height);
        }
    }

    /// Anchor for the currently visible view.
    #[must_use]
    pub fn anchor(&self) -> FocusRequest {
        let target = match self.state {
            ViewState::Grid => self
                .grid
                .focused_id()
                .map(str::to_string)
                .or_else(|| self.remembered_grid_focus.clone()),
            ViewState::SettingsList => self.settings.focused_id().map(str::to_string),
            ViewState::SubList => self
                .sub_list()
                .and_then(MenuListView::focused_id)
                .map(str::to_string),
        };
        FocusRequest {
            view: self.state,
            target,
        }
    }

    /// Grid → settings list. No-op from any other state.
    pub fn show_settings(&mut self) -> Option<FocusRequest> {
        if self.state != ViewState::Grid {
            return None;
        }
        self.remembered_grid_focus = self.grid.focused_id().map(str::to_string);
        self.state = ViewState::SettingsList;
        debug!("View: grid -> settings");
        Some(FocusRequest {
            view: ViewState::SettingsList,
            target: None,
        })
    }

    /// Settings list → sub-list. `opener` is the settings row to return to.
    pub fn open_sub_list(
        &mut self,
        kind: SubListKind,
        opener: &str,
        config: &Config,
    ) -> Option<FocusRequest> {
        if self.state != ViewState::SettingsList {
            return None;
        }
        let mut view = MenuListView::new(MenuKind::Sub(kind), config, Rc::clone(&self.feedback));
        view.set_viewport(self.viewport.0, self.viewport.1);
        self.sub_list = Some(SubList {
            view,
            opener: opener.to_string(),
        });
        self.state = ViewState::SubList;
        debug!("View: settings -> {}", kind.title());
        Some(FocusRequest {
            view: ViewState::SubList,
            target: None,
        })
    }

    /// One level up. Returns `None` when already on the grid.
    pub fn back(&mut self) -> Option<FocusRequest> {
        match self.state {
            ViewState::Grid => None,
            ViewState::SubList => {
                let opener = self.sub_list.take().map(|s| s.opener);
                self.state = ViewState::SettingsList;
                debug!("View: sub-list -> settings");
                Some(FocusRequest {
                    view: ViewState::SettingsList,
                    target: opener,
                })
            }
            ViewState::SettingsList => {
                self.state = ViewState::Grid;
                debug!("View: settings -> grid");
                Some(FocusRequest {
                    view: ViewState::Grid,
                    target: self.remembered_grid_focus.take(),
                })
            }
        }
    }

    /// Straight back to the grid from anywhere.
    pub fn reset(&mut self) -> FocusRequest {
        self.sub_list = None;
        if self.state != ViewState::Grid {
            debug!("View: reset to grid");
        }
        self.state = ViewState::Grid;
        let target = self
            .remembered_grid_focus
            .take()
            .or_else(|| self.grid.focused_id().map(str::to_string));
        FocusRequest {
            view: ViewState::Grid,
            target,
        }
    }

    /// Resolve a focus request against the views. Requests for a view that
    /// is no longer visible resolve to [`FocusResult::Nothing`].
    pub fn apply_focus(&mut self, request: &FocusRequest) -> FocusResult {
        if request.view != self.state {
            return FocusResult::Nothing;
        }

        match self.state {
            ViewState::Grid => {
                if self.grid.collection().is_empty() {
                    return FocusResult::Nothing;
                }
                let focused = match &request.target {
                    Some(id) if self.grid.collection().contains(id) => self.grid.try_focus(id),
                    _ => self.grid.try_focus_first(),
                };
                if focused {
                    FocusResult::Focused
                } else {
                    FocusResult::NotReady
                }
            }
            ViewState::SettingsList | ViewState::SubList => {
                let Some(menu) = self.active_menu_mut() else {
                    return FocusResult::Nothing;
                };
                if menu.collection().is_empty() {
                    return FocusResult::Nothing;
                }
                let focused = match &request.target {
                    Some(id) if menu.collection().contains(id) => menu.try_focus(id),
                    _ => menu.try_focus_first(),
                };
                if focused {
                    FocusResult::Focused
                } else {
                    FocusResult::NotReady
                }
            }
        }
    }

    /// Refresh toggle labels in the settings menus.
    pub fn refresh_menus(&mut self, config: &Config) {
        self.settings.refresh_labels(config);
        if let Some(sub) = &mut self.sub_list {
            sub.view.refresh_labels(config);
        }
    }
}
