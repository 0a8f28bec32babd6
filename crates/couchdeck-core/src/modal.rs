//! The overlay controller: grab, fades, input routing and auto-hide.
//!
//! All host signals arrive as [`LauncherEvent`]s through
//! [`ModalController::handle_event`]. The controller owns the view state
//! machine and the deferred work queue, so hiding can cancel everything that
//! is still pending in one place.

use crate::action::{ActionTarget, SettingKey, SubListKind};
use crate::config::Config;
use crate::grid_view::{ActivationOutcome, GridView};
use crate::input::{Key, KeyModifiers, Keymap, RawInput, Shortcut, classify_key};
use crate::layout::PadMode;
use crate::long_press::{LongPressDetector, Release};
use crate::menu_list::MenuMove;
use crate::scheduler::FrameScheduler;
use crate::services::{FeedbackGate, GrabToken, InputFeedback, InputGrab, Notifier};
use crate::view_state::{FocusRequest, FocusResult, ViewStateMachine};
use couchdeck_types::{ActivationModifiers, Direction, ModalPhase, NavEvent, ViewState};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Why the overlay is being hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideReason {
    /// Explicit dismissal; suppresses auto-show until the next show
    User,
    /// Apps started running
    AutoHide,
    AppLaunched,
}

/// Whether an input was consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Handled,
    Propagated,
}

impl InputOutcome {
    fn from_handled(handled: bool) -> Self {
        if handled {
            InputOutcome::Handled
        } else {
            InputOutcome::Propagated
        }
    }
}

/// Everything the host feeds into the controller
#[derive(Debug, Clone, PartialEq)]
pub enum LauncherEvent {
    Input(RawInput),
    /// A redraw is about to happen
    Frame,
    Tick(Instant),
    Resized { width: f64, height: f64 },
    InventoryChanged,
    RunningCountChanged(usize),
}

/// A live show: the grab if we got one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalSession {
    pub grab_token: Option<GrabToken>,
    /// Visible without an exclusive grab
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DeferredTask {
    Focus(FocusRequest),
}

pub struct ModalController {
    config: Config,
    keymap: Keymap,
    views: ViewStateMachine,
    phase: ModalPhase,
    fade_progress: u32,
    session: Option<ModalSession>,
    user_hidden: bool,
    running_count: usize,
    scheduler: FrameScheduler<DeferredTask>,
    long_press: LongPressDetector,
    feedback: Rc<FeedbackGate>,
    grab: Rc<dyn InputGrab>,
    notifier: Rc<dyn Notifier>,
}

impl ModalController {
    /// `grid` should share `feedback` so the sound toggle reaches it.
    pub fn new(
        config: Config,
        grid: GridView,
        feedback: Rc<FeedbackGate>,
        grab: Rc<dyn InputGrab>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        feedback.set_enabled(config.navigation.sound_feedback);
        let shared: Rc<dyn InputFeedback> = feedback.clone();
        let views = ViewStateMachine::new(grid, &config, shared);
        Self {
            keymap: Keymap::from_config(&config.keybindings),
            scheduler: FrameScheduler::new(config.navigation.focus_retry_limit),
            long_press: LongPressDetector::new(Duration::from_millis(
                config.navigation.long_press_ms,
            )),
            config,
            views,
            phase: ModalPhase::Hidden,
            fade_progress: 0,
            session: None,
            user_hidden: false,
            running_count: 0,
            feedback,
            grab,
            notifier,
        }
    }

    #[must_use]
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    #[must_use]
    pub fn session(&self) -> Option<ModalSession> {
        self.session
    }

    #[must_use]
    pub fn is_user_hidden(&self) -> bool {
        self.user_hidden
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn views(&self) -> &ViewStateMachine {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut ViewStateMachine {
        &mut self.views
    }

    #[must_use]
    pub fn grid(&self) -> &GridView {
        self.views.grid()
    }

    #[must_use]
    pub fn running_count(&self) -> usize {
        self.running_count
    }

    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    #[must_use]
    pub fn is_long_press_pending(&self) -> bool {
        self.long_press.is_pending()
    }

    /// Overlay opacity in `0.0..=1.0` for the current fade.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn opacity(&self) -> f64 {
        let frames = self.config.overlay.fade_frames.max(1) as f64;
        let progress = (self.fade_progress as f64 / frames).clamp(0.0, 1.0);
        match self.phase {
            ModalPhase::Hidden => 0.0,
            ModalPhase::Showing => progress,
            ModalPhase::Shown => 1.0,
            ModalPhase::Hiding => 1.0 - progress,
        }
    }

    pub fn show(&mut self) {
        if matches!(self.phase, ModalPhase::Showing | ModalPhase::Shown) {
            return;
        }
        if self.phase == ModalPhase::Hiding {
            // Fade-out interrupted, complete its teardown first
            self.finish_hide();
        }
        self.user_hidden = false;

        let session = match self.grab.acquire() {
            Ok(token) => ModalSession {
                grab_token: Some(token),
                degraded: false,
            },
            Err(e) => {
                warn!("Showing without exclusive input: {e}");
                self.notifier
                    .notify_error("Couldn't grab input", &e.to_string());
                ModalSession {
                    grab_token: None,
                    degraded: true,
                }
            }
        };
        self.session = Some(session);

        info!("Showing overlay");
        self.phase = ModalPhase::Showing;
        self.fade_progress = 0;
        if self.config.overlay.fade_frames == 0 {
            self.finish_show();
        }
    }

    fn finish_show(&mut self) {
        self.phase = ModalPhase::Shown;
        let anchor = self.views.anchor();
        self.request_focus(anchor);
    }

    pub fn hide(&mut self, reason: HideReason) {
        if matches!(self.phase, ModalPhase::Hidden | ModalPhase::Hiding) {
            return;
        }
        if reason == HideReason::User {
            self.user_hidden = true;
        }
        info!("Hiding overlay ({reason:?})");

        if let Some(token) = self.session.and_then(|s| s.grab_token) {
            self.grab.release(token);
        }
        self.session = None;
        self.scheduler.cancel_all();
        self.long_press.interrupt();
        self.views.grid_mut().cancel_pending_select();

        self.phase = ModalPhase::Hiding;
        self.fade_progress = 0;
        if self.config.overlay.fade_frames == 0 {
            self.finish_hide();
        }
    }

    fn finish_hide(&mut self) {
        self.phase = ModalPhase::Hidden;
        self.views.reset();
    }

    /// Running-app count changed: nonzero auto-hides, zero auto-shows unless
    /// the user dismissed the overlay.
    pub fn on_running_count_changed(&mut self, count: usize) {
        self.running_count = count;
        if !self.config.overlay.auto_hide_when_apps_running {
            return;
        }
        if count > 0 {
            if matches!(self.phase, ModalPhase::Showing | ModalPhase::Shown) {
                self.hide(HideReason::AutoHide);
            }
        } else if !matches!(self.phase, ModalPhase::Showing | ModalPhase::Shown)
            && !self.user_hidden
        {
            self.show();
        }
    }

    pub fn handle_event(&mut self, event: LauncherEvent) -> InputOutcome {
        match event {
            LauncherEvent::Input(raw) => return self.handle_input_at(raw, Instant::now()),
            LauncherEvent::Frame => self.on_frame(),
            LauncherEvent::Tick(now) => self.on_tick(now),
            LauncherEvent::Resized { width, height } => self.views.set_viewport(width, height),
            LauncherEvent::InventoryChanged => {
                self.views.grid_mut().reload();
            }
            LauncherEvent::RunningCountChanged(count) => self.on_running_count_changed(count),
        }
        InputOutcome::Handled
    }

    fn on_frame(&mut self) {
        match self.phase {
            ModalPhase::Showing => {
                self.fade_progress += 1;
                if self.fade_progress >= self.config.overlay.fade_frames {
                    self.finish_show();
                    return;
                }
            }
            ModalPhase::Hiding => {
                self.fade_progress += 1;
                if self.fade_progress >= self.config.overlay.fade_frames {
                    self.finish_hide();
                }
                return;
            }
            ModalPhase::Hidden => return,
            ModalPhase::Shown => {}
        }

        for due in self.scheduler.take_due() {
            let DeferredTask::Focus(request) = &due.task;
            if self.views.apply_focus(request) == FocusResult::NotReady {
                debug!("Focus target not mapped yet (attempt {})", due.attempt + 1);
                self.scheduler.retry(due);
            }
        }
    }

    fn on_tick(&mut self, now: Instant) {
        if let Some(id) = self.long_press.poll(now) {
            debug!("Long press on {id}");
            self.views.grid_mut().open_context_menu(&id);
        }
    }

    /// Focus now, or queue a retry for the following frames if the target
    /// is not placed yet.
    fn request_focus(&mut self, request: FocusRequest) {
        if self.views.apply_focus(&request) == FocusResult::NotReady {
            self.scheduler
                .schedule_before_next_frame(DeferredTask::Focus(request));
        }
    }

    pub fn handle_input(&mut self, raw: RawInput) -> InputOutcome {
        self.handle_input_at(raw, Instant::now())
    }

    pub fn handle_input_at(&mut self, raw: RawInput, now: Instant) -> InputOutcome {
        if self.phase != ModalPhase::Shown && self.phase != ModalPhase::Showing {
            if let RawInput::Key { key, modifiers } = raw
                && self.keymap.shortcut(key, modifiers) == Some(Shortcut::Home)
            {
                self.show();
                return InputOutcome::Handled;
            }
            return InputOutcome::Propagated;
        }

        match raw {
            RawInput::Key { key, modifiers } => {
                self.long_press.interrupt();
                self.handle_key(key, modifiers)
            }
            RawInput::PointerDown { x, y } => self.pointer_down(x, y, now),
            RawInput::PointerUp { x, y } => self.pointer_up(x, y),
            RawInput::Scroll { delta } => {
                self.long_press.interrupt();
                if self.views.state() == ViewState::Grid {
                    self.views.grid_mut().scroll_by(delta);
                    InputOutcome::Handled
                } else {
                    InputOutcome::Propagated
                }
            }
        }
    }

    fn handle_key(&mut self, key: Key, modifiers: KeyModifiers) -> InputOutcome {
        match self.keymap.shortcut(key, modifiers) {
            Some(Shortcut::Exit) => {
                self.hide(HideReason::User);
                return InputOutcome::Handled;
            }
            Some(Shortcut::Home) => {
                let request = self.views.reset();
                self.scheduler.cancel_all();
                self.request_focus(request);
                return InputOutcome::Handled;
            }
            None => {}
        }

        if key == Key::Menu {
            if self.views.state() == ViewState::Grid {
                self.open_settings();
            } else {
                self.go_back();
            }
            return InputOutcome::Handled;
        }

        match classify_key(key, modifiers) {
            Some(event) => self.handle_nav(event),
            None => InputOutcome::Propagated,
        }
    }

    fn pointer_down(&mut self, x: f64, y: f64, now: Instant) -> InputOutcome {
        if self.views.state() != ViewState::Grid {
            return InputOutcome::from_handled(self.hit_test(x, y).is_some());
        }
        match self.hit_test(x, y) {
            Some(id) => {
                self.long_press.pointer_down(&id, now);
                InputOutcome::Handled
            }
            None => InputOutcome::Propagated,
        }
    }

    fn pointer_up(&mut self, x: f64, y: f64) -> InputOutcome {
        let over = self.hit_test(x, y);
        if self.views.state() != ViewState::Grid {
            return match over {
                Some(id) => self.handle_nav(NavEvent::PointerActivate { id }),
                None => InputOutcome::Propagated,
            };
        }
        match self.long_press.pointer_up(over.as_deref()) {
            Release::Click(id) => self.handle_nav(NavEvent::PointerActivate { id }),
            Release::Consumed => InputOutcome::Handled,
            Release::Ignored => InputOutcome::Propagated,
        }
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<String> {
        match self.views.active_menu() {
            Some(menu) => menu.cell_at(x, y),
            None => self.views.grid().cell_at(x, y),
        }
        .map(str::to_string)
    }

    /// Route a semantic event to the visible view.
    pub fn handle_nav(&mut self, event: NavEvent) -> InputOutcome {
        match event {
            NavEvent::Back => {
                self.go_back();
                InputOutcome::Handled
            }
            NavEvent::Movement { direction } => self.handle_movement(direction),
            NavEvent::Select { modifiers } => {
                let action = match self.views.active_menu_mut() {
                    Some(menu) => menu.activate_focused(),
                    None => self.views.grid().focused_action(),
                };
                match action {
                    Some(action) => {
                        action.invoke(self, modifiers);
                        InputOutcome::Handled
                    }
                    None => InputOutcome::Propagated,
                }
            }
            NavEvent::PointerActivate { id } => {
                let action = match self.views.active_menu_mut() {
                    Some(menu) => {
                        if menu.try_focus(&id) {
                            menu.activate_focused()
                        } else {
                            None
                        }
                    }
                    None => {
                        let grid = self.views.grid_mut();
                        if grid.try_focus(&id) {
                            grid.focused_action()
                        } else {
                            None
                        }
                    }
                };
                match action {
                    Some(action) => {
                        action.invoke(self, ActivationModifiers::default());
                        InputOutcome::Handled
                    }
                    None => InputOutcome::Propagated,
                }
            }
        }
    }

    fn handle_movement(&mut self, direction: Direction) -> InputOutcome {
        match self.views.active_menu_mut().map(|menu| menu.handle_movement(direction)) {
            Some(MenuMove::Moved(_)) => InputOutcome::Handled,
            Some(MenuMove::Back) => {
                self.go_back();
                InputOutcome::Handled
            }
            Some(MenuMove::Propagate) => InputOutcome::Propagated,
            None => InputOutcome::from_handled(
                self.views.grid_mut().handle_movement(direction).is_handled(),
            ),
        }
    }

    fn apply_setting(&mut self, key: SettingKey) {
        match key {
            SettingKey::WrapNavigation => {
                self.config.navigation.wrap = !self.config.navigation.wrap;
                let wrap = self.config.navigation.wrap;
                self.views.grid_mut().set_wrap(wrap);
            }
            SettingKey::SoundFeedback => {
                self.config.navigation.sound_feedback = !self.config.navigation.sound_feedback;
                self.feedback
                    .set_enabled(self.config.navigation.sound_feedback);
            }
            SettingKey::PadWithSpacing => {
                self.config.layout.pad_mode = match self.config.layout.pad_mode {
                    PadMode::Spacing => PadMode::Padding,
                    PadMode::Padding => PadMode::Spacing,
                };
                let layout = self.config.layout.clone();
                self.views.grid_mut().set_layout_config(layout);
            }
            SettingKey::AutoHideWhenAppsRunning => {
                self.config.overlay.auto_hide_when_apps_running =
                    !self.config.overlay.auto_hide_when_apps_running;
            }
        }
        info!("Toggled {key:?}");
        self.views.refresh_menus(&self.config);
    }
}

impl ActionTarget for ModalController {
    fn launch_app(&mut self, app_id: &str, modifiers: ActivationModifiers) {
        match self.views.grid_mut().activate_by_id(app_id, modifiers) {
            ActivationOutcome::Activated(_) => self.hide(HideReason::AppLaunched),
            ActivationOutcome::Failed(message) => {
                self.notifier
                    .notify_error(&format!("Couldn't launch {app_id}"), &message);
            }
            ActivationOutcome::NotFound => {}
        }
    }

    fn open_settings(&mut self) {
        if let Some(request) = self.views.show_settings() {
            self.request_focus(request);
        }
    }

    fn open_sub_list(&mut self, kind: SubListKind) {
        let opener = self
            .views
            .settings()
            .focused_id()
            .map(str::to_string)
            .unwrap_or_default();
        if let Some(request) = self.views.open_sub_list(kind, &opener, &self.config) {
            self.request_focus(request);
        }
    }

    fn toggle_setting(&mut self, key: SettingKey) {
        self.apply_setting(key);
    }

    fn go_back(&mut self) {
        match self.views.back() {
            Some(request) => self.request_focus(request),
            None => self.hide(HideReason::User),
        }
    }

    fn hide_overlay(&mut self) {
        self.hide(HideReason::User);
    }
}

