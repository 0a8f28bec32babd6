//! Tests for the overlay controller

use super::fixtures::{THREE_COLUMNS, controller_with};
use crate::action::{ActionTarget, SettingKey};
use crate::input::{Key, KeyModifiers, RawInput};
use crate::layout::PadMode;
use crate::modal::{HideReason, InputOutcome, LauncherEvent};
use couchdeck_types::{ModalPhase, ViewState};
use std::time::{Duration, Instant};

fn ctrl(c: char) -> RawInput {
    RawInput::Key {
        key: Key::Char(c),
        modifiers: KeyModifiers {
            ctrl: true,
            ..KeyModifiers::NONE
        },
    }
}

fn resize(width: f64, height: f64) -> LauncherEvent {
    LauncherEvent::Resized { width, height }
}

#[test]
fn test_show_focuses_anchor_once_laid_out() {
    let mut h = controller_with(&["a", "b"], |_| {});
    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.show();

    assert_eq!(h.controller.phase(), ModalPhase::Shown);
    assert_eq!(h.controller.grid().focused_id(), Some("a"));
    assert_eq!(h.controller.pending_tasks(), 0);
    assert!(!h.controller.session().unwrap().degraded);
}

#[test]
fn test_focus_retried_until_mapped() {
    let mut h = controller_with(&["a", "b"], |_| {});
    h.controller.show();
    assert_eq!(h.controller.grid().focused_id(), None);
    assert_eq!(h.controller.pending_tasks(), 1);

    h.controller.handle_event(LauncherEvent::Frame);
    assert_eq!(h.controller.pending_tasks(), 1);

    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.handle_event(LauncherEvent::Frame);
    assert_eq!(h.controller.grid().focused_id(), Some("a"));
    assert_eq!(h.controller.pending_tasks(), 0);
}

#[test]
fn test_focus_retry_is_capped() {
    let mut h = controller_with(&["a"], |config| config.navigation.focus_retry_limit = 3);
    h.controller.show();

    for _ in 0..10 {
        h.controller.handle_event(LauncherEvent::Frame);
    }
    assert_eq!(h.controller.pending_tasks(), 0);

    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.handle_event(LauncherEvent::Frame);
    assert_eq!(h.controller.grid().focused_id(), None);
}

#[test]
fn test_hide_cancels_pending_focus_retry() {
    let mut h = controller_with(&["a", "b"], |_| {});
    h.controller.show();
    assert_eq!(h.controller.pending_tasks(), 1);

    h.controller.hide(HideReason::User);
    assert_eq!(h.controller.pending_tasks(), 0);

    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    for _ in 0..3 {
        h.controller.handle_event(LauncherEvent::Frame);
    }
    assert_eq!(h.controller.grid().focused_id(), None);
    assert_eq!(h.controller.phase(), ModalPhase::Hidden);
}

#[test]
fn test_grab_failure_notifies_and_degrades() {
    let mut h = controller_with(&["a"], |_| {});
    h.grab.fail.set(true);
    h.controller.show();

    assert_eq!(h.controller.phase(), ModalPhase::Shown);
    let session = h.controller.session().unwrap();
    assert!(session.degraded);
    assert!(session.grab_token.is_none());
    assert_eq!(h.notifier.errors.borrow().len(), 1);

    h.controller.hide(HideReason::User);
    assert!(h.grab.released.borrow().is_empty());
}

#[test]
fn test_hide_releases_grab() {
    let mut h = controller_with(&["a"], |_| {});
    h.controller.show();
    let token = h.controller.session().unwrap().grab_token.unwrap();

    h.controller.hide(HideReason::AppLaunched);
    assert_eq!(*h.grab.released.borrow(), vec![token]);
    assert!(h.controller.session().is_none());
}

#[test]
fn test_fades_take_configured_frames() {
    let mut h = controller_with(&["a"], |config| config.overlay.fade_frames = 4);
    h.controller.show();
    assert_eq!(h.controller.phase(), ModalPhase::Showing);
    assert_eq!(h.controller.opacity(), 0.0);

    h.controller.handle_event(LauncherEvent::Frame);
    h.controller.handle_event(LauncherEvent::Frame);
    assert_eq!(h.controller.opacity(), 0.5);

    h.controller.handle_event(LauncherEvent::Frame);
    h.controller.handle_event(LauncherEvent::Frame);
    assert_eq!(h.controller.phase(), ModalPhase::Shown);
    assert_eq!(h.controller.opacity(), 1.0);

    h.controller.hide(HideReason::User);
    assert_eq!(h.controller.phase(), ModalPhase::Hiding);
    for _ in 0..4 {
        h.controller.handle_event(LauncherEvent::Frame);
    }
    assert_eq!(h.controller.phase(), ModalPhase::Hidden);
}

#[test]
fn test_running_apps_auto_hide_and_show() {
    let mut h = controller_with(&["a"], |_| {});
    h.controller.show();

    h.controller.on_running_count_changed(1);
    assert_eq!(h.controller.phase(), ModalPhase::Hidden);
    assert!(!h.controller.is_user_hidden());

    h.controller.on_running_count_changed(0);
    assert_eq!(h.controller.phase(), ModalPhase::Shown);
}

#[test]
fn test_user_hide_suppresses_auto_show() {
    let mut h = controller_with(&["a"], |_| {});
    h.controller.show();
    h.controller.handle_input(ctrl('q'));
    assert_eq!(h.controller.phase(), ModalPhase::Hidden);
    assert!(h.controller.is_user_hidden());

    h.controller.on_running_count_changed(0);
    assert_eq!(h.controller.phase(), ModalPhase::Hidden);

    // Home shortcut brings it back and clears the flag
    assert_eq!(h.controller.handle_input(ctrl('o')), InputOutcome::Handled);
    assert_eq!(h.controller.phase(), ModalPhase::Shown);
    assert!(!h.controller.is_user_hidden());
}

#[test]
fn test_auto_hide_disabled() {
    let mut h = controller_with(&["a"], |config| {
        config.overlay.auto_hide_when_apps_running = false;
    });
    h.controller.show();
    h.controller.on_running_count_changed(3);
    assert_eq!(h.controller.phase(), ModalPhase::Shown);
    assert_eq!(h.controller.running_count(), 3);
}

#[test]
fn test_hidden_overlay_propagates_input() {
    let mut h = controller_with(&["a"], |_| {});
    assert_eq!(
        h.controller.handle_input(RawInput::key(Key::Right)),
        InputOutcome::Propagated
    );
}

#[test]
fn test_select_launches_and_hides() {
    let mut h = controller_with(&["a", "b"], |_| {});
    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.show();

    h.controller.handle_input(RawInput::key(Key::Right));
    assert_eq!(h.controller.grid().focused_id(), Some("b"));
    assert_eq!(h.feedback.moved.get(), 1);

    assert_eq!(
        h.controller.handle_input(RawInput::key(Key::Enter)),
        InputOutcome::Handled
    );
    assert_eq!(h.activator.activated_ids(), vec!["b".to_string()]);
    assert_eq!(h.controller.phase(), ModalPhase::Hidden);
    assert!(!h.controller.is_user_hidden());
}

#[test]
fn test_failed_launch_keeps_overlay_up() {
    let mut h = controller_with(&["a"], |_| {});
    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.show();
    h.activator.fail_for("a");

    h.controller.handle_input(RawInput::key(Key::Enter));
    assert_eq!(h.controller.phase(), ModalPhase::Shown);
    assert_eq!(h.notifier.errors.borrow().len(), 1);

    // Still navigable afterwards
    assert_eq!(
        h.controller.handle_input(RawInput::key(Key::Escape)),
        InputOutcome::Handled
    );
    assert_eq!(h.controller.phase(), ModalPhase::Hidden);
}

#[test]
fn test_settings_navigation_and_toggle() {
    let mut h = controller_with(&["a", "b"], |_| {});
    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.show();
    h.controller.handle_input(RawInput::key(Key::Right));

    h.controller.handle_input(RawInput::key(Key::Menu));
    assert_eq!(h.controller.views().state(), ViewState::SettingsList);

    // Layout sub-list, toggle padding mode
    h.controller.handle_input(RawInput::key(Key::Enter));
    assert_eq!(h.controller.views().state(), ViewState::SubList);
    h.controller.handle_input(RawInput::key(Key::Enter));
    assert_eq!(h.controller.config().layout.pad_mode, PadMode::Padding);
    assert_eq!(
        h.controller.grid().layout_config().pad_mode,
        PadMode::Padding
    );
    let label = h
        .controller
        .views()
        .sub_list()
        .and_then(|m| m.collection().get("layout.pad_with_spacing"))
        .map(|c| c.label.clone());
    assert_eq!(label.as_deref(), Some("Pad with spacing: off"));

    // Down past the end of the sub-list goes back
    h.controller.handle_input(RawInput::key(Key::Down));
    h.controller.handle_input(RawInput::key(Key::Down));
    h.controller.handle_input(RawInput::key(Key::Down));
    assert_eq!(h.controller.views().state(), ViewState::SettingsList);
    assert_eq!(
        h.controller.views().settings().focused_id(),
        Some("settings.layout")
    );

    // Back to the grid restores the focused app
    h.controller.handle_input(RawInput::key(Key::Backspace));
    assert_eq!(h.controller.views().state(), ViewState::Grid);
    assert_eq!(h.controller.grid().focused_id(), Some("b"));
}

#[test]
fn test_sound_toggle_silences_feedback() {
    let mut h = controller_with(&["a", "b"], |_| {});
    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.show();

    h.controller.toggle_setting(SettingKey::SoundFeedback);
    assert!(!h.controller.config().navigation.sound_feedback);
    h.controller.handle_input(RawInput::key(Key::Right));
    assert_eq!(h.feedback.moved.get(), 0);
}

#[test]
fn test_home_shortcut_returns_to_grid() {
    let mut h = controller_with(&["a"], |_| {});
    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.show();
    h.controller.handle_input(RawInput::key(Key::Menu));
    h.controller.handle_input(RawInput::key(Key::Enter));
    assert_eq!(h.controller.views().state(), ViewState::SubList);

    h.controller.handle_input(ctrl('o'));
    assert_eq!(h.controller.views().state(), ViewState::Grid);
    assert_eq!(h.controller.grid().focused_id(), Some("a"));
}

#[test]
fn test_long_press_fires_context_action_once() {
    let mut h = controller_with(&["a"], |_| {});
    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.show();

    let bounds = h.controller.grid().collection().get("a").unwrap().bounds().unwrap();
    let (x, y) = (bounds.x1 + 1.0, bounds.y1 + 1.0);
    let start = Instant::now();

    h.controller
        .handle_input_at(RawInput::PointerDown { x, y }, start);
    assert!(h.controller.is_long_press_pending());

    let later = start + Duration::from_secs(2);
    h.controller.handle_event(LauncherEvent::Tick(later));
    h.controller.handle_event(LauncherEvent::Tick(later));
    assert_eq!(h.activator.context.borrow().len(), 1);

    // The release after a long press does not launch
    h.controller.handle_input(RawInput::PointerUp { x, y });
    assert!(h.activator.activated_ids().is_empty());
    assert_eq!(h.controller.phase(), ModalPhase::Shown);
}

#[test]
fn test_click_launches() {
    let mut h = controller_with(&["a"], |_| {});
    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.show();

    let bounds = h.controller.grid().collection().get("a").unwrap().bounds().unwrap();
    let (x, y) = (bounds.x1 + 1.0, bounds.y1 + 1.0);
    h.controller.handle_input(RawInput::PointerDown { x, y });
    h.controller.handle_input(RawInput::PointerUp { x, y });

    assert_eq!(h.activator.activated_ids(), vec!["a".to_string()]);
    assert!(h.activator.context.borrow().is_empty());
}

#[test]
fn test_hide_cancels_long_press() {
    let mut h = controller_with(&["a"], |_| {});
    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.show();

    let bounds = h.controller.grid().collection().get("a").unwrap().bounds().unwrap();
    let start = Instant::now();
    h.controller.handle_input_at(
        RawInput::PointerDown {
            x: bounds.x1 + 1.0,
            y: bounds.y1 + 1.0,
        },
        start,
    );
    h.controller.hide(HideReason::AutoHide);
    h.controller
        .handle_event(LauncherEvent::Tick(start + Duration::from_secs(5)));
    assert!(h.activator.context.borrow().is_empty());
}

#[test]
fn test_inventory_change_reloads_grid() {
    let mut h = controller_with(&["a"], |_| {});
    h.inventory.set_apps(&["a", "b"]);
    h.controller.handle_event(LauncherEvent::InventoryChanged);
    assert_eq!(h.controller.grid().collection().len(), 2);
}

#[test]
fn test_apps_closing_during_fade_out_show_again() {
    let mut h = controller_with(&["a"], |config| config.overlay.fade_frames = 3);
    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.show();
    for _ in 0..3 {
        h.controller.handle_event(LauncherEvent::Frame);
    }
    assert_eq!(h.controller.phase(), ModalPhase::Shown);

    h.controller.on_running_count_changed(1);
    assert_eq!(h.controller.phase(), ModalPhase::Hiding);

    h.controller.on_running_count_changed(0);
    assert_eq!(h.controller.phase(), ModalPhase::Showing);
    for _ in 0..5 {
        h.controller.handle_event(LauncherEvent::Frame);
    }
    assert_eq!(h.controller.phase(), ModalPhase::Shown);
    assert!(!h.controller.is_user_hidden());
    assert!(h.controller.session().is_some());
}

#[test]
fn test_apps_starting_during_fade_in_hide() {
    let mut h = controller_with(&["a"], |config| config.overlay.fade_frames = 3);
    h.controller.show();
    assert_eq!(h.controller.phase(), ModalPhase::Showing);

    h.controller.on_running_count_changed(2);
    assert_eq!(h.controller.phase(), ModalPhase::Hiding);
    assert!(h.controller.session().is_none());
    for _ in 0..3 {
        h.controller.handle_event(LauncherEvent::Frame);
    }
    assert_eq!(h.controller.phase(), ModalPhase::Hidden);
    assert!(!h.controller.is_user_hidden());
}

#[test]
fn test_user_hide_during_fade_out_stays_hidden() {
    let mut h = controller_with(&["a"], |config| config.overlay.fade_frames = 3);
    h.controller.show();
    h.controller.handle_input(ctrl('q'));
    assert_eq!(h.controller.phase(), ModalPhase::Hiding);

    h.controller.on_running_count_changed(0);
    for _ in 0..3 {
        h.controller.handle_event(LauncherEvent::Frame);
    }
    assert_eq!(h.controller.phase(), ModalPhase::Hidden);
}

#[test]
fn test_home_during_fade_out_reopens_on_grid() {
    let mut h = controller_with(&["a"], |config| config.overlay.fade_frames = 3);
    h.controller.handle_event(resize(THREE_COLUMNS.0, THREE_COLUMNS.1));
    h.controller.show();
    for _ in 0..3 {
        h.controller.handle_event(LauncherEvent::Frame);
    }
    h.controller.handle_input(RawInput::key(Key::Menu));
    assert_eq!(h.controller.views().state(), ViewState::SettingsList);

    h.controller.hide(HideReason::User);
    assert_eq!(h.controller.phase(), ModalPhase::Hiding);

    assert_eq!(h.controller.handle_input(ctrl('o')), InputOutcome::Handled);
    assert_eq!(h.controller.views().state(), ViewState::Grid);
    for _ in 0..5 {
        h.controller.handle_event(LauncherEvent::Frame);
    }
    assert_eq!(h.controller.phase(), ModalPhase::Shown);
    assert_eq!(h.controller.views().state(), ViewState::Grid);
    assert_eq!(h.controller.grid().focused_id(), Some("a"));
}
