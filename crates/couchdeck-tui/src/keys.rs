//! Translation of crossterm events into the core's raw input

use couchdeck_core::input::{Key, KeyModifiers, RawInput};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers as CtModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

/// Rows scrolled per wheel notch
const SCROLL_STEP: f64 = 3.0;

/// Terminals rarely forward the Menu key, so F2 stands in for it
pub const MENU_FKEY: u8 = 2;

fn map_key_code(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Menu | KeyCode::F(MENU_FKEY) => Key::Menu,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(key)
}

fn map_modifiers(modifiers: CtModifiers) -> KeyModifiers {
    KeyModifiers {
        ctrl: modifiers.contains(CtModifiers::CONTROL),
        shift: modifiers.contains(CtModifiers::SHIFT),
        alt: modifiers.contains(CtModifiers::ALT),
        super_key: modifiers.contains(CtModifiers::SUPER),
    }
}

fn map_key(event: KeyEvent) -> Option<RawInput> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    Some(RawInput::Key {
        key: map_key_code(event.code)?,
        modifiers: map_modifiers(event.modifiers),
    })
}

/// `origin` is the top-left terminal cell of the active view, so pointer
/// coordinates arrive in view space.
fn map_mouse(event: MouseEvent, origin: (u16, u16)) -> Option<RawInput> {
    let x = f64::from(event.column) - f64::from(origin.0);
    let y = f64::from(event.row) - f64::from(origin.1);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(RawInput::PointerDown { x, y }),
        MouseEventKind::Up(MouseButton::Left) => Some(RawInput::PointerUp { x, y }),
        MouseEventKind::ScrollDown => Some(RawInput::Scroll { delta: SCROLL_STEP }),
        MouseEventKind::ScrollUp => Some(RawInput::Scroll {
            delta: -SCROLL_STEP,
        }),
        _ => None,
    }
}

/// Raw input for a terminal event, or `None` if the core has no use for it.
/// Resizes are handled by the caller.
#[must_use]
pub fn map_event(event: &Event, origin: (u16, u16)) -> Option<RawInput> {
    match event {
        Event::Key(key) => map_key(*key),
        Event::Mouse(mouse) => map_mouse(*mouse, origin),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: CtModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: CtModifiers::NONE,
        })
    }

    #[test]
    fn test_arrow_press() {
        assert_eq!(
            map_event(&press(KeyCode::Left, CtModifiers::NONE), (0, 0)),
            Some(RawInput::key(Key::Left))
        );
    }

    #[test]
    fn test_space_is_its_own_key() {
        assert_eq!(
            map_event(&press(KeyCode::Char(' '), CtModifiers::NONE), (0, 0)),
            Some(RawInput::key(Key::Space))
        );
    }

    #[test]
    fn test_modifiers_carry_over() {
        let event = press(KeyCode::Char('q'), CtModifiers::CONTROL | CtModifiers::SHIFT);
        let Some(RawInput::Key { key, modifiers }) = map_event(&event, (0, 0)) else {
            panic!("expected a key");
        };
        assert_eq!(key, Key::Char('q'));
        assert!(modifiers.ctrl && modifiers.shift);
        assert!(!modifiers.alt);
    }

    #[test]
    fn test_f2_opens_menu() {
        assert_eq!(
            map_event(&press(KeyCode::F(MENU_FKEY), CtModifiers::NONE), (0, 0)),
            Some(RawInput::key(Key::Menu))
        );
        assert_eq!(
            map_event(&press(KeyCode::F(5), CtModifiers::NONE), (0, 0)),
            Some(RawInput::key(Key::F(5)))
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let event = Event::Key(KeyEvent {
            code: KeyCode::Enter,
            modifiers: CtModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(map_event(&event, (0, 0)), None);
    }

    #[test]
    fn test_unmapped_key_is_none() {
        assert_eq!(
            map_event(&press(KeyCode::Insert, CtModifiers::NONE), (0, 0)),
            None
        );
    }

    #[test]
    fn test_pointer_is_relative_to_origin() {
        assert_eq!(
            map_event(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 5), (2, 3)),
            Some(RawInput::PointerDown { x: 10.0, y: 2.0 })
        );
        assert_eq!(
            map_event(&mouse(MouseEventKind::Up(MouseButton::Left), 2, 3), (2, 3)),
            Some(RawInput::PointerUp { x: 0.0, y: 0.0 })
        );
        assert_eq!(
            map_event(&mouse(MouseEventKind::Down(MouseButton::Right), 1, 1), (0, 0)),
            None
        );
    }

    #[test]
    fn test_wheel_scrolls() {
        assert_eq!(
            map_event(&mouse(MouseEventKind::ScrollUp, 0, 0), (0, 0)),
            Some(RawInput::Scroll { delta: -SCROLL_STEP })
        );
    }

    #[test]
    fn test_resize_is_not_input() {
        assert_eq!(map_event(&Event::Resize(80, 24), (0, 0)), None);
    }
}
