//! Directional navigation over a row-major grid of cells.

use couchdeck_types::Direction;

/// Result of resolving a directional move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Move focus to this index
    To(usize),
    /// The current index is stale; focus the first cell instead
    FocusFirst,
    /// No movement possible; let the event propagate
    Propagate,
}

impl Navigation {
    /// The index focus should land on, if any.
    #[must_use]
    pub fn target(self) -> Option<usize> {
        match self {
            Navigation::To(index) => Some(index),
            Navigation::FocusFirst => Some(0),
            Navigation::Propagate => None,
        }
    }

    #[must_use]
    pub fn is_handled(self) -> bool {
        !matches!(self, Navigation::Propagate)
    }
}

/// Resolve the neighbor of `current` in `direction`.
///
/// Up/Down wrap to the same column in the last/first row. When the last row
/// is ragged and that column does not exist there, the target steps back one
/// row so it never exceeds `count - 1`.
#[must_use]
pub fn next_index(
    current: usize,
    direction: Direction,
    columns: usize,
    count: usize,
    wrap: bool,
) -> Navigation {
    if columns == 0 || count == 0 {
        return Navigation::Propagate;
    }
    if current >= count {
        return Navigation::FocusFirst;
    }

    let last = count - 1;

    match direction {
        Direction::Left | Direction::TabBackward => {
            let wrap = wrap || direction == Direction::TabBackward;
            if current > 0 {
                Navigation::To(current - 1)
            } else if wrap {
                Navigation::To(last)
            } else {
                Navigation::Propagate
            }
        }
        Direction::Right | Direction::TabForward => {
            let wrap = wrap || direction == Direction::TabForward;
            if current < last {
                Navigation::To(current + 1)
            } else if wrap {
                Navigation::To(0)
            } else {
                Navigation::Propagate
            }
        }
        Direction::Up => {
            if current >= columns {
                Navigation::To(current - columns)
            } else if wrap {
                let last_row_start = (last / columns) * columns;
                let mut target = current % columns + last_row_start;
                if target > last {
                    target -= columns;
                }
                Navigation::To(target)
            } else {
                Navigation::Propagate
            }
        }
        Direction::Down => {
            if current + columns <= last {
                Navigation::To(current + columns)
            } else if wrap {
                Navigation::To(current % columns)
            } else {
                Navigation::Propagate
            }
        }
    }
}

/// Single-column navigation used by menus: Up/Down step, no wrap, and
/// horizontal movement is never handled.
#[must_use]
pub fn next_in_list(current: usize, direction: Direction, count: usize) -> Navigation {
    match direction {
        Direction::Up | Direction::Down => next_index(current, direction, 1, count, false),
        Direction::TabForward => next_index(current, Direction::Down, 1, count, false),
        Direction::TabBackward => next_index(current, Direction::Up, 1, count, false),
        Direction::Left | Direction::Right => {
            if current >= count && count > 0 {
                Navigation::FocusFirst
            } else {
                Navigation::Propagate
            }
        }
    }
}
