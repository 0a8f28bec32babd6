//! Press-and-hold detection on top of [`OneShotTimer`].

use crate::scheduler::OneShotTimer;
use std::time::{Duration, Instant};
use tracing::debug;

/// What a pointer release turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Release {
    /// Short press on the same cell it started on
    Click(String),
    /// The long press already fired; swallow the release
    Consumed,
    /// No press in progress, or released over a different cell
    Ignored,
}

#[derive(Debug)]
pub struct LongPressDetector {
    timer: OneShotTimer<String>,
    pressed: Option<String>,
    hold: Duration,
}

impl LongPressDetector {
    #[must_use]
    pub fn new(hold: Duration) -> Self {
        Self {
            timer: OneShotTimer::default(),
            pressed: None,
            hold,
        }
    }

    pub fn set_hold(&mut self, hold: Duration) {
        self.hold = hold;
    }

    /// Arm on press. A second press while one is held cancels both.
    pub fn pointer_down(&mut self, id: &str, now: Instant) {
        if self.pressed.is_some() {
            debug!("Second press during hold, cancelling long press");
            self.interrupt();
            return;
        }
        self.pressed = Some(id.to_string());
        self.timer.arm(now + self.hold, id.to_string());
    }

    /// `over` is the cell under the pointer at release, if any.
    pub fn pointer_up(&mut self, over: Option<&str>) -> Release {
        let Some(pressed) = self.pressed.take() else {
            return Release::Ignored;
        };
        if self.timer.cancel().is_none() {
            return Release::Consumed;
        }
        if over == Some(pressed.as_str()) {
            Release::Click(pressed)
        } else {
            Release::Ignored
        }
    }

    /// Any other action cancels a pending hold.
    pub fn interrupt(&mut self) {
        self.timer.cancel();
        self.pressed = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.timer.is_armed()
    }

    /// Returns the held cell id exactly once when the hold elapses.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        self.timer.poll(now)
    }
}
