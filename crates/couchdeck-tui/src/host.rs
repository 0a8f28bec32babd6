//! Terminal stand-ins for the compositor grab and desktop notifications

use couchdeck_core::services::{GrabToken, InputGrab, Notifier};
use couchdeck_core::{Error, Result};
use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// The terminal is ours while raw mode is on, so the grab only tracks
/// ownership: a second acquire fails until the first is released.
#[derive(Debug, Default)]
pub struct TerminalGrab {
    next_token: Cell<u64>,
    held: Cell<Option<GrabToken>>,
}

impl TerminalGrab {
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held.get().is_some()
    }
}

impl InputGrab for TerminalGrab {
    fn acquire(&self) -> Result<GrabToken> {
        if let Some(token) = self.held.get() {
            return Err(Error::Grab(format!("already held by session {}", token.0)));
        }
        let token = GrabToken(self.next_token.get() + 1);
        self.next_token.set(token.0);
        self.held.set(Some(token));
        debug!("Grab acquired: {}", token.0);
        Ok(token)
    }

    fn release(&self, token: GrabToken) {
        if self.held.get() == Some(token) {
            self.held.set(None);
            debug!("Grab released: {}", token.0);
        }
    }
}

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub title: String,
    pub message: String,
}

/// Shows the last error in the footer until it times out
#[derive(Debug, Default)]
pub struct StatusLine {
    current: RefCell<Option<(StatusMessage, Instant)>>,
}

impl StatusLine {
    /// The message to display at `now`, if one is still fresh.
    pub fn current(&self, now: Instant) -> Option<StatusMessage> {
        let mut current = self.current.borrow_mut();
        match &*current {
            Some((status, posted)) if now.duration_since(*posted) < STATUS_TIMEOUT => {
                Some(status.clone())
            }
            Some(_) => {
                *current = None;
                None
            }
            None => None,
        }
    }

    pub fn clear(&self) {
        self.current.borrow_mut().take();
    }

    fn post_at(&self, title: &str, message: &str, now: Instant) {
        *self.current.borrow_mut() = Some((
            StatusMessage {
                title: title.to_string(),
                message: message.to_string(),
            },
            now,
        ));
    }
}

impl Notifier for StatusLine {
    fn notify_error(&self, title: &str, message: &str) {
        error!("{title}: {message}");
        self.post_at(title, message, Instant::now());
    }
}
