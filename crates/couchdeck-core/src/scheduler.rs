//! Deferred work: "before next frame" tasks and one-shot timers.
//!
//! Everything here is single-threaded. The host calls
//! [`FrameScheduler::take_due`] once per redraw and [`OneShotTimer::poll`]
//! on its tick; nothing runs on its own.

use std::time::Instant;
use tracing::{debug, warn};

/// Cancellable handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// A task handed back to the caller on a frame
#[derive(Debug)]
pub struct DueTask<T> {
    pub handle: TaskHandle,
    pub task: T,
    /// Zero on the first run, incremented on every reschedule
    pub attempt: u32,
}

#[derive(Debug)]
struct Pending<T> {
    handle: TaskHandle,
    task: T,
    attempt: u32,
}

/// Queue of work to run before the next redraw, with capped retries.
#[derive(Debug)]
pub struct FrameScheduler<T> {
    next_id: u64,
    queue: Vec<Pending<T>>,
    max_attempts: u32,
}

impl<T> FrameScheduler<T> {
    /// `max_attempts` bounds how many frames a task may run in total.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            next_id: 0,
            queue: Vec::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn set_max_attempts(&mut self, max_attempts: u32) {
        self.max_attempts = max_attempts.max(1);
    }

    pub fn schedule_before_next_frame(&mut self, task: T) -> TaskHandle {
        let handle = self.allocate();
        self.queue.push(Pending {
            handle,
            task,
            attempt: 0,
        });
        handle
    }

    /// Run a task that failed again on the following frame.
    ///
    /// Returns `None` (and drops the task) once it has used all attempts.
    pub fn retry(&mut self, due: DueTask<T>) -> Option<TaskHandle> {
        let attempt = due.attempt + 1;
        if attempt >= self.max_attempts {
            warn!(
                "Deferred task gave up after {} attempts",
                self.max_attempts
            );
            return None;
        }
        self.queue.push(Pending {
            handle: due.handle,
            task: due.task,
            attempt,
        });
        Some(due.handle)
    }

    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.queue.len();
        self.queue.retain(|p| p.handle != handle);
        before != self.queue.len()
    }

    /// Drop every pending task. Returns how many were cancelled.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.queue.len();
        if count > 0 {
            debug!("Cancelling {count} deferred tasks");
        }
        self.queue.clear();
        count
    }

    #[must_use]
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.queue.iter().any(|p| p.handle == handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Everything scheduled before this frame. Tasks scheduled while the
    /// caller processes these wait for the next frame.
    pub fn take_due(&mut self) -> Vec<DueTask<T>> {
        self.queue
            .drain(..)
            .map(|p| DueTask {
                handle: p.handle,
                task: p.task,
                attempt: p.attempt,
            })
            .collect()
    }

    fn allocate(&mut self) -> TaskHandle {
        self.next_id += 1;
        TaskHandle(self.next_id)
    }
}

/// A single-shot deadline carrying a payload.
#[derive(Debug)]
pub struct OneShotTimer<T> {
    armed: Option<(Instant, T)>,
}

impl<T> Default for OneShotTimer<T> {
    fn default() -> Self {
        Self { armed: None }
    }
}

impl<T> OneShotTimer<T> {
    /// Arm (or re-arm) the timer.
    pub fn arm(&mut self, deadline: Instant, payload: T) {
        self.armed = Some((deadline, payload));
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.armed.take().map(|(_, payload)| payload)
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Fire at most once: returns the payload if the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self
            .armed
            .as_ref()
            .is_some_and(|(deadline, _)| now >= *deadline);
        if due {
            self.cancel()
        } else {
            None
        }
    }
}
