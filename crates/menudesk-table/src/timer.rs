//! Host-clock driven single-shot timers.
//!
//! # Design
//! - A slot holds at most one pending task; scheduling replaces it.
//! - Nothing runs in the background: the host passes its clock to
//!   `fire_if_due` and the owning state machine reacts to the payload.

use std::time::{Duration, Instant};

/// Deadline plus the value to hand back once it passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledTask<T> {
    due: Instant,
    payload: T,
}

impl<T> ScheduledTask<T> {
    /// Task due `delay` after `now`.
    #[must_use]
    pub fn new(now: Instant, delay: Duration, payload: T) -> Self {
        Self {
            due: now + delay,
            payload,
        }
    }

    /// Deadline of the task.
    #[must_use]
    pub const fn due(&self) -> Instant {
        self.due
    }

    /// Value attached to the task.
    #[must_use]
    pub const fn payload(&self) -> &T {
        &self.payload
    }

    /// Whether the deadline has passed at `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    /// Consume the task and return its payload.
    #[must_use]
    pub fn into_payload(self) -> T {
        self.payload
    }
}

/// Cancellable slot for one scheduled task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerSlot<T> {
    task: Option<ScheduledTask<T>>,
}

impl<T> Default for TimerSlot<T> {
    fn default() -> Self {
        Self { task: None }
    }
}

impl<T> TimerSlot<T> {
    /// Schedule a task, returning the payload of any task it replaced.
    pub fn schedule(&mut self, now: Instant, delay: Duration, payload: T) -> Option<T> {
        self.task
            .replace(ScheduledTask::new(now, delay, payload))
            .map(ScheduledTask::into_payload)
    }

    /// Cancel the pending task, returning its payload.
    pub fn cancel(&mut self) -> Option<T> {
        self.task.take().map(ScheduledTask::into_payload)
    }

    /// Pending task, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&ScheduledTask<T>> {
        self.task.as_ref()
    }

    /// Whether a task is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    /// Take the payload when the pending task is due at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> Option<T> {
        if self.task.as_ref().is_some_and(|task| task.is_due(now)) {
            self.cancel()
        } else {
            None
        }
    }
}
