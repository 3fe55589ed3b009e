//! Periodic idle checks.
//!
//! The screensaver does not need sub-poll precision, so instead of a timer
//! per activity event the UI loop asks the monitor on every iteration and the
//! monitor forwards to [`ModeController::check_idle`] at a fixed cadence.

use super::{Effect, ModeController};
use std::time::{Duration, Instant};

/// Drives [`ModeController::check_idle`] at a fixed cadence.
#[derive(Debug, Clone)]
pub struct IdleMonitor {
    poll_interval: Duration,
    next_check: Instant,
}

impl IdleMonitor {
    /// Default time between idle checks.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

    /// First check happens one interval after `now`.
    pub fn new(poll_interval: Duration, now: Instant) -> Self {
        Self {
            poll_interval,
            next_check: now + poll_interval,
        }
    }

    /// Run the idle check if one is due.
    pub fn tick(&mut self, now: Instant, controller: &mut ModeController) -> Vec<Effect> {
        if now < self.next_check {
            return Vec::new();
        }
        self.next_check = now + self.poll_interval;
        controller.check_idle(now)
    }
}
