use std::time::{Duration, Instant};

/// Trailing-edge debounce driven by explicit timestamps.
///
/// Every `touch` pushes the deadline out by `delay`; `ready` fires once after the last touch
/// has aged past it. The work itself always reads the latest state, so a superseded request is
/// simply absorbed by the next one.
#[derive(Clone, Copy, Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    /// Idle timer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule (or reschedule) relative to `now`.
    pub fn touch_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Restart the timer from now.
    pub fn touch(&mut self) {
        self.touch_at(Instant::now());
    }

    /// A deadline is armed.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending work becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the pending request if its deadline has passed at `now`.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending request, returning whether there was one.
    pub fn take(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
