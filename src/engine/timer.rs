//! One-shot real-time deferred task
//!
//! The engine owns the task and polls it with the frame driver's clock, so a
//! pending callback can be cancelled and can never fire twice.

/// A deadline that fires at most once per `schedule`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeferredTask {
    deadline: Option<f64>,
}

impl DeferredTask {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the task for `at` (seconds, frame-driver clock)
    ///
    /// Returns false and keeps the existing deadline if already armed.
    pub fn schedule(&mut self, at: f64) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(at);
        true
    }

    /// Disarm; returns whether anything was pending
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Consume the task if its deadline has passed
    pub fn poll(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(at) if now >= at => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
