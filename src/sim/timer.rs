//! Real-time timers on the host clock
//!
//! Timers never call back on their own. The frame entry point polls them with
//! the current host time, so every timer-driven mutation happens inside the
//! single update path.

use serde::{Deserialize, Serialize};

/// Fixed-rate repeating timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodicTimer {
    period_ms: f64,
    next_due_ms: f64,
}

impl PeriodicTimer {
    /// `period_ms` must be positive
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next_due_ms: period_ms,
        }
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Start counting a fresh period from `now_ms`
    pub fn restart(&mut self, now_ms: f64) {
        self.next_due_ms = now_ms + self.period_ms;
    }

    /// Number of periods elapsed since the last poll. A long frame gap
    /// yields several firings, like a fixed-rate interval catching up.
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        let mut fired = 0;
        while now_ms >= self.next_due_ms {
            fired += 1;
            self.next_due_ms += self.period_ms;
        }
        fired
    }
}

/// Cancellable one-shot task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneShotTimer {
    due_ms: Option<f64>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self { due_ms: None }
    }

    /// Schedule the task, replacing any pending one
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64) {
        self.due_ms = Some(now_ms + delay_ms);
    }

    /// Drop the pending task. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.due_ms.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.due_ms.is_some()
    }

    /// Fires at most once per schedule
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.due_ms {
            Some(due) if now_ms >= due => {
                self.due_ms = None;
                true
            }
            _ => false,
        }
    }
}
