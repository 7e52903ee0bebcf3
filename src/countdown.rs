//! Deadline countdown for the limited offer. One-way Active -> Expired
//! state machine driven by a once-per-second tick.

use std::fmt;

const MS_PER_SECOND: f64 = 1000.0;
const MS_PER_MINUTE: f64 = 60.0 * MS_PER_SECOND;
const MS_PER_HOUR: f64 = 60.0 * MS_PER_MINUTE;
const MS_PER_DAY: f64 = 24.0 * MS_PER_HOUR;

/// Time left until the deadline, decomposed for display.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Remaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Remaining {
    fn from_diff_ms(diff: f64) -> Self {
        Self {
            days: (diff / MS_PER_DAY).floor() as u64,
            hours: ((diff / MS_PER_HOUR).floor() as u64) % 24,
            minutes: ((diff / MS_PER_MINUTE).floor() as u64) % 60,
            seconds: ((diff / MS_PER_SECOND).floor() as u64) % 60,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        ((self.days * 24 + self.hours) * 60 + self.minutes) * 60 + self.seconds
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Zero-padded two-digit form of a single countdown unit.
pub fn pad2(value: u64) -> String {
    format!("{:02}", value)
}

/// Counts down to a fixed calendar instant. Once expired it stays
/// expired; further ticks are no-ops.
pub struct DeadlineClock {
    deadline_ms: f64,
    remaining: Remaining,
    expired: bool,
}

impl DeadlineClock {
    pub fn new(deadline_ms: f64) -> Self {
        Self {
            deadline_ms,
            remaining: Remaining::default(),
            expired: false,
        }
    }

    /// Recompute the remaining time. Returns `true` while the clock is
    /// still active; the first `false` marks the expiry transition and
    /// tells the caller to cancel the periodic tick.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if self.expired {
            return false;
        }
        let diff = self.deadline_ms - now_ms;
        if diff > 0.0 {
            self.remaining = Remaining::from_diff_ms(diff);
            true
        } else {
            self.remaining = Remaining::default();
            self.expired = true;
            false
        }
    }

    pub fn remaining(&self) -> Remaining {
        self.remaining
    }

    pub fn expired(&self) -> bool {
        self.expired
    }
}
