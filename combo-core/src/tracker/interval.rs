//! Repeating rep/set countdown embedded in a tracker

use heapless::String;

use crate::text::truncated;

/// Maximum interval label length
pub const MAX_INTERVAL_LABEL_LEN: usize = 31;

/// Repeating countdown
///
/// Owned by value inside a [`Tracker`](super::Tracker); the tracker keeps
/// `running` in lockstep with its own pause state.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntervalTracker {
    /// An interval is configured and has reps left
    pub has_interval: bool,
    /// Countdown is advancing
    pub running: bool,
    /// Reps finished so far
    pub current_rep: i32,
    /// Seconds left in the current rep
    pub time_remaining: f32,
    pub label: String<MAX_INTERVAL_LABEL_LEN>,
    /// Length of one rep in seconds
    pub duration_s: i32,
    /// Number of reps
    pub reps: i32,
}

impl IntervalTracker {
    /// Configure a new interval, stopped at the first rep
    ///
    /// A non-positive duration or rep count leaves no interval configured.
    pub fn configure(&mut self, label: &str, duration_s: i32, reps: i32) {
        self.label = truncated(label);
        self.duration_s = duration_s;
        self.reps = reps;
        self.current_rep = 0;
        self.running = false;
        self.has_interval = duration_s > 0 && reps > 0;
        self.time_remaining = if self.has_interval {
            duration_s as f32
        } else {
            0.0
        };
    }

    /// Drop the configured interval
    pub fn clear(&mut self) {
        self.has_interval = false;
        self.running = false;
        self.time_remaining = 0.0;
    }

    /// Reps still to go
    pub fn reps_remaining(&self) -> i32 {
        if !self.has_interval {
            return 0;
        }
        self.reps.saturating_sub(self.current_rep).max(0)
    }

    /// Advance the countdown
    ///
    /// Returns how many reps finished during this step. After the last rep
    /// the interval clears itself.
    pub fn tick(&mut self, dt_s: f32) -> u32 {
        if !self.has_interval || !self.running || !dt_s.is_finite() {
            return 0;
        }

        self.time_remaining -= dt_s;
        let mut finished = 0;
        while self.has_interval && self.time_remaining <= 0.0 {
            finished += 1;
            self.current_rep += 1;
            if self.current_rep >= self.reps {
                self.clear();
            } else {
                self.time_remaining += self.duration_s as f32;
            }
        }
        finished
    }
}
