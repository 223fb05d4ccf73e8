//! Tracker state and mutation rules

use alloc::vec::Vec;
use core::fmt;

use heapless::String;

use super::interval::IntervalTracker;
use super::objective::Objective;
use crate::counter::Quality;
use crate::text::truncated;

/// Maximum tracker label length
pub const MAX_TRACKER_LABEL_LEN: usize = 31;

/// Multiplier ceiling
pub const MAX_TRACKER_MULTIPLIER: f32 = 3.0;

/// Multiplier gained per combo step
pub const MULTIPLIER_PER_COMBO: f32 = 0.1;

/// Seconds after a hit before the multiplier starts to decay
pub const DECAY_WINDOW_S: f32 = 5.0;

/// Multiplier lost per second once the decay window has lapsed
pub const MULTIPLIER_DECAY_PER_S: f32 = 0.5;

/// Score awarded for each finished interval rep
pub const INTERVAL_BONUS: u32 = 10;

/// Errors from tracker operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrackerError {
    /// Objective index out of range
    InvalidIndex,
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::InvalidIndex => f.write_str("invalid objective index"),
        }
    }
}

impl core::error::Error for TrackerError {}

/// Legacy combo tracker
///
/// Trackers start paused; while paused every score mutation is ignored.
/// The tracker exclusively owns its objectives.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tracker {
    pub label: String<MAX_TRACKER_LABEL_LEN>,
    pub score: u32,
    pub combo: i32,
    pub max_combo: i32,
    pub paused: bool,
    /// A numeric score goal is set
    pub has_objective: bool,
    /// Numeric score goal
    pub objective: i32,
    /// Interval reps finished over the tracker's life
    pub completed_intervals: i32,
    pub multiplier: f32,
    /// Seconds left before the multiplier starts decaying
    pub decay_pause: f32,
    pub total_hits: i32,
    pub perfect_hits: i32,
    pub miss_hits: i32,
    pub objectives: Vec<Objective>,
    /// Objective receiving progress from increments
    pub active_objective_index: usize,
    pub interval: IntervalTracker,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new("")
    }
}

impl Tracker {
    /// Create a paused tracker with no score
    pub fn new(label: &str) -> Self {
        Self {
            label: truncated(label),
            score: 0,
            combo: 0,
            max_combo: 0,
            paused: true,
            has_objective: false,
            objective: 0,
            completed_intervals: 0,
            multiplier: 1.0,
            decay_pause: 0.0,
            total_hits: 0,
            perfect_hits: 0,
            miss_hits: 0,
            objectives: Vec::new(),
            active_objective_index: 0,
            interval: IntervalTracker::default(),
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
        self.sync_interval();
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.sync_interval();
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Register a successful hit worth `amount`
    ///
    /// Points are `amount * multiplier` truncated toward zero, computed with
    /// the multiplier from before this hit.
    pub fn increment(&mut self, amount: u32) {
        if self.paused {
            return;
        }

        self.total_hits = self.total_hits.saturating_add(1);
        let points = (amount as f32 * self.multiplier) as u32;
        self.score = self.score.saturating_add(points);

        self.bump_combo();
        self.multiplier =
            (1.0 + MULTIPLIER_PER_COMBO * self.combo as f32).min(MAX_TRACKER_MULTIPLIER);
        self.decay_pause = DECAY_WINDOW_S;

        let progress = i32::try_from(amount).unwrap_or(i32::MAX);
        if let Some(objective) = self.objectives.get_mut(self.active_objective_index) {
            objective.progress(progress);
        }
    }

    /// Lose score and break the combo
    ///
    /// Every decrement breaks the combo, whatever the amount.
    pub fn decrement(&mut self, amount: u32) {
        if self.paused {
            return;
        }

        self.score = self.score.saturating_sub(amount);
        self.combo = 0;
        self.multiplier = 1.0;
    }

    /// Register a graded hit
    ///
    /// Non-miss qualities increment by their weight. A miss is tallied and
    /// breaks the combo without costing score.
    pub fn hit(&mut self, quality: Quality) {
        if self.paused {
            return;
        }

        match quality {
            Quality::Miss => {
                self.total_hits = self.total_hits.saturating_add(1);
                self.miss_hits = self.miss_hits.saturating_add(1);
                self.decrement(0);
            }
            _ => {
                if quality == Quality::Perfect {
                    self.perfect_hits = self.perfect_hits.saturating_add(1);
                }
                self.increment(quality.weight() as u32);
            }
        }
    }

    /// Advance time
    ///
    /// Counts down the decay window, then decays the multiplier toward 1.0.
    /// Runs the interval countdown and awards [`INTERVAL_BONUS`] per finished
    /// rep. Nothing moves while paused.
    pub fn update(&mut self, dt_s: f32) {
        if self.paused || !dt_s.is_finite() || dt_s <= 0.0 {
            return;
        }

        let mut decay_time = dt_s;
        if self.decay_pause > 0.0 {
            if dt_s <= self.decay_pause {
                self.decay_pause -= dt_s;
                decay_time = 0.0;
            } else {
                decay_time = dt_s - self.decay_pause;
                self.decay_pause = 0.0;
            }
        }
        if decay_time > 0.0 && self.multiplier > 1.0 {
            self.multiplier = (self.multiplier - MULTIPLIER_DECAY_PER_S * decay_time).max(1.0);
        }

        for _ in 0..self.interval.tick(dt_s) {
            self.score = self.score.saturating_add(INTERVAL_BONUS);
            self.bump_combo();
            self.completed_intervals = self.completed_intervals.saturating_add(1);
        }
    }

    /// Replace the owned objectives
    ///
    /// The previous list is dropped and the first new objective becomes
    /// active.
    pub fn set_objectives(&mut self, objectives: impl Into<Vec<Objective>>) {
        self.objectives = objectives.into();
        self.active_objective_index = 0;
    }

    /// Choose which objective receives progress
    pub fn switch_objective(&mut self, index: usize) -> Result<(), TrackerError> {
        if index >= self.objectives.len() {
            return Err(TrackerError::InvalidIndex);
        }
        self.active_objective_index = index;
        Ok(())
    }

    pub fn active_objective(&self) -> Option<&Objective> {
        self.objectives.get(self.active_objective_index)
    }

    pub fn completed_objectives(&self) -> usize {
        self.objectives.iter().filter(|o| o.completed).count()
    }

    /// Set a numeric score goal
    pub fn set_goal(&mut self, objective: i32) {
        self.has_objective = true;
        self.objective = objective;
    }

    pub fn clear_goal(&mut self) {
        self.has_objective = false;
        self.objective = 0;
    }

    pub fn goal_reached(&self) -> bool {
        self.has_objective && i64::from(self.score) >= i64::from(self.objective)
    }

    /// Start a repeating interval
    ///
    /// The countdown runs only while the tracker is resumed.
    pub fn start_interval(&mut self, label: &str, duration_s: i32, reps: i32) {
        self.interval.configure(label, duration_s, reps);
        self.sync_interval();
    }

    fn bump_combo(&mut self) {
        self.combo = self.combo.saturating_add(1);
        self.max_combo = self.max_combo.max(self.combo);
    }

    fn sync_interval(&mut self) {
        self.interval.running = !self.paused && self.interval.has_interval;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn resumed(label: &str) -> Tracker {
        let mut t = Tracker::new(label);
        t.resume();
        t
    }

    #[test]
    fn test_new_is_paused() {
        let t = Tracker::new("Session");
        assert!(t.paused);
        assert_eq!(t.multiplier, 1.0);
        assert!(t.objectives.is_empty());
        assert_eq!(t.score, 0);
    }

    #[test]
    fn test_pause_gate() {
        let mut t = Tracker::new("Session");
        t.increment(10);
        t.decrement(3);
        t.hit(Quality::Perfect);
        t.update(10.0);
        assert_eq!(t.score, 0);
        assert_eq!(t.combo, 0);
        assert_eq!(t.multiplier, 1.0);
        assert_eq!(t.total_hits, 0);
    }

    #[test]
    fn test_resume_then_increment() {
        let mut t = resumed("Session");
        t.increment(5);
        assert_eq!(t.score, 5);
        assert_eq!(t.combo, 1);
        assert!((t.multiplier - 1.1).abs() < 1e-6);
        assert_eq!(t.decay_pause, DECAY_WINDOW_S);
    }

    #[test]
    fn test_points_truncate() {
        let mut t = resumed("B");
        t.increment(20);
        t.increment(5);
        assert_eq!(t.score, 25);
        assert_eq!(t.combo, 2);
        assert_eq!(t.max_combo, 2);
    }

    #[test]
    fn test_multiplier_capped() {
        let mut t = resumed("Cap");
        for _ in 0..40 {
            t.increment(1);
        }
        assert_eq!(t.multiplier, MAX_TRACKER_MULTIPLIER);
    }

    #[test]
    fn test_decrement_breaks_combo() {
        let mut t = resumed("Session");
        t.increment(10);
        t.increment(10);
        t.decrement(100);
        assert_eq!(t.score, 0);
        assert_eq!(t.combo, 0);
        assert_eq!(t.multiplier, 1.0);
        assert_eq!(t.max_combo, 2);
    }

    #[test]
    fn test_hit_tallies() {
        let mut t = resumed("Session");
        t.hit(Quality::Perfect);
        t.hit(Quality::Good);
        t.hit(Quality::Miss);
        assert_eq!(t.total_hits, 3);
        assert_eq!(t.perfect_hits, 1);
        assert_eq!(t.miss_hits, 1);
        assert_eq!(t.combo, 0);
        assert_eq!(t.score, 3 + 2);
    }

    #[test]
    fn test_decay_after_window() {
        let mut t = resumed("Session");
        for _ in 0..10 {
            t.increment(1);
        }
        assert!((t.multiplier - 2.0).abs() < 1e-5);

        t.update(4.0);
        assert!((t.multiplier - 2.0).abs() < 1e-5);

        // 1s finishes the window, the remaining 1s decays
        t.update(2.0);
        assert!((t.multiplier - 1.5).abs() < 1e-5);

        t.update(60.0);
        assert_eq!(t.multiplier, 1.0);
        assert_eq!(t.combo, 10);
    }

    #[test]
    fn test_decay_frozen_while_paused() {
        let mut t = resumed("Session");
        t.increment(1);
        t.pause();
        t.update(60.0);
        assert_eq!(t.decay_pause, DECAY_WINDOW_S);
        assert!(t.multiplier > 1.0);
    }

    #[test]
    fn test_objectives_receive_progress() {
        let mut t = resumed("Session");
        t.set_objectives(vec![
            Objective::new("Warmup", "", 10),
            Objective::new("Main", "", 50),
        ]);
        t.increment(6);
        t.increment(6);
        assert!(t.objectives[0].completed);
        assert_eq!(t.objectives[0].current_score, 12);
        assert_eq!(t.objectives[1].current_score, 0);

        t.switch_objective(1).unwrap();
        t.increment(7);
        assert_eq!(t.objectives[1].current_score, 7);
        assert_eq!(t.completed_objectives(), 1);
    }

    #[test]
    fn test_switch_objective_bounds() {
        let mut t = Tracker::new("Session");
        assert_eq!(t.switch_objective(0), Err(TrackerError::InvalidIndex));
        t.set_objectives(vec![Objective::new("Only", "", 1)]);
        assert_eq!(t.switch_objective(1), Err(TrackerError::InvalidIndex));
        assert_eq!(t.switch_objective(0), Ok(()));
    }

    #[test]
    fn test_set_objectives_replaces() {
        let mut t = Tracker::new("Session");
        t.set_objectives(vec![
            Objective::new("One", "", 1),
            Objective::new("Two", "", 2),
        ]);
        t.switch_objective(1).unwrap();

        let replacement = [Objective::new("Three", "third", 3)];
        t.set_objectives(&replacement[..]);
        assert_eq!(t.objectives.len(), 1);
        assert_eq!(t.objectives[0].name.as_str(), "Three");
        assert_eq!(t.active_objective_index, 0);
    }

    #[test]
    fn test_interval_runs_in_lockstep() {
        let mut t = Tracker::new("Plank");
        t.start_interval("Hold", 30, 2);
        assert!(!t.interval.running);

        t.resume();
        assert!(t.interval.running);
        t.update(30.0);
        assert_eq!(t.score, INTERVAL_BONUS);
        assert_eq!(t.combo, 1);
        assert_eq!(t.completed_intervals, 1);

        t.pause();
        assert!(!t.interval.running);
        t.resume();
        t.update(30.0);
        assert_eq!(t.completed_intervals, 2);
        assert!(!t.interval.has_interval);
        assert!(!t.interval.running);
    }

    #[test]
    fn test_goal() {
        let mut t = resumed("Goal");
        assert!(!t.goal_reached());
        t.set_goal(15);
        t.increment(10);
        assert!(!t.goal_reached());
        t.increment(5);
        assert!(t.goal_reached());
        t.clear_goal();
        assert!(!t.goal_reached());
    }

    #[test]
    fn test_toggle_pause() {
        let mut t = Tracker::new("T");
        t.toggle_pause();
        assert!(!t.paused);
        t.toggle_pause();
        assert!(t.paused);
    }
}
