//! Counter state and mutation rules

use heapless::String;

use super::quality::{CounterType, Quality};
use crate::text::truncated;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum visible label length (the stored buffer adds a terminator)
pub const MAX_LABEL_LEN: usize = 15;

/// Scale applied to the quality weight in score math
pub const QUALITY_SCALE: f32 = 0.33;

/// Multiplier gained per unit of scaled quality, Combo type
pub const COMBO_MULTIPLIER_STEP: f32 = 0.1;

/// Multiplier gained per unit of scaled quality, Timed type
pub const TIMED_MULTIPLIER_STEP: f32 = 0.05;

/// Baseline multiplier
pub const BASE_MULTIPLIER: f32 = 1.0;

/// Per-counter configuration
///
/// Set at creation and changed only through [`Counter::configure`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CounterSettings {
    /// Base points per action
    pub increment_amount: i32,
    /// Multiplier lost per second (Timed type)
    pub decay_rate: f32,
    /// Upper bound of the multiplier
    pub max_multiplier: f32,
    /// Whether a miss resets a Combo counter
    pub breaks_on_miss: bool,
}

impl Default for CounterSettings {
    fn default() -> Self {
        Self {
            increment_amount: 1,
            decay_rate: 0.1,
            max_multiplier: 5.0,
            breaks_on_miss: true,
        }
    }
}

/// A single tracked quantity
///
/// Mutating an inactive counter is a silent no-op, not an error. Front ends
/// and presets rely on being able to call into disabled counters freely.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Counter {
    /// Display name
    pub label: String<MAX_LABEL_LEN>,
    /// Behavior mode
    pub counter_type: CounterType,
    /// Running value
    pub count: i32,
    /// Lifetime accumulation, never decreases
    pub total: i32,
    /// Highest `count` seen (Combo type)
    pub max_combo: i32,
    /// Score multiplier in `[1.0, max_multiplier]`
    pub multiplier: f32,
    pub increment_amount: i32,
    pub decay_rate: f32,
    pub max_multiplier: f32,
    pub breaks_on_miss: bool,
    pub perfect_count: u32,
    pub good_count: u32,
    pub partial_count: u32,
    pub miss_count: u32,
    /// Whether the counter takes part in updates and display
    pub active: bool,
}

impl Default for Counter {
    fn default() -> Self {
        Self::new("", CounterType::Simple)
    }
}

impl Counter {
    /// Create a counter with default settings
    ///
    /// Labels longer than [`MAX_LABEL_LEN`] are cut without error.
    pub fn new(label: &str, counter_type: CounterType) -> Self {
        Self::with_settings(label, counter_type, CounterSettings::default())
    }

    /// Create a counter with explicit settings
    pub fn with_settings(label: &str, counter_type: CounterType, settings: CounterSettings) -> Self {
        let mut counter = Self {
            label: truncated(label),
            counter_type,
            count: 0,
            total: 0,
            max_combo: 0,
            multiplier: BASE_MULTIPLIER,
            increment_amount: 0,
            decay_rate: 0.0,
            max_multiplier: BASE_MULTIPLIER,
            breaks_on_miss: false,
            perfect_count: 0,
            good_count: 0,
            partial_count: 0,
            miss_count: 0,
            active: true,
        };
        counter.configure(settings);
        counter
    }

    /// Current configuration
    pub fn settings(&self) -> CounterSettings {
        CounterSettings {
            increment_amount: self.increment_amount,
            decay_rate: self.decay_rate,
            max_multiplier: self.max_multiplier,
            breaks_on_miss: self.breaks_on_miss,
        }
    }

    /// Replace the configuration
    ///
    /// `max_multiplier` is raised to at least 1.0 and a negative decay rate
    /// becomes 0. The current multiplier is pulled back inside the new bound.
    pub fn configure(&mut self, settings: CounterSettings) {
        self.increment_amount = settings.increment_amount;
        self.decay_rate = settings.decay_rate.max(0.0);
        self.max_multiplier = settings.max_multiplier.max(BASE_MULTIPLIER);
        self.breaks_on_miss = settings.breaks_on_miss;
        self.multiplier = self.multiplier.clamp(BASE_MULTIPLIER, self.max_multiplier);
    }

    /// Enable or disable the counter
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Apply one action of the given quality
    pub fn increment(&mut self, quality: Quality) {
        if !self.active {
            return;
        }

        self.tally(quality);
        let weight = quality.weight();

        match self.counter_type {
            CounterType::Simple => {
                if !quality.is_miss() {
                    self.add_points(self.increment_amount);
                }
            }
            CounterType::Combo => {
                if quality.is_miss() {
                    if self.breaks_on_miss {
                        self.count = 0;
                        self.multiplier = BASE_MULTIPLIER;
                    }
                } else {
                    let points = self.points(weight);
                    self.add_points(points);
                    self.raise_multiplier(COMBO_MULTIPLIER_STEP * weight as f32 * QUALITY_SCALE);
                    self.max_combo = self.max_combo.max(self.count);
                }
            }
            CounterType::Timed => {
                // A miss contributes nothing but never breaks the streak
                if !quality.is_miss() {
                    let points = self.points(weight);
                    self.add_points(points);
                    self.raise_multiplier(TIMED_MULTIPLIER_STEP * weight as f32 * QUALITY_SCALE);
                }
            }
            CounterType::Accumulator => {
                if !quality.is_miss() {
                    self.total = self
                        .total
                        .saturating_add(self.increment_amount.saturating_mul(weight));
                }
                self.count = self.total;
            }
        }
    }

    /// Lower the count, flooring at zero
    ///
    /// A Combo counter also loses its multiplier. Accumulator counts mirror
    /// their total and are left alone.
    pub fn decrement(&mut self, amount: i32) {
        if !self.active || self.counter_type == CounterType::Accumulator {
            return;
        }

        self.count = self.count.saturating_sub(amount).max(0);
        if self.counter_type == CounterType::Combo {
            self.multiplier = BASE_MULTIPLIER;
        }
    }

    /// Adjust the count directly by a signed amount
    ///
    /// Positive amounts also count toward the total. An Accumulator only
    /// takes positive amounts, keeping `count == total`.
    pub fn add_raw(&mut self, amount: i32) {
        if !self.active {
            return;
        }

        if amount > 0 {
            self.total = self.total.saturating_add(amount);
        }
        self.count = if self.counter_type == CounterType::Accumulator {
            self.total
        } else {
            self.count.saturating_add(amount).max(0)
        };
    }

    /// Periodic multiplier decay for Timed counters
    ///
    /// A step that is not a positive finite time is ignored.
    ///
    /// # Arguments
    /// - `dt_s`: Seconds elapsed since the previous call
    pub fn decay(&mut self, dt_s: f32) {
        if !self.active || !dt_s.is_finite() || dt_s <= 0.0 {
            return;
        }
        if self.counter_type != CounterType::Timed || self.multiplier <= BASE_MULTIPLIER {
            return;
        }

        self.multiplier = (self.multiplier - self.decay_rate * dt_s).max(BASE_MULTIPLIER);
    }

    /// Clear the running value and multiplier
    ///
    /// Total and quality tallies are lifetime statistics and survive.
    pub fn reset(&mut self) {
        if !self.active {
            return;
        }

        self.count = if self.counter_type == CounterType::Accumulator {
            self.total
        } else {
            0
        };
        self.multiplier = BASE_MULTIPLIER;
    }

    /// Number of actions recorded at any quality
    pub fn total_actions(&self) -> u32 {
        self.perfect_count
            .saturating_add(self.good_count)
            .saturating_add(self.partial_count)
            .saturating_add(self.miss_count)
    }

    /// Share of actions that were Good or Perfect (0.0 when none)
    pub fn accuracy(&self) -> f32 {
        let actions = self.total_actions();
        if actions == 0 {
            return 0.0;
        }
        (self.perfect_count + self.good_count) as f32 / actions as f32
    }

    /// Mean quality weight over all actions (0.0 when none)
    pub fn average_quality(&self) -> f32 {
        let actions = self.total_actions();
        if actions == 0 {
            return 0.0;
        }
        let weighted = self.perfect_count as f32 * Quality::Perfect.weight() as f32
            + self.good_count as f32 * Quality::Good.weight() as f32
            + self.partial_count as f32 * Quality::Partial.weight() as f32;
        weighted / actions as f32
    }

    fn tally(&mut self, quality: Quality) {
        let slot = match quality {
            Quality::Perfect => &mut self.perfect_count,
            Quality::Good => &mut self.good_count,
            Quality::Partial => &mut self.partial_count,
            Quality::Miss => &mut self.miss_count,
        };
        *slot = slot.saturating_add(1);
    }

    fn points(&self, weight: i32) -> i32 {
        let raw = self.increment_amount as f32 * self.multiplier * weight as f32 * QUALITY_SCALE;
        libm::roundf(raw) as i32
    }

    fn add_points(&mut self, points: i32) {
        self.count = self.count.saturating_add(points);
        self.total = self.total.saturating_add(points);
    }

    fn raise_multiplier(&mut self, step: f32) {
        self.multiplier = (self.multiplier + step).min(self.max_multiplier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn quality() -> impl Strategy<Value = Quality> {
        (0..4i32).prop_map(|w| Quality::from_weight(w).unwrap())
    }

    #[test]
    fn test_defaults() {
        let c = Counter::new("Pushups", CounterType::Combo);
        assert_eq!(c.label.as_str(), "Pushups");
        assert_eq!(c.increment_amount, 1);
        assert_eq!(c.max_multiplier, 5.0);
        assert_eq!(c.decay_rate, 0.1);
        assert_eq!(c.multiplier, 1.0);
        assert!(c.breaks_on_miss);
        assert!(c.active);
        assert_eq!(c.count, 0);
        assert_eq!(c.total, 0);
    }

    #[test]
    fn test_label_truncated() {
        let c = Counter::new("Morning breathing exercise", CounterType::Timed);
        assert_eq!(c.label.as_str(), "Morning breathi");
    }

    #[test]
    fn test_simple_ignores_miss() {
        let mut c = Counter::new("Water", CounterType::Simple);
        c.increment(Quality::Good);
        c.increment(Quality::Partial);
        assert_eq!(c.count, 2);
        c.increment(Quality::Miss);
        assert_eq!(c.count, 2);
        assert_eq!(c.total, 2);
        assert_eq!(c.miss_count, 1);
    }

    #[test]
    fn test_combo_points_and_multiplier() {
        let mut c = Counter::new("Squats", CounterType::Combo);
        c.increment(Quality::Perfect);
        // round(1 * 1.0 * 3 * 0.33) = 1
        assert_eq!(c.count, 1);
        assert!((c.multiplier - 1.099).abs() < 1e-4);
        assert_eq!(c.max_combo, 1);
    }

    #[test]
    fn test_combo_miss_breaks() {
        let mut c = Counter::new("Squats", CounterType::Combo);
        for _ in 0..10 {
            c.increment(Quality::Perfect);
        }
        assert!(c.count > 0);
        assert!(c.multiplier > 1.0);
        let total = c.total;

        c.increment(Quality::Miss);
        assert_eq!(c.count, 0);
        assert_eq!(c.multiplier, 1.0);
        assert_eq!(c.total, total);
        assert!(c.max_combo > 0);
    }

    #[test]
    fn test_combo_miss_without_break() {
        let mut c = Counter::new("Squats", CounterType::Combo);
        c.configure(CounterSettings {
            breaks_on_miss: false,
            ..c.settings()
        });
        c.increment(Quality::Perfect);
        c.increment(Quality::Perfect);
        let (count, mult) = (c.count, c.multiplier);
        c.increment(Quality::Miss);
        assert_eq!(c.count, count);
        assert_eq!(c.multiplier, mult);
    }

    #[test]
    fn test_timed_miss_never_resets() {
        let mut c = Counter::new("Breath", CounterType::Timed);
        c.increment(Quality::Perfect);
        c.increment(Quality::Perfect);
        let (count, mult) = (c.count, c.multiplier);
        assert!((mult - (1.0 + 2.0 * 0.05 * 3.0 * 0.33)).abs() < 1e-4);
        c.increment(Quality::Miss);
        assert_eq!(c.count, count);
        assert_eq!(c.multiplier, mult);
    }

    #[test]
    fn test_timed_decay_floors_at_one() {
        let mut c = Counter::new("Breath", CounterType::Timed);
        for _ in 0..5 {
            c.increment(Quality::Perfect);
        }
        let before = c.multiplier;
        c.decay(0.5);
        assert!((c.multiplier - (before - 0.05)).abs() < 1e-4);
        c.decay(100.0);
        assert_eq!(c.multiplier, 1.0);
    }

    #[test]
    fn test_decay_ignores_backwards_time() {
        let mut c = Counter::new("Breath", CounterType::Timed);
        c.increment(Quality::Perfect);
        let mult = c.multiplier;
        c.decay(-100.0);
        assert_eq!(c.multiplier, mult);
        c.decay(f32::NAN);
        assert_eq!(c.multiplier, mult);
        assert!(c.multiplier <= c.max_multiplier);
    }

    #[test]
    fn test_decay_only_timed() {
        let mut c = Counter::new("Squats", CounterType::Combo);
        c.increment(Quality::Perfect);
        let mult = c.multiplier;
        c.decay(10.0);
        assert_eq!(c.multiplier, mult);
    }

    #[test]
    fn test_accumulator_mirrors_total() {
        let mut c = Counter::new("Steps", CounterType::Accumulator);
        c.increment(Quality::Perfect);
        c.increment(Quality::Partial);
        c.increment(Quality::Miss);
        assert_eq!(c.total, 4);
        assert_eq!(c.count, c.total);
    }

    #[test]
    fn test_decrement_floor_and_combo_reset() {
        let mut c = Counter::new("Squats", CounterType::Combo);
        c.add_raw(3);
        c.increment(Quality::Good);
        assert!(c.multiplier > 1.0);
        c.decrement(100);
        assert_eq!(c.count, 0);
        assert_eq!(c.multiplier, 1.0);

        let mut s = Counter::new("Water", CounterType::Simple);
        s.add_raw(5);
        s.decrement(2);
        assert_eq!(s.count, 3);
        assert_eq!(s.total, 5);
    }

    #[test]
    fn test_add_raw() {
        let mut c = Counter::new("Water", CounterType::Simple);
        c.add_raw(4);
        assert_eq!((c.count, c.total), (4, 4));
        c.add_raw(-10);
        assert_eq!((c.count, c.total), (0, 4));
    }

    #[test]
    fn test_inactive_is_noop() {
        let mut c = Counter::new("Off", CounterType::Combo);
        c.set_active(false);
        c.increment(Quality::Perfect);
        c.add_raw(5);
        c.decrement(1);
        assert_eq!(c.count, 0);
        assert_eq!(c.total, 0);
        assert_eq!(c.total_actions(), 0);

        let mut t = Counter::new("Paused", CounterType::Timed);
        t.increment(Quality::Perfect);
        let mult = t.multiplier;
        t.set_active(false);
        t.decay(100.0);
        assert_eq!(t.multiplier, mult);
    }

    #[test]
    fn test_statistics() {
        let mut c = Counter::new("Reps", CounterType::Simple);
        assert_eq!(c.accuracy(), 0.0);
        assert_eq!(c.average_quality(), 0.0);

        c.increment(Quality::Perfect);
        c.increment(Quality::Good);
        c.increment(Quality::Partial);
        c.increment(Quality::Miss);
        assert_eq!(c.accuracy(), 0.5);
        assert_eq!(c.average_quality(), 1.5);
    }

    #[test]
    fn test_configure_clamps_multiplier() {
        let mut c = Counter::new("Squats", CounterType::Combo);
        for _ in 0..50 {
            c.increment(Quality::Perfect);
        }
        c.configure(CounterSettings {
            max_multiplier: 2.0,
            ..c.settings()
        });
        assert_eq!(c.multiplier, 2.0);

        c.configure(CounterSettings {
            max_multiplier: 0.5,
            decay_rate: -1.0,
            ..c.settings()
        });
        assert_eq!(c.max_multiplier, 1.0);
        assert_eq!(c.decay_rate, 0.0);
        assert_eq!(c.multiplier, 1.0);
    }

    #[test]
    fn test_reset_keeps_lifetime_stats() {
        let mut c = Counter::new("Squats", CounterType::Combo);
        c.increment(Quality::Perfect);
        c.increment(Quality::Perfect);
        let total = c.total;
        c.reset();
        assert_eq!(c.count, 0);
        assert_eq!(c.multiplier, 1.0);
        assert_eq!(c.total, total);
        assert_eq!(c.perfect_count, 2);
    }

    proptest! {
        #[test]
        fn prop_perfect_streak_bounded(n in 1usize..200) {
            let mut c = Counter::new("Streak", CounterType::Combo);
            let mut last = c.multiplier;
            for _ in 0..n {
                c.increment(Quality::Perfect);
                prop_assert!(c.multiplier >= last);
                prop_assert!(c.multiplier <= c.max_multiplier);
                last = c.multiplier;
            }
        }

        #[test]
        fn prop_accumulator_count_equals_total(
            ops in proptest::collection::vec((0u8..3, quality(), -20i32..20), 0..100),
        ) {
            let mut c = Counter::new("Acc", CounterType::Accumulator);
            for (op, q, amount) in ops {
                match op {
                    0 => c.increment(q),
                    1 => c.decrement(amount.abs()),
                    _ => c.add_raw(amount),
                }
                prop_assert_eq!(c.count, c.total);
            }
        }

        #[test]
        fn prop_multiplier_and_total_invariants(
            kind in 0u8..4,
            ops in proptest::collection::vec((0u8..4, quality(), -20i32..20), 0..100),
        ) {
            let mut c = Counter::new("Any", CounterType::from_u8(kind).unwrap());
            let mut total = c.total;
            for (op, q, amount) in ops {
                match op {
                    0 => c.increment(q),
                    1 => c.decrement(amount.abs()),
                    2 => c.add_raw(amount),
                    _ => c.decay(amount as f32 * 0.1),
                }
                prop_assert!(c.multiplier >= 1.0);
                prop_assert!(c.multiplier <= c.max_multiplier);
                prop_assert!(c.total >= total);
                total = c.total;
            }
        }
    }
}
