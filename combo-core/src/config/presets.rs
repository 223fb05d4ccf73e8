//! Counter presets
//!
//! Ready-made counter type and settings pairs for the common activities
//! front ends offer in their "new counter" menus.

use crate::counter::{Counter, CounterSettings, CounterType};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Built-in counter presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Preset {
    /// Strength reps: combo streaks, a miss breaks the chain
    #[default]
    Reps,
    /// Breathing cycles: slow multiplier that fades between sessions
    Breathing,
    /// Daily habit check-off
    Habit,
    /// Running total (water, steps)
    Hydration,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Reps,
        Preset::Breathing,
        Preset::Habit,
        Preset::Hydration,
    ];

    pub fn counter_type(self) -> CounterType {
        match self {
            Preset::Reps => CounterType::Combo,
            Preset::Breathing => CounterType::Timed,
            Preset::Habit => CounterType::Simple,
            Preset::Hydration => CounterType::Accumulator,
        }
    }

    pub fn settings(self) -> CounterSettings {
        let defaults = CounterSettings::default();
        match self {
            Preset::Reps => defaults,
            Preset::Breathing => CounterSettings {
                decay_rate: 0.05,
                max_multiplier: 3.0,
                breaks_on_miss: false,
                ..defaults
            },
            Preset::Habit => CounterSettings {
                breaks_on_miss: false,
                ..defaults
            },
            Preset::Hydration => CounterSettings {
                increment_amount: 250,
                max_multiplier: 1.0,
                breaks_on_miss: false,
                ..defaults
            },
        }
    }

    /// Label used when the caller does not supply one
    pub fn default_label(self) -> &'static str {
        match self {
            Preset::Reps => "Reps",
            Preset::Breathing => "Breaths",
            Preset::Habit => "Habit",
            Preset::Hydration => "Water ml",
        }
    }

    /// Build a counter from this preset
    pub fn build(self, label: Option<&str>) -> Counter {
        Counter::with_settings(
            label.unwrap_or(self.default_label()),
            self.counter_type(),
            self.settings(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::Quality;

    #[test]
    fn test_preset_types() {
        assert_eq!(Preset::Reps.counter_type(), CounterType::Combo);
        assert_eq!(Preset::Breathing.counter_type(), CounterType::Timed);
        assert_eq!(Preset::Habit.counter_type(), CounterType::Simple);
        assert_eq!(Preset::Hydration.counter_type(), CounterType::Accumulator);
    }

    #[test]
    fn test_build_uses_default_label() {
        let c = Preset::Breathing.build(None);
        assert_eq!(c.label.as_str(), "Breaths");
        assert_eq!(c.max_multiplier, 3.0);
        assert_eq!(c.decay_rate, 0.05);
    }

    #[test]
    fn test_hydration_accumulates() {
        let mut c = Preset::Hydration.build(Some("Water"));
        c.increment(Quality::Partial);
        c.increment(Quality::Partial);
        assert_eq!(c.total, 500);
        assert_eq!(c.count, 500);
    }
}
