//! Counter behavior modes and action quality levels

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counter behavior mode
///
/// Fixed when the counter is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum CounterType {
    /// Plain tally; misses are ignored
    #[default]
    Simple = 0,
    /// Streak with a growing multiplier; a miss can break it
    Combo = 1,
    /// Slower multiplier growth that decays back over time
    Timed = 2,
    /// Displayed value mirrors the lifetime total
    Accumulator = 3,
}

impl CounterType {
    /// Get the type as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a type from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CounterType::Simple),
            1 => Some(CounterType::Combo),
            2 => Some(CounterType::Timed),
            3 => Some(CounterType::Accumulator),
            _ => None,
        }
    }

    /// Short display name
    pub fn name(self) -> &'static str {
        match self {
            CounterType::Simple => "Simple",
            CounterType::Combo => "Combo",
            CounterType::Timed => "Timed",
            CounterType::Accumulator => "Accum",
        }
    }
}

/// Quality of a single action, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Quality {
    Miss = 0,
    Partial = 1,
    Good = 2,
    Perfect = 3,
}

impl Quality {
    /// All levels, worst first
    pub const ALL: [Quality; 4] = [
        Quality::Miss,
        Quality::Partial,
        Quality::Good,
        Quality::Perfect,
    ];

    /// Numeric weight used in score math (0..=3)
    pub const fn weight(self) -> i32 {
        self as i32
    }

    /// Create a quality from its weight
    pub fn from_weight(weight: i32) -> Option<Self> {
        match weight {
            0 => Some(Quality::Miss),
            1 => Some(Quality::Partial),
            2 => Some(Quality::Good),
            3 => Some(Quality::Perfect),
            _ => None,
        }
    }

    pub fn is_miss(self) -> bool {
        self == Quality::Miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_ordering() {
        assert!(Quality::Miss < Quality::Partial);
        assert!(Quality::Partial < Quality::Good);
        assert!(Quality::Good < Quality::Perfect);
    }

    #[test]
    fn test_quality_weights() {
        for (i, q) in Quality::ALL.iter().enumerate() {
            assert_eq!(q.weight(), i as i32);
            assert_eq!(Quality::from_weight(i as i32), Some(*q));
        }
        assert_eq!(Quality::from_weight(4), None);
    }

    #[test]
    fn test_counter_type_bytes() {
        for b in 0..4u8 {
            let t = CounterType::from_u8(b).unwrap();
            assert_eq!(t.as_u8(), b);
        }
        assert_eq!(CounterType::from_u8(9), None);
    }
}
