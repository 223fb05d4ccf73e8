//! Configuration type definitions

use core::fmt;

use heapless::{String, Vec};

use super::presets::Preset;
use crate::counter::{Counter, CounterSettings, MAX_LABEL_LEN};
use crate::device::{Device, MAX_COUNTERS};
use crate::text::truncated;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Default idle time before low power mode (seconds)
pub const DEFAULT_SLEEP_TIMEOUT_S: u32 = 30;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Config version mismatch
    VersionMismatch,
    /// Sleep timeout must be non-zero
    InvalidSleepTimeout,
    /// Increment amount must be positive
    InvalidIncrement,
    /// Multiplier bound below 1.0 or decay rate negative
    InvalidMultiplier,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::VersionMismatch => "config version mismatch",
            ConfigError::InvalidSleepTimeout => "sleep timeout must be non-zero",
            ConfigError::InvalidIncrement => "increment amount must be positive",
            ConfigError::InvalidMultiplier => "invalid multiplier or decay rate",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for ConfigError {}

/// One configured counter
///
/// Unset overrides fall back to the preset's settings.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CounterConfig {
    /// Display label (preset default when empty)
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: String<MAX_LABEL_LEN>,
    pub preset: Preset,
    #[cfg_attr(feature = "serde", serde(default))]
    pub increment_amount: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub decay_rate: Option<f32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_multiplier: Option<f32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub breaks_on_miss: Option<bool>,
}

impl CounterConfig {
    pub fn new(label: &str, preset: Preset) -> Self {
        Self {
            label: truncated(label),
            preset,
            ..Self::default()
        }
    }

    /// Preset settings with overrides applied
    pub fn settings(&self) -> CounterSettings {
        let base = self.preset.settings();
        CounterSettings {
            increment_amount: self.increment_amount.unwrap_or(base.increment_amount),
            decay_rate: self.decay_rate.unwrap_or(base.decay_rate),
            max_multiplier: self.max_multiplier.unwrap_or(base.max_multiplier),
            breaks_on_miss: self.breaks_on_miss.unwrap_or(base.breaks_on_miss),
        }
    }

    /// Build the configured counter
    pub fn build(&self) -> Counter {
        let label = if self.label.is_empty() {
            self.preset.default_label()
        } else {
            self.label.as_str()
        };
        Counter::with_settings(label, self.preset.counter_type(), self.settings())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let settings = self.settings();
        if settings.increment_amount <= 0 {
            return Err(ConfigError::InvalidIncrement);
        }
        let multiplier_ok = settings.max_multiplier >= 1.0;
        let decay_ok = settings.decay_rate >= 0.0;
        // NaN fails both comparisons
        if !multiplier_ok || !decay_ok {
            return Err(ConfigError::InvalidMultiplier);
        }
        Ok(())
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Config format version
    #[cfg_attr(feature = "serde", serde(default = "default_version"))]
    pub version: u8,
    /// Idle time before low power mode (seconds)
    #[cfg_attr(feature = "serde", serde(default = "default_sleep_timeout"))]
    pub sleep_timeout_s: u32,
    /// Counters created on first run
    #[cfg_attr(feature = "serde", serde(default))]
    pub counters: Vec<CounterConfig, MAX_COUNTERS>,
}

#[cfg(feature = "serde")]
fn default_version() -> u8 {
    CONFIG_VERSION
}

#[cfg(feature = "serde")]
fn default_sleep_timeout() -> u32 {
    DEFAULT_SLEEP_TIMEOUT_S
}

impl Default for DeviceConfig {
    /// One counter per preset
    fn default() -> Self {
        let mut counters = Vec::new();
        for preset in Preset::ALL {
            // ALL is shorter than MAX_COUNTERS
            let _ = counters.push(CounterConfig::new(preset.default_label(), preset));
        }
        Self {
            version: CONFIG_VERSION,
            sleep_timeout_s: DEFAULT_SLEEP_TIMEOUT_S,
            counters,
        }
    }
}

impl DeviceConfig {
    /// Check version and value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }
        if self.sleep_timeout_s == 0 {
            return Err(ConfigError::InvalidSleepTimeout);
        }
        self.counters.iter().try_for_each(CounterConfig::validate)
    }

    /// Sleep timeout in milliseconds
    pub fn sleep_timeout_ms(&self) -> u32 {
        self.sleep_timeout_s.saturating_mul(1000)
    }

    /// Build a fresh device holding the configured counters
    pub fn build_device(&self) -> Device {
        Device::from_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::CounterType;

    #[test]
    fn test_default_config_valid() {
        let config = DeviceConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.counters.len(), Preset::ALL.len());
        assert_eq!(config.sleep_timeout_ms(), 30_000);
    }

    #[test]
    fn test_overrides_apply() {
        let mut cc = CounterConfig::new("Pullups", Preset::Reps);
        cc.increment_amount = Some(2);
        cc.max_multiplier = Some(3.0);
        let c = cc.build();
        assert_eq!(c.counter_type, CounterType::Combo);
        assert_eq!(c.increment_amount, 2);
        assert_eq!(c.max_multiplier, 3.0);
        assert!(c.breaks_on_miss);
    }

    #[test]
    fn test_empty_label_uses_preset() {
        let cc = CounterConfig::new("", Preset::Habit);
        assert_eq!(cc.build().label.as_str(), "Habit");
    }

    #[test]
    fn test_validation_errors() {
        let mut config = DeviceConfig::default();
        config.sleep_timeout_s = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSleepTimeout));

        let mut config = DeviceConfig::default();
        config.version = 9;
        assert_eq!(config.validate(), Err(ConfigError::VersionMismatch));

        let mut config = DeviceConfig::default();
        config.counters[0].increment_amount = Some(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidIncrement));

        let mut config = DeviceConfig::default();
        config.counters[1].max_multiplier = Some(0.5);
        assert_eq!(config.validate(), Err(ConfigError::InvalidMultiplier));
    }
}
