//! Counter collection with navigation and power derivation

use core::fmt;

use heapless::Vec;

use crate::config::{DeviceConfig, Preset};
use crate::counter::{Counter, CounterType, Quality};
use crate::power::{PowerEvent, PowerState};

/// Maximum number of counters on a device
pub const MAX_COUNTERS: usize = 8;

/// Default idle time before low power mode
pub const DEFAULT_SLEEP_TIMEOUT_MS: u32 = 30_000;

/// Errors from collection operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// Collection already holds [`MAX_COUNTERS`] counters
    CapacityExceeded,
    /// Index outside the live range
    InvalidIndex,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::CapacityExceeded => f.write_str("collection full"),
            DeviceError::InvalidIndex => f.write_str("invalid index"),
        }
    }
}

impl core::error::Error for DeviceError {}

/// The device's counters plus timing state
///
/// `current` always points into the live range when the collection is
/// non-empty, and is 0 otherwise.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Device {
    counters: Vec<Counter, MAX_COUNTERS>,
    current: usize,
    uptime_ms: u32,
    last_interaction_ms: u32,
    sleep_timeout_ms: u32,
    power: PowerState,
}

impl Default for Device {
    fn default() -> Self {
        Self::new()
    }
}

impl Device {
    /// Create an empty device
    pub fn new() -> Self {
        Self {
            counters: Vec::new(),
            current: 0,
            uptime_ms: 0,
            last_interaction_ms: 0,
            sleep_timeout_ms: DEFAULT_SLEEP_TIMEOUT_MS,
            power: PowerState::Awake,
        }
    }

    /// Create a device holding the configured counters
    ///
    /// Configs past capacity are ignored.
    pub fn from_config(config: &DeviceConfig) -> Self {
        let mut device = Self::new();
        device.sleep_timeout_ms = config.sleep_timeout_ms();
        for counter in config.counters.iter().map(|c| c.build()) {
            if device.counters.push(counter).is_err() {
                break;
            }
        }
        device
    }

    /// Rebuild a device from persisted parts
    ///
    /// Counters past capacity are dropped and the cursor is clamped into
    /// range. The restored device starts awake with the interaction clock at
    /// the restored uptime.
    pub fn restore<I>(counters: I, current: usize, uptime_ms: u32, sleep_timeout_ms: u32) -> Self
    where
        I: IntoIterator<Item = Counter>,
    {
        let mut device = Self::new();
        for counter in counters {
            if device.counters.push(counter).is_err() {
                break;
            }
        }
        device.current = current;
        device.clamp_current();
        device.uptime_ms = uptime_ms;
        device.last_interaction_ms = uptime_ms;
        device.sleep_timeout_ms = sleep_timeout_ms;
        device
    }

    /// Append a new counter
    ///
    /// Returns the index of the new counter.
    pub fn add(&mut self, label: &str, counter_type: CounterType) -> Result<usize, DeviceError> {
        self.add_counter(Counter::new(label, counter_type))
    }

    /// Append a counter built from a preset
    pub fn add_preset(&mut self, preset: Preset, label: Option<&str>) -> Result<usize, DeviceError> {
        self.add_counter(preset.build(label))
    }

    /// Append an existing counter
    pub fn add_counter(&mut self, counter: Counter) -> Result<usize, DeviceError> {
        self.counters
            .push(counter)
            .map_err(|_| DeviceError::CapacityExceeded)?;
        self.touch();
        Ok(self.counters.len() - 1)
    }

    /// Remove the counter at `index`, shifting later counters down
    pub fn remove(&mut self, index: usize) -> Result<Counter, DeviceError> {
        if index >= self.counters.len() {
            return Err(DeviceError::InvalidIndex);
        }

        let removed = self.counters.remove(index);
        self.clamp_current();
        self.touch();
        Ok(removed)
    }

    /// Select the counter at `index`
    pub fn select(&mut self, index: usize) -> Result<(), DeviceError> {
        if index >= self.counters.len() {
            return Err(DeviceError::InvalidIndex);
        }

        self.current = index;
        self.touch();
        Ok(())
    }

    /// Move the cursor forward, wrapping at the end
    pub fn next(&mut self) {
        let len = self.counters.len();
        if len == 0 {
            return;
        }
        self.current = (self.current + 1) % len;
        self.touch();
    }

    /// Move the cursor backward, wrapping at the start
    pub fn prev(&mut self) {
        let len = self.counters.len();
        if len == 0 {
            return;
        }
        self.current = (self.current + len - 1) % len;
        self.touch();
    }

    /// Record a user interaction
    pub fn touch(&mut self) {
        self.last_interaction_ms = self.uptime_ms;
        self.power = self.power.transition(PowerEvent::Interaction);
    }

    /// Apply an action to the selected counter
    pub fn increment_current(&mut self, quality: Quality) {
        self.touch();
        if let Some(counter) = self.current_mut() {
            counter.increment(quality);
        }
    }

    /// Lower the selected counter
    pub fn decrement_current(&mut self, amount: i32) {
        self.touch();
        if let Some(counter) = self.current_mut() {
            counter.decrement(amount);
        }
    }

    /// Adjust the selected counter directly
    pub fn add_raw_current(&mut self, amount: i32) {
        self.touch();
        if let Some(counter) = self.current_mut() {
            counter.add_raw(amount);
        }
    }

    /// Advance time
    ///
    /// Decays every active counter in insertion order, then re-derives the
    /// power state from the idle time.
    ///
    /// # Arguments
    /// - `delta_ms`: Time elapsed since last update
    pub fn update(&mut self, delta_ms: u32) {
        self.uptime_ms = self.uptime_ms.saturating_add(delta_ms);

        let dt_s = delta_ms as f32 / 1000.0;
        for counter in self.counters.iter_mut().filter(|c| c.active) {
            counter.decay(dt_s);
        }

        if self.idle_ms() >= self.sleep_timeout_ms {
            self.power = self.power.transition(PowerEvent::IdleTimeout);
        }
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    pub fn counter(&self, index: usize) -> Option<&Counter> {
        self.counters.get(index)
    }

    pub fn counter_mut(&mut self, index: usize) -> Option<&mut Counter> {
        self.counters.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.counters.is_full()
    }

    /// Index of the selected counter, if any
    pub fn current_index(&self) -> Option<usize> {
        (!self.counters.is_empty()).then_some(self.current)
    }

    pub fn current(&self) -> Option<&Counter> {
        self.counters.get(self.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut Counter> {
        self.counters.get_mut(self.current)
    }

    pub fn uptime_ms(&self) -> u32 {
        self.uptime_ms
    }

    /// Whole seconds since power-on
    pub fn device_uptime_sec(&self) -> u32 {
        self.uptime_ms / 1000
    }

    /// Time since the last interaction
    pub fn idle_ms(&self) -> u32 {
        self.uptime_ms.saturating_sub(self.last_interaction_ms)
    }

    pub fn sleep_timeout_ms(&self) -> u32 {
        self.sleep_timeout_ms
    }

    pub fn set_sleep_timeout_ms(&mut self, timeout_ms: u32) {
        self.sleep_timeout_ms = timeout_ms;
    }

    pub fn power_state(&self) -> PowerState {
        self.power
    }

    pub fn low_power_mode(&self) -> bool {
        self.power.is_low_power()
    }

    fn clamp_current(&mut self) {
        let len = self.counters.len();
        if len == 0 {
            self.current = 0;
        } else if self.current >= len {
            self.current = len - 1;
        }
    }
}
