//! Power state definition
//!
//! The cycle has no terminal state.

use super::events::PowerEvent;

/// Device power states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Normal operation
    #[default]
    Awake,
    /// Idle longer than the sleep timeout; front ends may dim or sleep
    LowPower,
}

impl PowerState {
    /// Check if the front end may drop into its low power mode
    pub fn is_low_power(&self) -> bool {
        matches!(self, PowerState::LowPower)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: PowerEvent) -> Self {
        use PowerEvent::*;
        use PowerState::*;

        match (self, event) {
            (Awake, IdleTimeout) => LowPower,
            (LowPower, Interaction) => Awake,

            // Default: stay in current state
            _ => self,
        }
    }
}
