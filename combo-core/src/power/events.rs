//! Events that trigger power state transitions

/// Events that can trigger power state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerEvent {
    /// Time since the last interaction exceeded the sleep timeout
    IdleTimeout,
    /// User input, selection or any other interaction call
    Interaction,
}

impl PowerEvent {
    /// Check if this event is user-initiated
    pub fn is_user_event(&self) -> bool {
        matches!(self, PowerEvent::Interaction)
    }
}
