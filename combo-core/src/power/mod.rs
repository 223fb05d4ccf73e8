//! Power state machine
//!
//! Derived idle/low-power state of the device. Transitions are pure; no
//! hardware action happens at this layer.

pub mod events;
pub mod machine;

pub use events::PowerEvent;
pub use machine::PowerState;
