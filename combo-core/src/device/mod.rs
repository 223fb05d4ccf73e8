//! Device counter collection
//!
//! Fixed-capacity ordered counters with a selection cursor, uptime and
//! idle tracking.

pub mod collection;

pub use collection::{Device, DeviceError, DEFAULT_SLEEP_TIMEOUT_MS, MAX_COUNTERS};
