//! Configuration types
//!
//! Board-agnostic device configuration, stored as postcard binary data on
//! flash or parsed from TOML by host front ends.

pub mod presets;
pub mod types;

pub use presets::Preset;
pub use types::*;
