//! Host-side storage for the combo counter engine
//!
//! Used by the desktop and raylib front ends and by the simulator:
//!
//! - [`file`] - save and load counter and tracker collections by path
//! - [`storage`] - [`FlashStorage`](combo_hal::FlashStorage) backends over a
//!   directory or an in-memory region
//! - [`persistence`] - device, tracker and config persistence over any backend
//! - [`config`] - TOML device configuration
//!
//! Loads degrade instead of failing: a missing file is a first run and a
//! damaged one yields whatever could be recovered. Both cases are logged
//! through the `log` facade.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod file;
pub mod persistence;
pub mod storage;

pub use config::{load_config_file, load_config_or_default, parse_config};
pub use error::{Result, StoreError};
pub use file::{load_counters, load_trackers, save_counters, save_trackers};
pub use persistence::DevicePersistence;
pub use storage::{FileStorage, MemoryFlash};
