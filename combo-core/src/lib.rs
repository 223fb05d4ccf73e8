//! Board-agnostic core logic for the combo counter gadget
//!
//! This crate contains all engine logic shared by every front end:
//!
//! - Counters with quality-weighted increments and combo multipliers
//! - The device counter collection with navigation and idle tracking
//! - Power state machine (awake / low power)
//! - Legacy combo trackers with objectives and interval timers
//! - Configuration types and counter presets
//!
//! Every operation runs synchronously to completion. Callers own the
//! instances they mutate; nothing here is global.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod counter;
pub mod device;
pub mod power;
pub mod text;
pub mod tracker;

pub use counter::{Counter, CounterSettings, CounterType, Quality};
pub use device::{Device, DeviceError};
pub use power::{PowerEvent, PowerState};
pub use tracker::{IntervalTracker, Objective, Tracker, TrackerError};
