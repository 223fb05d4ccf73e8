//! Single tracked quantities
//!
//! A counter has a behavior mode fixed at creation, a quality-weighted
//! increment and running statistics.

pub mod quality;
pub mod state;

pub use quality::{CounterType, Quality};
pub use state::{Counter, CounterSettings, MAX_LABEL_LEN};
