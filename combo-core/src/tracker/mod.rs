//! Legacy combo trackers
//!
//! The older score model used by the desktop and raylib front ends: a
//! pausable score with a decaying combo multiplier, a list of objectives and
//! a repeating interval timer.

pub mod combo;
pub mod interval;
pub mod objective;

pub use combo::{Tracker, TrackerError, MAX_TRACKER_LABEL_LEN};
pub use interval::{IntervalTracker, MAX_INTERVAL_LABEL_LEN};
pub use objective::{Objective, MAX_OBJECTIVE_DESC_LEN, MAX_OBJECTIVE_NAME_LEN};
