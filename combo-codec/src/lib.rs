//! Combo persistence formats
//!
//! Three little-endian binary layouts share one reader/writer pair:
//!
//! ```text
//! Counter file      [i32 count][count × 63-byte counter record]
//!
//! PersistentData    [u32 magic][u16 version][i32 count][u32 current]
//!                   [u32 uptime_ms][u32 sleep_timeout_ms]
//!                   [count × counter record][u16 checksum]
//!
//! Tracker file      [i32 count][count × tracker record (variable length)]
//! ```
//!
//! Variable-length text is written as `[u32 len][bytes]` with no
//! terminator. Fixed text fields occupy their whole buffer, NUL padded.
//!
//! Loaders never fail on short input: they return every entry that was
//! read completely, flagging the rest as truncated. Only the checksummed
//! `PersistentData` record is all-or-nothing.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod buffer;
pub mod checksum;
pub mod counter;
pub mod loaded;
pub mod persistent;
pub mod tracker;

pub use buffer::{ByteReader, ByteWriter, CodecError};
pub use checksum::checksum;
pub use counter::{decode_counters, encode_counters, COUNTER_RECORD_SIZE};
pub use loaded::Loaded;
pub use persistent::{PersistentData, PERSISTENT_DATA_MAX_SIZE, PERSISTENT_MAGIC, PERSISTENT_VERSION};
pub use tracker::{decode_trackers, encode_trackers};
