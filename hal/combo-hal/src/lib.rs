//! Combo Hardware Abstraction Layer
//!
//! Storage traits implemented by each front end: the nRF52840 firmware maps
//! them onto its flash region, the desktop builds onto plain files.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Front ends (firmware, desktop, sim)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  combo-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  FileStorage  │       │  MemoryFlash  │
//! │ (combo-store) │       │ (combo-store) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`flash::FlashStorage`] - Persistent key-value storage

#![no_std]
#![deny(unsafe_code)]

pub mod flash;

pub use flash::{FlashError, FlashStorage, StorageKey};
