//! Flash storage abstractions
//!
//! Provides traits for persistent key-value storage that can be implemented
//! over a flash region or a directory of files.

use core::fmt;

/// Storage keys for persisted data
///
/// Each key names one whole-record blob. Writes replace the blob; there is
/// no partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Device snapshot (checksummed `PersistentData` record)
    Device = 0,
    /// Legacy tracker collection
    Trackers = 1,
    /// Device configuration (binary postcard format)
    DeviceConfig = 2,
    /// Reserved for future use
    Reserved3 = 3,
}

impl StorageKey {
    /// All keys, in numeric order
    pub const ALL: [StorageKey; 4] = [
        StorageKey::Device,
        StorageKey::Trackers,
        StorageKey::DeviceConfig,
        StorageKey::Reserved3,
    ];

    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::Device),
            1 => Some(StorageKey::Trackers),
            2 => Some(StorageKey::DeviceConfig),
            3 => Some(StorageKey::Reserved3),
            _ => None,
        }
    }

    /// Conventional file name when the key is backed by a file
    pub fn file_name(self) -> &'static str {
        match self {
            StorageKey::Device => "device.bin",
            StorageKey::Trackers => "trackers.bin",
            StorageKey::DeviceConfig => "config.bin",
            StorageKey::Reserved3 => "reserved3.bin",
        }
    }
}

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Flash (or file) operation failed
    Flash,
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FlashError::Flash => "flash operation failed",
            FlashError::Storage => "storage operation failed",
            FlashError::NotFound => "key not found",
            FlashError::BufferTooSmall => "buffer too small",
            FlashError::Corrupted => "data corrupted",
            FlashError::Full => "storage full",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for FlashError {}

/// Persistent storage trait
///
/// Calls are blocking and complete before returning. Implementations
/// treat every write as a whole-blob replacement.
pub trait FlashStorage {
    /// Read a value by key into the provided buffer
    ///
    /// # Returns
    /// The number of bytes read, or an error.
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError>;

    /// Write a value by key
    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError>;

    /// Check if a key exists in storage
    fn exists(&mut self, key: StorageKey) -> bool;

    /// Erase all stored data
    fn erase_all(&mut self) -> Result<(), FlashError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_byte_roundtrip() {
        for key in StorageKey::ALL {
            assert_eq!(StorageKey::from_u8(key.as_u8()), Some(key));
        }
        assert_eq!(StorageKey::from_u8(4), None);
    }

    #[test]
    fn test_file_names_unique() {
        for (i, a) in StorageKey::ALL.iter().enumerate() {
            for b in &StorageKey::ALL[i + 1..] {
                assert_ne!(a.file_name(), b.file_name());
            }
        }
    }
}
