//! Storage backends
//!
//! [`FileStorage`] keeps one file per key in a directory. [`MemoryFlash`]
//! simulates a small flash region with a fixed capacity, which is what the
//! firmware sees.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use combo_hal::{FlashError, FlashStorage, StorageKey};

/// Directory-backed storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the storage directory, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    pub fn path(&self, key: StorageKey) -> PathBuf {
        self.root.join(key.file_name())
    }
}

impl FlashStorage for FileStorage {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let data = fs::read(self.path(key)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FlashError::NotFound,
            _ => {
                warn!("Read of {:?} failed: {}", key, e);
                FlashError::Flash
            }
        })?;

        if data.len() > buffer.len() {
            return Err(FlashError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(&data);
        Ok(data.len())
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        fs::write(self.path(key), data).map_err(|e| {
            warn!("Write of {:?} failed: {}", key, e);
            FlashError::Flash
        })?;
        debug!("Wrote {} bytes to {:?}", data.len(), key);
        Ok(())
    }

    fn exists(&mut self, key: StorageKey) -> bool {
        self.path(key).is_file()
    }

    fn erase_all(&mut self) -> Result<(), FlashError> {
        for key in StorageKey::ALL {
            match fs::remove_file(self.path(key)) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(_) => return Err(FlashError::Storage),
            }
        }
        Ok(())
    }
}

/// In-memory flash region
///
/// Every stored blob counts against `capacity`, so an oversized write
/// fails with [`FlashError::Full`] and leaves the old value in place.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlash {
    capacity: usize,
    entries: HashMap<StorageKey, Vec<u8>>,
}

impl MemoryFlash {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
        }
    }

    /// Bytes currently stored
    pub fn used(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Direct access to a stored blob, for fault injection in tests
    pub fn raw_mut(&mut self, key: StorageKey) -> Option<&mut Vec<u8>> {
        self.entries.get_mut(&key)
    }
}

impl FlashStorage for MemoryFlash {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let data = self.entries.get(&key).ok_or(FlashError::NotFound)?;
        if data.len() > buffer.len() {
            return Err(FlashError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        let replaced = self.entries.get(&key).map_or(0, Vec::len);
        if self.used() - replaced + data.len() > self.capacity {
            return Err(FlashError::Full);
        }
        self.entries.insert(key, data.to_vec());
        Ok(())
    }

    fn exists(&mut self, key: StorageKey) -> bool {
        self.entries.contains_key(&key)
    }

    fn erase_all(&mut self) -> Result<(), FlashError> {
        self.entries.clear();
        Ok(())
    }
}
