//! Device, tracker and configuration persistence
//!
//! Works over any [`FlashStorage`]. Loads never fail: missing or damaged
//! data falls back to a fresh value and the reason is logged.

use log::{debug, info, warn};

use combo_codec::{decode_trackers, encode_trackers, PersistentData, PERSISTENT_DATA_MAX_SIZE};
use combo_core::config::DeviceConfig;
use combo_core::{Device, Tracker};
use combo_hal::{FlashError, FlashStorage, StorageKey};

use crate::error::{Result, StoreError};

/// Largest tracker blob accepted from storage
pub const MAX_TRACKERS_SIZE: usize = 64 * 1024;

/// Largest serialized configuration
pub const MAX_CONFIG_SIZE: usize = 2048;

/// Persistence manager over a storage backend
pub struct DevicePersistence<S> {
    storage: S,
}

impl<S: FlashStorage> DevicePersistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Reclaim the storage backend
    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Load the saved device, or a fresh one
    pub fn load(&mut self) -> Device {
        match self.load_inner() {
            Ok(device) => {
                info!(
                    "Loaded device with {} counters, uptime {}s",
                    device.len(),
                    device.device_uptime_sec()
                );
                device
            }
            Err(StoreError::Flash(FlashError::NotFound)) => {
                debug!("No saved device, starting fresh");
                Device::new()
            }
            Err(e) => {
                warn!("Failed to load device: {}, starting fresh", e);
                Device::new()
            }
        }
    }

    /// Load the saved device, or build one from `config`
    pub fn load_or_configure(&mut self, config: &DeviceConfig) -> Device {
        if self.storage.exists(StorageKey::Device) {
            let device = self.load();
            if !device.is_empty() {
                return device;
            }
        }
        info!("Building device from configuration");
        config.build_device()
    }

    fn load_inner(&mut self) -> Result<Device> {
        let mut buffer = [0u8; PERSISTENT_DATA_MAX_SIZE];
        let len = self.storage.read(StorageKey::Device, &mut buffer)?;
        debug!("Read {} bytes of device data", len);

        let data = PersistentData::decode(&buffer[..len])?;
        Ok(data.into_device())
    }

    /// Save the device as one checksummed record
    pub fn save(&mut self, device: &Device) -> Result<()> {
        let data = PersistentData::from_device(device);
        let mut buffer = [0u8; PERSISTENT_DATA_MAX_SIZE];
        let len = data.encode_into(&mut buffer)?;
        self.storage.write(StorageKey::Device, &buffer[..len])?;
        debug!("Saved device ({} bytes, checksum {:#06x})", len, data.checksum);
        Ok(())
    }

    /// Load up to `max_entries` trackers
    pub fn load_trackers(&mut self, max_entries: usize) -> Vec<Tracker> {
        let mut buffer = vec![0u8; MAX_TRACKERS_SIZE];
        let len = match self.storage.read(StorageKey::Trackers, &mut buffer) {
            Ok(len) => len,
            Err(FlashError::NotFound) => {
                debug!("No saved trackers");
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read trackers: {}", e);
                return Vec::new();
            }
        };

        let loaded = decode_trackers(&buffer[..len], max_entries);
        if loaded.truncated {
            warn!(
                "Tracker data damaged: recovered {} of {}",
                loaded.len(),
                loaded.stored_count
            );
        }
        info!("Loaded {} trackers", loaded.len());
        loaded.into_items()
    }

    pub fn save_trackers(&mut self, trackers: &[Tracker]) -> Result<()> {
        let bytes = encode_trackers(trackers);
        if bytes.len() > MAX_TRACKERS_SIZE {
            return Err(FlashError::BufferTooSmall.into());
        }
        self.storage.write(StorageKey::Trackers, &bytes)?;
        debug!("Saved {} trackers ({} bytes)", trackers.len(), bytes.len());
        Ok(())
    }

    /// Load the stored configuration, or the defaults
    pub fn load_config(&mut self) -> DeviceConfig {
        match self.load_config_inner() {
            Ok(config) => {
                info!("Loaded configuration: {} counters", config.counters.len());
                config
            }
            Err(StoreError::Flash(FlashError::NotFound)) => {
                debug!("No stored configuration, using defaults");
                DeviceConfig::default()
            }
            Err(e) => {
                warn!("Failed to load configuration: {}, using defaults", e);
                DeviceConfig::default()
            }
        }
    }

    fn load_config_inner(&mut self) -> Result<DeviceConfig> {
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let len = self.storage.read(StorageKey::DeviceConfig, &mut buffer)?;
        debug!("Read {} bytes of binary config", len);

        let config: DeviceConfig = postcard::from_bytes(&buffer[..len])?;
        config.validate()?;
        Ok(config)
    }

    /// Validate and store a configuration
    pub fn save_config(&mut self, config: &DeviceConfig) -> Result<()> {
        config.validate()?;
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let used = postcard::to_slice(config, &mut buffer)?;
        self.storage.write(StorageKey::DeviceConfig, used)?;
        Ok(())
    }

    /// Erase everything
    pub fn reset(&mut self) -> Result<()> {
        info!("Erasing all stored data");
        self.storage.erase_all()?;
        Ok(())
    }
}
