//! Checksummed device snapshot
//!
//! The whole device in one record, suitable for a single flash write.
//! Unlike the counter file, a damaged record is rejected as a whole.

use alloc::vec::Vec;

use heapless::Vec as FixedVec;

use combo_core::device::{Device, MAX_COUNTERS};
use combo_core::Counter;

use crate::buffer::{ByteReader, ByteWriter, CodecError};
use crate::checksum::checksum;
use crate::counter::{read_counter, write_counter, COUNTER_RECORD_SIZE};

/// Magic number identifying a device record
pub const PERSISTENT_MAGIC: u32 = 0x434D_424F; // "CMBO"

/// Current record format version
pub const PERSISTENT_VERSION: u16 = 1;

/// Header bytes before the counter records
pub const PERSISTENT_HEADER_SIZE: usize = 4 + 2 + 4 + 4 + 4 + 4;

/// Largest possible encoded record
pub const PERSISTENT_DATA_MAX_SIZE: usize =
    PERSISTENT_HEADER_SIZE + MAX_COUNTERS * COUNTER_RECORD_SIZE + 2;

/// Device snapshot as stored
#[derive(Debug, Clone, PartialEq)]
pub struct PersistentData {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u16,
    pub current_counter: u32,
    pub uptime_ms: u32,
    pub sleep_timeout_ms: u32,
    pub counters: FixedVec<Counter, MAX_COUNTERS>,
    /// Checksum over every encoded byte before it
    pub checksum: u16,
}

impl PersistentData {
    /// Snapshot a device, checksum included
    pub fn from_device(device: &Device) -> Self {
        let mut counters = FixedVec::new();
        for counter in device.counters() {
            // Device capacity equals the record capacity
            let _ = counters.push(counter.clone());
        }

        let mut data = Self {
            magic: PERSISTENT_MAGIC,
            version: PERSISTENT_VERSION,
            current_counter: device.current_index().unwrap_or(0) as u32,
            uptime_ms: device.uptime_ms(),
            sleep_timeout_ms: device.sleep_timeout_ms(),
            counters,
            checksum: 0,
        };
        data.update_checksum();
        data
    }

    /// Rebuild the device
    pub fn into_device(self) -> Device {
        Device::restore(
            self.counters,
            self.current_counter as usize,
            self.uptime_ms,
            self.sleep_timeout_ms,
        )
    }

    /// Check if the magic and version match
    pub fn is_valid(&self) -> bool {
        self.magic == PERSISTENT_MAGIC && self.version == PERSISTENT_VERSION
    }

    fn write_body(&self, w: &mut ByteWriter) {
        w.put_u32(self.magic);
        w.put_u16(self.version);
        w.put_i32(self.counters.len() as i32);
        w.put_u32(self.current_counter);
        w.put_u32(self.uptime_ms);
        w.put_u32(self.sleep_timeout_ms);
        for counter in &self.counters {
            write_counter(w, counter);
        }
    }

    /// Checksum over the encoded body
    pub fn calculate_checksum(&self) -> u16 {
        let mut w = ByteWriter::with_capacity(PERSISTENT_DATA_MAX_SIZE);
        self.write_body(&mut w);
        checksum(w.as_slice())
    }

    pub fn update_checksum(&mut self) {
        self.checksum = self.calculate_checksum();
    }

    pub fn verify_checksum(&self) -> bool {
        self.checksum == self.calculate_checksum()
    }

    /// Encode the record with the stored checksum
    pub fn encode(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(PERSISTENT_DATA_MAX_SIZE);
        self.write_body(&mut w);
        w.put_u16(self.checksum);
        w.into_inner()
    }

    /// Encode into a caller buffer
    ///
    /// Returns the number of bytes written.
    pub fn encode_into(&self, buffer: &mut [u8]) -> Result<usize, CodecError> {
        let bytes = self.encode();
        if buffer.len() < bytes.len() {
            return Err(CodecError::BufferTooSmall);
        }
        buffer[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    /// Decode and validate a record
    ///
    /// Rejects a wrong magic or version and an out-of-range counter count
    /// as [`CodecError::InvalidFormat`], short input as
    /// [`CodecError::TruncatedRead`] and a checksum mismatch as
    /// [`CodecError::ChecksumMismatch`].
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut r = ByteReader::new(data);

        let magic = r.get_u32()?;
        let version = r.get_u16()?;
        if magic != PERSISTENT_MAGIC || version != PERSISTENT_VERSION {
            return Err(CodecError::InvalidFormat);
        }

        let count = usize::try_from(r.get_i32()?).map_err(|_| CodecError::InvalidFormat)?;
        if count > MAX_COUNTERS {
            return Err(CodecError::InvalidFormat);
        }

        let current_counter = r.get_u32()?;
        let uptime_ms = r.get_u32()?;
        let sleep_timeout_ms = r.get_u32()?;

        let mut counters = FixedVec::new();
        for _ in 0..count {
            counters
                .push(read_counter(&mut r)?)
                .map_err(|_| CodecError::InvalidFormat)?;
        }

        let computed = checksum(r.consumed());
        let stored = r.get_u16()?;
        if stored != computed {
            return Err(CodecError::ChecksumMismatch);
        }

        Ok(Self {
            magic,
            version,
            current_counter,
            uptime_ms,
            sleep_timeout_ms,
            counters,
            checksum: stored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combo_core::{CounterType, Quality};

    fn device() -> Device {
        let mut device = Device::new();
        device.add("Squats", CounterType::Combo).unwrap();
        device.add("Breath", CounterType::Timed).unwrap();
        device.add("Water", CounterType::Accumulator).unwrap();
        device.select(1).unwrap();
        device.increment_current(Quality::Perfect);
        device.increment_current(Quality::Good);
        device.set_sleep_timeout_ms(45_000);
        device.update(12_345);
        device
    }

    #[test]
    fn test_roundtrip_device() {
        let original = device();
        let bytes = PersistentData::from_device(&original).encode();
        assert_eq!(
            bytes.len(),
            PERSISTENT_HEADER_SIZE + 3 * COUNTER_RECORD_SIZE + 2
        );

        let data = PersistentData::decode(&bytes).unwrap();
        assert!(data.is_valid());
        assert!(data.verify_checksum());

        let restored = data.into_device();
        assert_eq!(restored.counters(), original.counters());
        assert_eq!(restored.current_index(), Some(1));
        assert_eq!(restored.uptime_ms(), 12_345);
        assert_eq!(restored.sleep_timeout_ms(), 45_000);
    }

    #[test]
    fn test_checksum_mismatch_rejected() {
        let mut bytes = PersistentData::from_device(&device()).encode();
        // flip a bit inside the first counter's count field
        bytes[PERSISTENT_HEADER_SIZE + 17] ^= 0x01;
        assert_eq!(
            PersistentData::decode(&bytes),
            Err(CodecError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = PersistentData::from_device(&device()).encode();
        bytes[0] ^= 0xFF;
        assert_eq!(PersistentData::decode(&bytes), Err(CodecError::InvalidFormat));
    }

    #[test]
    fn test_truncated_rejected() {
        let bytes = PersistentData::from_device(&device()).encode();
        assert_eq!(
            PersistentData::decode(&bytes[..bytes.len() - 1]),
            Err(CodecError::TruncatedRead)
        );
        assert_eq!(
            PersistentData::decode(&bytes[..3]),
            Err(CodecError::TruncatedRead)
        );
    }

    #[test]
    fn test_count_over_capacity_rejected() {
        let mut bytes = PersistentData::from_device(&Device::new()).encode();
        bytes[6..10].copy_from_slice(&(MAX_COUNTERS as i32 + 1).to_le_bytes());
        assert_eq!(PersistentData::decode(&bytes), Err(CodecError::InvalidFormat));
    }

    #[test]
    fn test_stale_checksum_detected() {
        let mut data = PersistentData::from_device(&device());
        data.uptime_ms += 1;
        assert!(!data.verify_checksum());
        data.update_checksum();
        assert!(data.verify_checksum());
    }

    #[test]
    fn test_encode_into() {
        let data = PersistentData::from_device(&device());
        let mut small = [0u8; 16];
        assert_eq!(data.encode_into(&mut small), Err(CodecError::BufferTooSmall));

        let mut buffer = [0u8; PERSISTENT_DATA_MAX_SIZE];
        let len = data.encode_into(&mut buffer).unwrap();
        assert_eq!(PersistentData::decode(&buffer[..len]).unwrap(), data);
    }

    #[test]
    fn test_empty_device() {
        let bytes = PersistentData::from_device(&Device::new()).encode();
        let restored = PersistentData::decode(&bytes).unwrap().into_device();
        assert!(restored.is_empty());
        assert_eq!(restored.current_index(), None);
    }
}
