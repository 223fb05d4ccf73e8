//! Record checksum
//!
//! XOR each byte into a 16-bit accumulator, then rotate it left by one.

/// Checksum over `data`
pub fn checksum(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |acc, &byte| (acc ^ u16::from(byte)).rotate_left(1))
}
