//! Little-endian byte writer and bounds-checked reader

use alloc::vec::Vec;
use core::fmt;

use heapless::String;

use combo_core::text::utf8_prefix;

/// Errors that can occur while encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Input ended before the field was complete
    TruncatedRead,
    /// Magic, version, enum tag or count out of range
    InvalidFormat,
    /// Stored checksum does not match the data
    ChecksumMismatch,
    /// Output buffer too small for encoding
    BufferTooSmall,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CodecError::TruncatedRead => "truncated read",
            CodecError::InvalidFormat => "invalid format",
            CodecError::ChecksumMismatch => "checksum mismatch",
            CodecError::BufferTooSmall => "buffer too small",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for CodecError {}

/// Growable output buffer
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes written so far
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write `text` into a fixed `size`-byte field, NUL padded
    ///
    /// At most `size - 1` bytes of text are kept so the field always holds
    /// a terminator.
    pub fn put_fixed_str(&mut self, text: &str, size: usize) {
        let keep = utf8_prefix(text.as_bytes(), size.saturating_sub(1));
        self.buf.extend_from_slice(keep.as_bytes());
        self.buf.resize(self.buf.len() + (size - keep.len()), 0);
    }

    /// Write `[u32 len][bytes]`
    pub fn put_len_str(&mut self, text: &str) {
        // Labels are bounded by heapless capacities, far below u32::MAX
        self.put_u32(text.len() as u32);
        self.buf.extend_from_slice(text.as_bytes());
    }
}

/// Cursor over an input slice
///
/// Every getter fails with [`CodecError::TruncatedRead`] instead of reading
/// past the end; the cursor does not move on failure.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Bytes consumed so far, as a slice
    pub fn consumed(&self) -> &'a [u8] {
        &self.data[..self.pos]
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        if len > self.remaining() {
            return Err(CodecError::TruncatedRead);
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn get_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    /// Any non-zero byte reads as true
    pub fn get_bool(&mut self) -> Result<bool, CodecError> {
        Ok(self.get_u8()? != 0)
    }

    pub fn get_u16(&mut self) -> Result<u16, CodecError> {
        self.take_array().map(u16::from_le_bytes)
    }

    pub fn get_u32(&mut self) -> Result<u32, CodecError> {
        self.take_array().map(u32::from_le_bytes)
    }

    pub fn get_i32(&mut self) -> Result<i32, CodecError> {
        self.take_array().map(i32::from_le_bytes)
    }

    pub fn get_f32(&mut self) -> Result<f32, CodecError> {
        self.take_array().map(f32::from_le_bytes)
    }

    /// Read a fixed `size`-byte text field
    ///
    /// Text ends at the first NUL and never exceeds `N` bytes.
    pub fn get_fixed_str<const N: usize>(&mut self, size: usize) -> Result<String<N>, CodecError> {
        let field = self.take(size)?;
        let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
        Ok(to_string(utf8_prefix(&field[..end], N)))
    }

    /// Read `[u32 len][bytes]` into a string of capacity `N`
    ///
    /// The full stored length is consumed; text beyond `N` bytes is dropped,
    /// which is the `capacity - 1` truncation of a NUL-terminated buffer of
    /// `N + 1` bytes.
    pub fn get_len_str<const N: usize>(&mut self) -> Result<String<N>, CodecError> {
        let start = self.pos;
        let len = self.get_u32()? as usize;
        match self.take(len) {
            Ok(bytes) => Ok(to_string(utf8_prefix(bytes, N))),
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }
}

fn to_string<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    // utf8_prefix already bounded the length to N
    let _ = out.push_str(text);
    out
}
