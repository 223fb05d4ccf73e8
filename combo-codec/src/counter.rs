//! Counter record and counter file format
//!
//! Record layout (63 bytes):
//!
//! ```text
//! label[16] type:u8 count:i32 total:i32 max_combo:i32 multiplier:f32
//! increment_amount:i32 decay_rate:f32 max_multiplier:f32 breaks_on_miss:u8
//! perfect:u32 good:u32 partial:u32 miss:u32 active:u8
//! ```

use alloc::vec::Vec;

use combo_core::counter::{Counter, CounterType, MAX_LABEL_LEN};

use crate::buffer::{ByteReader, ByteWriter, CodecError};
use crate::loaded::Loaded;

/// Size of the label field, terminator included
pub const COUNTER_LABEL_SIZE: usize = MAX_LABEL_LEN + 1;

/// Encoded size of one counter
pub const COUNTER_RECORD_SIZE: usize = COUNTER_LABEL_SIZE + 1 + 4 * 7 + 1 + 4 * 4 + 1;

/// Append one counter record
pub fn write_counter(w: &mut ByteWriter, counter: &Counter) {
    w.put_fixed_str(&counter.label, COUNTER_LABEL_SIZE);
    w.put_u8(counter.counter_type.as_u8());
    w.put_i32(counter.count);
    w.put_i32(counter.total);
    w.put_i32(counter.max_combo);
    w.put_f32(counter.multiplier);
    w.put_i32(counter.increment_amount);
    w.put_f32(counter.decay_rate);
    w.put_f32(counter.max_multiplier);
    w.put_bool(counter.breaks_on_miss);
    w.put_u32(counter.perfect_count);
    w.put_u32(counter.good_count);
    w.put_u32(counter.partial_count);
    w.put_u32(counter.miss_count);
    w.put_bool(counter.active);
}

/// Read one counter record
///
/// An out-of-range multiplier is pulled back into `[1.0, max_multiplier]`;
/// values written by [`write_counter`] come back unchanged.
pub fn read_counter(r: &mut ByteReader<'_>) -> Result<Counter, CodecError> {
    let record = r.take(COUNTER_RECORD_SIZE)?;
    let mut r = ByteReader::new(record);

    let label = r.get_fixed_str(COUNTER_LABEL_SIZE)?;
    let counter_type = CounterType::from_u8(r.get_u8()?).ok_or(CodecError::InvalidFormat)?;

    let mut counter = Counter {
        label,
        counter_type,
        count: r.get_i32()?,
        total: r.get_i32()?,
        max_combo: r.get_i32()?,
        multiplier: r.get_f32()?,
        increment_amount: r.get_i32()?,
        decay_rate: r.get_f32()?,
        max_multiplier: r.get_f32()?,
        breaks_on_miss: r.get_bool()?,
        perfect_count: r.get_u32()?,
        good_count: r.get_u32()?,
        partial_count: r.get_u32()?,
        miss_count: r.get_u32()?,
        active: r.get_bool()?,
    };

    if counter.max_multiplier.is_nan() || counter.max_multiplier < 1.0 {
        counter.max_multiplier = 1.0;
    }
    if counter.multiplier.is_nan() || counter.multiplier < 1.0 {
        counter.multiplier = 1.0;
    }
    counter.multiplier = counter.multiplier.min(counter.max_multiplier);

    Ok(counter)
}

/// Encode a counter file: `[i32 count][records]`
pub fn encode_counters(counters: &[Counter]) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(4 + counters.len() * COUNTER_RECORD_SIZE);
    w.put_i32(counters.len() as i32);
    for counter in counters {
        write_counter(&mut w, counter);
    }
    w.into_inner()
}

/// Decode a counter file, keeping at most `max_entries` counters
///
/// An unreadable header yields nothing. A record that fails to decode stops
/// the loop; the counters before it are kept.
pub fn decode_counters(data: &[u8], max_entries: usize) -> Loaded<Counter> {
    let mut r = ByteReader::new(data);
    let Ok(stored) = r.get_i32() else {
        return Loaded::empty();
    };

    let stored_count = usize::try_from(stored).unwrap_or(0);
    let wanted = stored_count.min(max_entries);
    let mut loaded = Loaded {
        items: Vec::with_capacity(wanted.min(r.remaining() / COUNTER_RECORD_SIZE)),
        stored_count,
        truncated: false,
    };

    for _ in 0..wanted {
        match read_counter(&mut r) {
            Ok(counter) => loaded.items.push(counter),
            Err(_) => {
                loaded.truncated = true;
                break;
            }
        }
    }

    loaded
}
