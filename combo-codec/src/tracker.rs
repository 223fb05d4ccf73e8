//! Tracker file format
//!
//! Tracker records are variable length: the label, every objective's text
//! and the interval label are length-prefixed. Nothing in this format is
//! versioned or checksummed.

use alloc::vec::Vec;

use combo_core::tracker::{IntervalTracker, Objective, Tracker};

use crate::buffer::{ByteReader, ByteWriter, CodecError};
use crate::loaded::Loaded;

/// Smallest possible encoded objective: two empty strings, two i32, a flag
const MIN_OBJECTIVE_SIZE: usize = 4 + 4 + 4 + 4 + 1;

fn write_objective(w: &mut ByteWriter, objective: &Objective) {
    w.put_len_str(&objective.name);
    w.put_len_str(&objective.description);
    w.put_i32(objective.target_score);
    w.put_i32(objective.current_score);
    w.put_bool(objective.completed);
}

fn read_objective(r: &mut ByteReader<'_>) -> Result<Objective, CodecError> {
    Ok(Objective {
        name: r.get_len_str()?,
        description: r.get_len_str()?,
        target_score: r.get_i32()?,
        current_score: r.get_i32()?,
        completed: r.get_bool()?,
    })
}

fn write_interval(w: &mut ByteWriter, interval: &IntervalTracker) {
    w.put_bool(interval.has_interval);
    w.put_bool(interval.running);
    w.put_i32(interval.current_rep);
    w.put_f32(interval.time_remaining);
    w.put_len_str(&interval.label);
    w.put_i32(interval.duration_s);
    w.put_i32(interval.reps);
}

fn read_interval(r: &mut ByteReader<'_>) -> Result<IntervalTracker, CodecError> {
    Ok(IntervalTracker {
        has_interval: r.get_bool()?,
        running: r.get_bool()?,
        current_rep: r.get_i32()?,
        time_remaining: r.get_f32()?,
        label: r.get_len_str()?,
        duration_s: r.get_i32()?,
        reps: r.get_i32()?,
    })
}

/// Append one tracker record
pub fn write_tracker(w: &mut ByteWriter, tracker: &Tracker) {
    w.put_u32(tracker.score);
    w.put_i32(tracker.combo);
    w.put_i32(tracker.max_combo);
    w.put_bool(tracker.paused);
    w.put_bool(tracker.has_objective);
    w.put_i32(tracker.objective);
    w.put_i32(tracker.completed_intervals);
    w.put_f32(tracker.multiplier);
    w.put_f32(tracker.decay_pause);
    w.put_i32(tracker.total_hits);
    w.put_i32(tracker.perfect_hits);
    w.put_i32(tracker.miss_hits);
    w.put_i32(tracker.objectives.len() as i32);
    w.put_i32(tracker.active_objective_index as i32);
    w.put_len_str(&tracker.label);
    for objective in &tracker.objectives {
        write_objective(w, objective);
    }
    write_interval(w, &tracker.interval);
}

/// Read one tracker record
///
/// The objective list is allocated for the stored count before it is
/// filled. A negative count is rejected as [`CodecError::InvalidFormat`].
/// An active index outside the list is reset to 0.
pub fn read_tracker(r: &mut ByteReader<'_>) -> Result<Tracker, CodecError> {
    let score = r.get_u32()?;
    let combo = r.get_i32()?;
    let max_combo = r.get_i32()?;
    let paused = r.get_bool()?;
    let has_objective = r.get_bool()?;
    let objective = r.get_i32()?;
    let completed_intervals = r.get_i32()?;
    let multiplier = r.get_f32()?;
    let decay_pause = r.get_f32()?;
    let total_hits = r.get_i32()?;
    let perfect_hits = r.get_i32()?;
    let miss_hits = r.get_i32()?;
    let objective_count =
        usize::try_from(r.get_i32()?).map_err(|_| CodecError::InvalidFormat)?;
    let active_index = r.get_i32()?;
    let label = r.get_len_str()?;

    // A corrupt count must not drive a huge allocation
    let mut objectives =
        Vec::with_capacity(objective_count.min(r.remaining() / MIN_OBJECTIVE_SIZE));
    for _ in 0..objective_count {
        objectives.push(read_objective(r)?);
    }

    let interval = read_interval(r)?;

    let active_objective_index = usize::try_from(active_index)
        .ok()
        .filter(|&i| i < objectives.len())
        .unwrap_or(0);

    Ok(Tracker {
        label,
        score,
        combo,
        max_combo,
        paused,
        has_objective,
        objective,
        completed_intervals,
        multiplier,
        decay_pause,
        total_hits,
        perfect_hits,
        miss_hits,
        objectives,
        active_objective_index,
        interval,
    })
}

/// Encode a tracker file: `[i32 count][records]`
pub fn encode_trackers(trackers: &[Tracker]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.put_i32(trackers.len() as i32);
    for tracker in trackers {
        write_tracker(&mut w, tracker);
    }
    w.into_inner()
}

/// Decode a tracker file, keeping at most `max_entries` trackers
///
/// Same tolerance as the counter file: a failed record ends the load and
/// everything before it is kept.
pub fn decode_trackers(data: &[u8], max_entries: usize) -> Loaded<Tracker> {
    let mut r = ByteReader::new(data);
    let Ok(stored) = r.get_i32() else {
        return Loaded::empty();
    };

    let stored_count = usize::try_from(stored).unwrap_or(0);
    let mut loaded = Loaded {
        items: Vec::new(),
        stored_count,
        truncated: false,
    };

    for _ in 0..stored_count.min(max_entries) {
        match read_tracker(&mut r) {
            Ok(tracker) => loaded.items.push(tracker),
            Err(_) => {
                loaded.truncated = true;
                break;
            }
        }
    }

    loaded
}
