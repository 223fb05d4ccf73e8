//! Path-based save and load
//!
//! Each collection is one whole file. A missing file is a first run, not an
//! error; a damaged file yields whatever was recovered before the damage.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, info, warn};

use combo_codec::{decode_counters, decode_trackers, encode_counters, encode_trackers, Loaded};
use combo_core::{Counter, Tracker};

use crate::error::{Result, StoreError};

/// Write every counter to `path`, replacing the file
pub fn save_counters(path: impl AsRef<Path>, counters: &[Counter]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, encode_counters(counters))?;
    debug!("Saved {} counters to {}", counters.len(), path.display());
    Ok(())
}

/// Load up to `max_entries` counters from `path`
pub fn load_counters(path: impl AsRef<Path>, max_entries: usize) -> Vec<Counter> {
    let path = path.as_ref();
    match read_file(path) {
        Ok(data) => report(path, decode_counters(&data, max_entries), "counters"),
        Err(e) => {
            log_read_error(path, &e);
            Vec::new()
        }
    }
}

/// Write every tracker to `path`, replacing the file
pub fn save_trackers(path: impl AsRef<Path>, trackers: &[Tracker]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, encode_trackers(trackers))?;
    debug!("Saved {} trackers to {}", trackers.len(), path.display());
    Ok(())
}

/// Load up to `max_entries` trackers from `path`
///
/// Each returned tracker owns its freshly allocated objectives.
pub fn load_trackers(path: impl AsRef<Path>, max_entries: usize) -> Vec<Tracker> {
    let path = path.as_ref();
    match read_file(path) {
        Ok(data) => report(path, decode_trackers(&data, max_entries), "trackers"),
        Err(e) => {
            log_read_error(path, &e);
            Vec::new()
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
        _ => StoreError::Io(e),
    })
}

fn log_read_error(path: &Path, error: &StoreError) {
    match error {
        StoreError::NotFound(_) => info!("No file at {}, starting empty", path.display()),
        e => warn!("Failed to read {}: {}, starting empty", path.display(), e),
    }
}

fn report<T>(path: &Path, loaded: Loaded<T>, what: &str) -> Vec<T> {
    if loaded.truncated {
        warn!(
            "{} is damaged: recovered {} of {} {}",
            path.display(),
            loaded.len(),
            loaded.stored_count,
            what
        );
    } else if loaded.dropped() > 0 {
        info!(
            "Dropped {} {} beyond capacity from {}",
            loaded.dropped(),
            what,
            path.display()
        );
    }
    info!("Loaded {} {} from {}", loaded.len(), what, path.display());
    loaded.into_items()
}
