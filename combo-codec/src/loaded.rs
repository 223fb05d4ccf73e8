//! Outcome of a tolerant collection load

use alloc::vec::Vec;

/// Entries recovered from a collection file
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    /// Fully decoded entries, in stored order
    pub items: Vec<T>,
    /// Entry count found in the header (0 if the header was unreadable)
    pub stored_count: usize,
    /// An entry failed to decode and loading stopped early
    pub truncated: bool,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Loaded<T> {
    /// Nothing loaded
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            stored_count: 0,
            truncated: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stored entries not returned, from truncation or the capacity clamp
    pub fn dropped(&self) -> usize {
        self.stored_count.saturating_sub(self.items.len())
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
