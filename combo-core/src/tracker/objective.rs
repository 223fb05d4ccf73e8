//! Named sub-goals owned by a tracker

use heapless::String;

use crate::text::truncated;

/// Maximum objective name length
pub const MAX_OBJECTIVE_NAME_LEN: usize = 31;

/// Maximum objective description length
pub const MAX_OBJECTIVE_DESC_LEN: usize = 63;

/// A sub-goal with a target score
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Objective {
    pub name: String<MAX_OBJECTIVE_NAME_LEN>,
    pub description: String<MAX_OBJECTIVE_DESC_LEN>,
    pub target_score: i32,
    pub current_score: i32,
    pub completed: bool,
}

impl Objective {
    /// Create an objective with no progress
    ///
    /// Name and description are truncated to their capacities.
    pub fn new(name: &str, description: &str, target_score: i32) -> Self {
        Self {
            name: truncated(name),
            description: truncated(description),
            target_score,
            current_score: 0,
            completed: false,
        }
    }

    /// Add progress, completing the objective once the target is met
    pub fn progress(&mut self, amount: i32) {
        self.current_score = self.current_score.saturating_add(amount);
        if self.current_score >= self.target_score {
            self.completed = true;
        }
    }

    /// Score still needed (0 once met)
    pub fn remaining(&self) -> i32 {
        self.target_score.saturating_sub(self.current_score).max(0)
    }
}
