//! Per-card spaced repetition state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Easiness factor assigned to cards that were never reviewed.
pub const INITIAL_EASINESS: f64 = 2.5;

/// Lower bound the easiness factor is clamped to on every update.
pub const MIN_EASINESS: f64 = 1.3;

/// The scheduling fields of a card. Content lives on [`super::Card`];
/// everything the SM-2 algorithm reads and writes lives here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub easiness_factor: f64,
    pub interval_days: u32,
    pub repetitions: u32,
    /// When the card next comes up for review. Always derived from the
    /// last review time plus the interval, never set independently.
    pub due_at: DateTime<Utc>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewState {
    /// Fresh state: immediately due, never reviewed.
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            easiness_factor: INITIAL_EASINESS,
            interval_days: 0,
            repetitions: 0,
            due_at: created_at,
            last_reviewed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_immediately_due() {
        let now = Utc::now();
        let state = ReviewState::new(now);

        assert_eq!(state.easiness_factor, INITIAL_EASINESS);
        assert_eq!(state.interval_days, 0);
        assert_eq!(state.repetitions, 0);
        assert_eq!(state.due_at, now);
        assert!(state.last_reviewed_at.is_none());
    }
}
