//! SM-2 (SuperMemo 2) spaced repetition algorithm implementation.
//!
//! The SM-2 algorithm calculates optimal review intervals based on recall
//! quality:
//! - Each card has an easiness factor (EF) that adjusts based on performance
//! - AGAIN resets repetitions and demotes the card to a 1-day interval
//! - Passing grades increase the interval progressively (1 day → 6 days →
//!   EF multiplier)
//! - EF is adjusted after each review and has a minimum value of 1.3
//!
//! The four study grades map onto SM-2's 0-5 quality scale as
//! AGAIN→0, HARD→3, GOOD→4, EASY→5.

use super::review_state::MIN_EASINESS;
use super::{Card, Grade, ReviewState};
use chrono::{DateTime, Duration, Utc};

/// Calculates new review state according to the SM-2 algorithm.
///
/// Pure and total: the input is never touched, and the returned state has
/// all fields updated together. The resulting interval is always at least
/// one day, so a card graded AGAIN comes back tomorrow rather than looping
/// within the same sitting.
pub fn next_review_state(state: &ReviewState, grade: Grade, now: DateTime<Utc>) -> ReviewState {
    // New E-Factor (easiness factor), floored at 1.3
    let q = grade.quality() as f64;
    let mut new_ef = state.easiness_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    if new_ef < MIN_EASINESS {
        new_ef = MIN_EASINESS;
    }

    let (new_interval, new_repetitions) = if grade == Grade::Again {
        // Failed recall: restart the repetition ladder. The card stays in
        // the deck and re-enters short-term rotation one day out.
        (1, 0)
    } else {
        let new_reps = state.repetitions + 1;
        let new_int = match new_reps {
            // First repetition: 1 day, second: 6 days, then multiply by EF.
            // The multiply is floored at 1 so a zero-interval input still
            // comes out of a graded review at least a day away.
            1 => 1,
            2 => 6,
            _ => ((state.interval_days as f64 * new_ef).round() as u32).max(1),
        };
        (new_int, new_reps)
    };

    ReviewState {
        easiness_factor: new_ef,
        interval_days: new_interval,
        repetitions: new_repetitions,
        due_at: now + Duration::days(new_interval as i64),
        last_reviewed_at: Some(now),
    }
}

/// Returns a graded copy of the card; the caller's card is left untouched.
pub fn grade_card(card: &Card, grade: Grade, now: DateTime<Utc>) -> Card {
    Card {
        review: next_review_state(&card.review, grade, now),
        ..card.clone()
    }
}
