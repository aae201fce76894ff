//! Due-queue selection.

use super::Card;
use chrono::{DateTime, Utc};

/// Returns the cards due at `now`, most overdue first.
///
/// Ties on the due date break on repetition count (newer, weaker cards
/// surface first), then on id so recomputing with the same inputs always
/// yields the same order. Pure filter + sort; no cursor, no mutation.
pub fn select_due<'a>(cards: &'a [Card], now: DateTime<Utc>) -> Vec<&'a Card> {
    let mut due: Vec<&Card> = cards.iter().filter(|card| card.is_due(now)).collect();
    due.sort_by(|a, b| {
        a.review
            .due_at
            .cmp(&b.review.due_at)
            .then(a.review.repetitions.cmp(&b.review.repetitions))
            .then(a.id.cmp(&b.id))
    });
    due
}
