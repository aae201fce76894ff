//! One bounded study sitting over a snapshot of due cards.
//!
//! The session holds card identifiers only, never a copy of card content;
//! every operation borrows the caller's card collection. A session is
//! created from the due queue at one instant, advanced one grade at a
//! time, and discarded once the snapshot is exhausted. Its only lasting
//! effect is the review-state mutations already applied to the cards.

use super::{Card, CardId, Grade, queue, sm2};
use crate::error::SessionError;
use chrono::{DateTime, Utc};

/// Running counts of grades given this sitting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GradeTally {
    pub again: u32,
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
}

impl GradeTally {
    fn record(&mut self, grade: Grade) {
        match grade {
            Grade::Again => self.again += 1,
            Grade::Hard => self.hard += 1,
            Grade::Good => self.good += 1,
            Grade::Easy => self.easy += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.again + self.hard + self.good + self.easy
    }
}

/// Drives one sitting: a fixed queue of card ids, a cursor, grade tallies.
///
/// Intended for a single caller at a time; `grade` does a read-modify-write
/// on the current card and advances the cursor, so concurrent use of one
/// session would double-grade or skip cards. Two sessions over overlapping
/// cards are last-write-wins by design.
#[derive(Debug)]
pub struct ReviewSession {
    queue: Vec<CardId>,
    cursor: usize,
    tally: GradeTally,
}

impl ReviewSession {
    /// Snapshots the due queue at `now`, optionally truncated to `limit`.
    ///
    /// Cards that become due after this instant are not picked up by the
    /// running session. Errors with [`SessionError::EmptyQueue`] when
    /// nothing is due.
    pub fn start(
        cards: &[Card],
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Result<Self, SessionError> {
        let mut queue: Vec<CardId> = queue::select_due(cards, now)
            .into_iter()
            .map(|card| card.id)
            .collect();
        if let Some(limit) = limit {
            queue.truncate(limit);
        }
        if queue.is_empty() {
            return Err(SessionError::EmptyQueue);
        }

        Ok(Self {
            queue,
            cursor: 0,
            tally: GradeTally::default(),
        })
    }

    /// The card at the cursor.
    pub fn current_card<'a>(&self, cards: &'a [Card]) -> Result<&'a Card, SessionError> {
        let id = *self.queue.get(self.cursor).ok_or(SessionError::Complete)?;
        cards
            .iter()
            .find(|card| card.id == id)
            .ok_or(SessionError::UnknownCard(id))
    }

    /// Grades the current card and advances the cursor.
    ///
    /// The card's review state is rewritten in `cards` via the SM-2
    /// algorithm. Cards already advanced past cannot be re-graded; going
    /// back is a display concern, not a scheduling one. Returns the id of
    /// the card that was graded so the caller can persist it.
    pub fn grade(
        &mut self,
        cards: &mut [Card],
        grade: Grade,
        now: DateTime<Utc>,
    ) -> Result<CardId, SessionError> {
        let id = *self.queue.get(self.cursor).ok_or(SessionError::Complete)?;
        let card = cards
            .iter_mut()
            .find(|card| card.id == id)
            .ok_or(SessionError::UnknownCard(id))?;

        card.review = sm2::next_review_state(&card.review, grade, now);
        self.tally.record(grade);
        self.cursor += 1;
        Ok(id)
    }

    /// True once the cursor has moved past the end of the snapshot.
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.queue.len()
    }

    pub fn reviewed_count(&self) -> usize {
        self.cursor
    }

    pub fn remaining_count(&self) -> usize {
        self.queue.len() - self.cursor
    }

    pub fn total_count(&self) -> usize {
        self.queue.len()
    }

    pub fn tally(&self) -> GradeTally {
        self.tally
    }

    pub fn progress_message(&self) -> String {
        format!(
            "Card {} of {} ({} remaining)",
            (self.cursor + 1).min(self.queue.len()),
            self.queue.len(),
            self.remaining_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn deck_of(now: DateTime<Utc>, due: &[i64], future: &[i64]) -> Vec<Card> {
        let mut cards = Vec::new();
        for &id in due {
            cards.push(Card::new(id, format!("front {id}"), format!("back {id}"), now));
        }
        for &id in future {
            let mut card = Card::new(id, format!("front {id}"), format!("back {id}"), now);
            card.review.due_at = now + Duration::days(2);
            cards.push(card);
        }
        cards
    }

    #[test]
    fn test_start_with_nothing_due_fails() {
        let now = Utc::now();
        let cards = deck_of(now, &[], &[1, 2]);

        let err = ReviewSession::start(&cards, now, None).unwrap_err();
        assert_eq!(err, SessionError::EmptyQueue);
    }

    #[test]
    fn test_grading_advances_through_the_snapshot() {
        let now = Utc::now();
        let mut cards = deck_of(now, &[1, 2], &[3]);
        let mut session = ReviewSession::start(&cards, now, None).unwrap();

        assert_eq!(session.total_count(), 2);
        assert_eq!(session.current_card(&cards).unwrap().id, 1);

        session.grade(&mut cards, Grade::Good, now).unwrap();
        assert_eq!(session.current_card(&cards).unwrap().id, 2);
        assert!(!session.is_complete());

        session.grade(&mut cards, Grade::Again, now).unwrap();
        assert!(session.is_complete());
        assert_eq!(session.reviewed_count(), 2);
        assert_eq!(session.remaining_count(), 0);
    }

    #[test]
    fn test_grade_mutates_exactly_the_current_card() {
        let now = Utc::now();
        let mut cards = deck_of(now, &[1, 2], &[]);
        let mut session = ReviewSession::start(&cards, now, None).unwrap();

        let graded = session.grade(&mut cards, Grade::Good, now).unwrap();
        assert_eq!(graded, 1);
        assert_eq!(cards[0].review.repetitions, 1);
        assert_eq!(cards[1].review.repetitions, 0);
    }

    #[test]
    fn test_completed_session_rejects_further_operations() {
        let now = Utc::now();
        let mut cards = deck_of(now, &[1], &[]);
        let mut session = ReviewSession::start(&cards, now, None).unwrap();

        session.grade(&mut cards, Grade::Easy, now).unwrap();
        assert_eq!(
            session.grade(&mut cards, Grade::Easy, now).unwrap_err(),
            SessionError::Complete
        );
        assert_eq!(
            session.current_card(&cards).unwrap_err(),
            SessionError::Complete
        );
    }

    #[test]
    fn test_limit_truncates_the_snapshot() {
        let now = Utc::now();
        let cards = deck_of(now, &[1, 2, 3, 4], &[]);

        let session = ReviewSession::start(&cards, now, Some(2)).unwrap();
        assert_eq!(session.total_count(), 2);
    }

    #[test]
    fn test_cards_becoming_due_mid_session_are_not_injected() {
        let now = Utc::now();
        let mut cards = deck_of(now, &[1, 2], &[3]);
        let mut session = ReviewSession::start(&cards, now, None).unwrap();

        // Later grades use a time at which card 3 is also due
        let later = now + Duration::days(3);
        session.grade(&mut cards, Grade::Good, later).unwrap();
        session.grade(&mut cards, Grade::Good, later).unwrap();

        assert_eq!(session.total_count(), 2);
        assert!(session.is_complete());
        assert_eq!(cards[2].review.repetitions, 0);
    }

    #[test]
    fn test_tally_counts_each_grade() {
        let now = Utc::now();
        let mut cards = deck_of(now, &[1, 2, 3], &[]);
        let mut session = ReviewSession::start(&cards, now, None).unwrap();

        session.grade(&mut cards, Grade::Good, now).unwrap();
        session.grade(&mut cards, Grade::Again, now).unwrap();
        session.grade(&mut cards, Grade::Good, now).unwrap();

        let tally = session.tally();
        assert_eq!(tally.good, 2);
        assert_eq!(tally.again, 1);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_missing_card_is_reported() {
        let now = Utc::now();
        let mut cards = deck_of(now, &[1, 2], &[]);
        let mut session = ReviewSession::start(&cards, now, None).unwrap();

        // Card 2 disappears from the collection behind the session's back
        cards.truncate(1);
        session.grade(&mut cards, Grade::Good, now).unwrap();
        assert_eq!(
            session.grade(&mut cards, Grade::Good, now).unwrap_err(),
            SessionError::UnknownCard(2)
        );
    }
}
