//! Card is a pair <front, back> plus its spaced repetition state.
//! Only text is used on both sides; the scheduler treats it as opaque.

use super::ReviewState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database rowid of a card; unique and immutable.
pub type CardId = i64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub front: String,
    pub back: String,
    pub review: ReviewState,
}

impl Card {
    pub fn new(
        id: CardId,
        front: impl Into<String>,
        back: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
            review: ReviewState::new(created_at),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.review.due_at <= now
    }
}
