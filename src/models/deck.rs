//! Deck is a named set of cards. Grouping only: one deck's due cards are
//! scheduled exactly like another's.

use super::Card;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn due_count(&self, now: DateTime<Utc>) -> usize {
        self.cards.iter().filter(|card| card.is_due(now)).count()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            name: "My Deck".to_string(),
            cards: Vec::new(),
        }
    }
}
