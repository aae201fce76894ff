//! Container for all available decks

use super::Deck;

#[derive(Clone, Debug, Default)]
pub struct DeckSet {
    pub decks: Vec<Deck>,
}

impl DeckSet {
    pub fn find(&self, name: &str) -> Option<&Deck> {
        self.decks.iter().find(|deck| deck.name == name)
    }
}
