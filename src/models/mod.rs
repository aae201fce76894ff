pub mod card;
pub mod deck;
pub mod deck_set;
pub mod grade;
pub mod queue;
pub mod review_session;
pub mod review_state;
pub mod sm2;

pub use card::{Card, CardId};
pub use deck::Deck;
pub use deck_set::DeckSet;
pub use grade::Grade;
pub use review_session::{GradeTally, ReviewSession};
pub use review_state::ReviewState;
