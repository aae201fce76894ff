pub mod database;
pub mod error;
pub mod export;
pub mod models;

pub use error::{InvalidGrade, SessionError};
pub use models::{Card, CardId, Deck, DeckSet, Grade, ReviewSession};
