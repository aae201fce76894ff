//! Database operations for the flashcard application
//!
//! Handles SQLite database initialization, CRUD operations for decks and
//! cards, and persistence of SM-2 review state. Timestamps are stored as
//! unix milliseconds so due dates round-trip with sub-day precision.

use crate::models::{Card, CardId, Deck, DeckSet, ReviewState};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, OptionalExtension, Result, params};
use std::path::Path;

fn to_millis(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis()
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Opens the SQLite database at `path` and creates the required tables.
///
/// Sets the simulated current date to now if not already initialized.
pub fn init_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS decks (
            name TEXT PRIMARY KEY
        )",
        (),
    )?;

    // One row per card, review state included, so a card record
    // round-trips in a single read
    conn.execute(
        "CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_name TEXT NOT NULL,
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            easiness_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 0,
            repetitions INTEGER NOT NULL DEFAULT 0,
            due_at INTEGER NOT NULL,
            last_reviewed_at INTEGER,
            FOREIGN KEY (deck_name) REFERENCES decks(name),
            UNIQUE(deck_name, front)
        )",
        (),
    )?;

    // Simulated clock, used to exercise spaced repetition without waiting
    // real days
    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
        params![to_millis(Utc::now()).to_string()],
    )?;

    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

/// Retrieves the simulated current date.
pub fn get_current_date(conn: &Connection) -> Result<DateTime<Utc>> {
    let millis: String = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'current_date'",
        [],
        |row| row.get(0),
    )?;

    // A corrupt clock row is an error, not "everything is due since 1970"
    let millis = millis.parse::<i64>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
    })?;
    Ok(from_millis(millis))
}

/// Advances the simulated date by 24 hours.
pub fn advance_day(conn: &Connection) -> Result<DateTime<Utc>> {
    let next_day = get_current_date(conn)? + Duration::days(1);
    conn.execute(
        "UPDATE app_state SET value = ?1 WHERE key = 'current_date'",
        params![to_millis(next_day).to_string()],
    )?;

    Ok(next_day)
}

/// Creates a new deck.
pub fn new_deck(name: &str, conn: &Connection) -> Result<()> {
    conn.execute("INSERT INTO decks (name) VALUES (?1)", params![name])?;
    tracing::debug!(deck = name, "deck created");
    Ok(())
}

/// Adds a card to a deck with fresh review state (immediately due).
///
/// Returns the card id. If the card already exists (same deck + front),
/// the existing row is kept and its id returned.
pub fn add_card(deck_name: &str, front: &str, back: &str, conn: &Connection) -> Result<CardId> {
    let created_at = get_current_date(conn)?;
    let state = ReviewState::new(created_at);

    conn.execute(
        "INSERT OR IGNORE INTO cards
            (deck_name, front, back, easiness_factor, interval_days, repetitions, due_at, last_reviewed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL)",
        params![
            deck_name,
            front,
            back,
            state.easiness_factor,
            state.interval_days,
            state.repetitions,
            to_millis(state.due_at),
        ],
    )?;

    conn.query_row(
        "SELECT id FROM cards WHERE deck_name = ?1 AND front = ?2",
        params![deck_name, front],
        |row| row.get(0),
    )
}

fn card_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Card> {
    Ok(Card {
        id: row.get(0)?,
        front: row.get(1)?,
        back: row.get(2)?,
        review: ReviewState {
            easiness_factor: row.get(3)?,
            interval_days: row.get(4)?,
            repetitions: row.get(5)?,
            due_at: from_millis(row.get(6)?),
            last_reviewed_at: row.get::<_, Option<i64>>(7)?.map(from_millis),
        },
    })
}

/// Retrieves all cards of a deck, including their review state.
pub fn get_cards_for_deck(deck_name: &str, conn: &Connection) -> Result<Vec<Card>> {
    let mut stmt = conn.prepare(
        "SELECT id, front, back, easiness_factor, interval_days, repetitions, due_at, last_reviewed_at
         FROM cards WHERE deck_name = ?1 ORDER BY id",
    )?;

    let cards = stmt
        .query_map(params![deck_name], card_from_row)?
        .collect::<Result<Vec<Card>>>()?;

    Ok(cards)
}

/// Rewrites one card's review state after a graded answer.
pub fn update_review_state(card_id: CardId, state: &ReviewState, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE cards
         SET easiness_factor = ?1, interval_days = ?2, repetitions = ?3, due_at = ?4, last_reviewed_at = ?5
         WHERE id = ?6",
        params![
            state.easiness_factor,
            state.interval_days,
            state.repetitions,
            to_millis(state.due_at),
            state.last_reviewed_at.map(to_millis),
            card_id,
        ],
    )?;

    Ok(())
}

/// Retrieves all deck names.
pub fn get_all_decks(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM decks ORDER BY name")?;
    let decks = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>>>()?;
    Ok(decks)
}

/// True if a deck with this name exists.
pub fn deck_exists(name: &str, conn: &Connection) -> Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM decks WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Loads all decks with their cards into memory.
pub fn load_all_decks(conn: &Connection) -> Result<DeckSet> {
    let deck_names = get_all_decks(conn)?;

    let mut decks = Vec::new();
    for name in deck_names {
        let cards = get_cards_for_deck(&name, conn)?;
        decks.push(Deck { name, cards });
    }

    Ok(DeckSet { decks })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = init_database(&dir.path().join("test.sqlite3")).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_new_card_starts_immediately_due() {
        let (_dir, conn) = open_test_db();
        new_deck("Polish", &conn).unwrap();
        add_card("Polish", "cześć", "hello", &conn).unwrap();

        let cards = get_cards_for_deck("Polish", &conn).unwrap();
        assert_eq!(cards.len(), 1);

        let now = get_current_date(&conn).unwrap();
        assert!(cards[0].is_due(now));
        assert_eq!(cards[0].review.easiness_factor, 2.5);
        assert_eq!(cards[0].review.repetitions, 0);
        assert!(cards[0].review.last_reviewed_at.is_none());
    }

    #[test]
    fn test_duplicate_card_keeps_existing_row() {
        let (_dir, conn) = open_test_db();
        new_deck("Polish", &conn).unwrap();

        let first = add_card("Polish", "cześć", "hello", &conn).unwrap();
        let second = add_card("Polish", "cześć", "hi", &conn).unwrap();
        assert_eq!(first, second);
        assert_eq!(get_cards_for_deck("Polish", &conn).unwrap().len(), 1);
    }

    #[test]
    fn test_review_state_round_trips_with_sub_day_precision() {
        let (_dir, conn) = open_test_db();
        new_deck("Polish", &conn).unwrap();
        let id = add_card("Polish", "cześć", "hello", &conn).unwrap();

        let reviewed_at = DateTime::from_timestamp_millis(1_700_000_123_456).unwrap();
        let state = ReviewState {
            easiness_factor: 2.36,
            interval_days: 6,
            repetitions: 2,
            due_at: reviewed_at + Duration::days(6),
            last_reviewed_at: Some(reviewed_at),
        };
        update_review_state(id, &state, &conn).unwrap();

        let cards = get_cards_for_deck("Polish", &conn).unwrap();
        assert_eq!(cards[0].review, state);
    }

    #[test]
    fn test_advance_day_moves_the_clock_24_hours() {
        let (_dir, conn) = open_test_db();
        let before = get_current_date(&conn).unwrap();
        let after = advance_day(&conn).unwrap();

        assert_eq!(after - before, Duration::days(1));
        assert_eq!(get_current_date(&conn).unwrap(), after);
    }

    #[test]
    fn test_corrupt_clock_row_is_an_error() {
        let (_dir, conn) = open_test_db();
        conn.execute(
            "UPDATE app_state SET value = 'garbage' WHERE key = 'current_date'",
            [],
        )
        .unwrap();

        assert!(get_current_date(&conn).is_err());
    }

    #[test]
    fn test_load_all_decks() {
        let (_dir, conn) = open_test_db();
        new_deck("Polish", &conn).unwrap();
        new_deck("Spanish", &conn).unwrap();
        add_card("Polish", "cześć", "hello", &conn).unwrap();

        let deck_set = load_all_decks(&conn).unwrap();
        assert_eq!(deck_set.decks.len(), 2);
        assert_eq!(deck_set.find("Polish").unwrap().cards.len(), 1);
        assert_eq!(deck_set.find("Spanish").unwrap().cards.len(), 0);
    }

    #[test]
    fn test_deck_exists() {
        let (_dir, conn) = open_test_db();
        new_deck("Polish", &conn).unwrap();

        assert!(deck_exists("Polish", &conn).unwrap());
        assert!(!deck_exists("Spanish", &conn).unwrap());
    }
}
