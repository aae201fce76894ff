//! JSON import/export module for flashcard decks.
//!
//! A deck is written with its cards and their full review state, RFC 3339
//! timestamps included, so an exported card record is lossless down to
//! sub-day precision.

use crate::models::Deck;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid deck JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Exports a deck to a JSON file at the specified path.
pub fn export_deck_to_path(deck: &Deck, path: &Path) -> Result<(), ExportError> {
    let json_string = serde_json::to_string_pretty(deck)?;
    fs::write(path, json_string)?;
    tracing::debug!(deck = deck.name, path = %path.display(), "deck exported");
    Ok(())
}

/// Imports a deck from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_deck(path: &Path) -> Result<Deck, ExportError> {
    let contents = fs::read_to_string(path)?;
    let deck: Deck = serde_json::from_str(&contents)?;
    tracing::debug!(deck = deck.name, path = %path.display(), "deck imported");
    Ok(deck)
}
