//! Error types for the review scheduler.
//!
//! All of these are deterministic validation failures surfaced synchronously
//! to the caller; nothing here is retried or swallowed internally.

use crate::models::CardId;
use thiserror::Error;

/// Errors raised by the session controller.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// No cards were due when the session was started. Recoverable: the
    /// caller should present "nothing to study" rather than retry.
    #[error("no cards are due for review")]
    EmptyQueue,

    /// An operation was attempted on a session that has already gone
    /// through its whole snapshot. A caller bug, never ignored.
    #[error("the review session is already complete")]
    Complete,

    /// A card captured in the session snapshot no longer exists in the
    /// collection it was asked to operate on.
    #[error("card {0} is missing from the collection")]
    UnknownCard(CardId),
}

/// A grade value outside the four defined responses. Rejected before any
/// card mutation takes place.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid grade value {0}, expected 0 (again) to 3 (easy)")]
pub struct InvalidGrade(pub u8);
