//! Review grades, one per answer button in a study screen.

use crate::error::InvalidGrade;

/// How well the user recalled the current card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    /// Failed to recall; the card re-enters short-term rotation.
    Again,
    /// Recalled with serious difficulty.
    Hard,
    /// Recalled correctly.
    Good,
    /// Recalled instantly.
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];

    /// Parses the wire value 0-3. Anything else is rejected.
    pub fn from_value(value: u8) -> Result<Self, InvalidGrade> {
        match value {
            0 => Ok(Grade::Again),
            1 => Ok(Grade::Hard),
            2 => Ok(Grade::Good),
            3 => Ok(Grade::Easy),
            other => Err(InvalidGrade(other)),
        }
    }

    pub fn value(self) -> u8 {
        match self {
            Grade::Again => 0,
            Grade::Hard => 1,
            Grade::Good => 2,
            Grade::Easy => 3,
        }
    }

    /// SM-2 quality (0-5 scale) this grade maps to.
    pub(crate) fn quality(self) -> u8 {
        match self {
            Grade::Again => 0,
            Grade::Hard => 3,
            Grade::Good => 4,
            Grade::Easy => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Again => "Again",
            Grade::Hard => "Hard",
            Grade::Good => "Good",
            Grade::Easy => "Easy",
        }
    }
}
