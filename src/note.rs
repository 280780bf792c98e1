//! Letter names and the diatonic note-index coordinate system.
//!
//! A note index counts diatonic steps from a fixed reference C: `0` is C,
//! `1` is D, `-1` is the B below. Accidentals do not exist in this space and
//! octaves are implicit, so the letter name repeats every seven steps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuestError;

/// Signed diatonic step count relative to the reference C.
pub type NoteIndex = i32;

/// Note names C through B, in scale order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoteName {
    #[default]
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

/// The seven letters in the order their indices repeat.
pub const NOTE_NAMES: [NoteName; 7] = [
    NoteName::C,
    NoteName::D,
    NoteName::E,
    NoteName::F,
    NoteName::G,
    NoteName::A,
    NoteName::B,
];

impl NoteName {
    /// Letter name for a note index.
    ///
    /// Uses floor modulo, so negative indices wrap the same way positive ones do.
    ///
    /// ```
    /// use clef_quest::NoteName;
    ///
    /// assert_eq!(NoteName::from_index(0), NoteName::C);
    /// assert_eq!(NoteName::from_index(-1), NoteName::B);
    /// assert_eq!(NoteName::from_index(11), NoteName::G);
    /// ```
    pub fn from_index(index: NoteIndex) -> Self {
        NOTE_NAMES[index.rem_euclid(7) as usize]
    }

    pub fn letter(self) -> char {
        match self {
            NoteName::C => 'C',
            NoteName::D => 'D',
            NoteName::E => 'E',
            NoteName::F => 'F',
            NoteName::G => 'G',
            NoteName::A => 'A',
            NoteName::B => 'B',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }
}

/// Shorthand for [`NoteName::from_index`].
pub fn name(index: NoteIndex) -> NoteName {
    NoteName::from_index(index)
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for NoteName {
    type Err = QuestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => NoteName::from_letter(letter)
                .ok_or_else(|| QuestError::InvalidNoteName(trimmed.to_string())),
            _ => Err(QuestError::InvalidNoteName(trimmed.to_string())),
        }
    }
}
