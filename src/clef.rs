//! The four clefs and their reference offsets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Clef {
    Treble,
    Bass,
    Alto,
    Tenor,
}

impl Clef {
    /// Menu order.
    pub const ALL: [Clef; 4] = [Clef::Treble, Clef::Bass, Clef::Alto, Clef::Tenor];

    /// Staff step occupied by note index 0 under this clef.
    ///
    /// Steps count half line spacings up from the bottom staff line. These
    /// values are calibrated constants, not derived from pitch: under the
    /// treble clef index 0 sits on the first ledger line below the staff,
    /// under the C clefs it sits on the clef's own line.
    pub const fn reference_offset(self) -> i32 {
        match self {
            Clef::Treble => -2,
            Clef::Bass => 3,
            Clef::Alto => 4,
            Clef::Tenor => 6,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Clef::Treble => "Treble",
            Clef::Bass => "Bass",
            Clef::Alto => "Alto",
            Clef::Tenor => "Tenor",
        }
    }

    /// Tab label shown on the level menu.
    pub const fn label(self) -> &'static str {
        match self {
            Clef::Treble => "高音譜號",
            Clef::Bass => "低音譜號",
            Clef::Alto => "中音譜號",
            Clef::Tenor => "次中音譜號",
        }
    }
}

impl fmt::Display for Clef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Clef {
    type Err = QuestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "treble" => Ok(Clef::Treble),
            "bass" => Ok(Clef::Bass),
            "alto" => Ok(Clef::Alto),
            "tenor" => Ok(Clef::Tenor),
            _ => Err(QuestError::UnknownClef(s.to_string())),
        }
    }
}
