//! # Note Position Resolver
//!
//! Maps a clef and a note index to the geometry needed to draw the note on a
//! five-line staff.
//!
//! ## Staff Steps
//! Positions are measured in *steps*: half a line spacing, counted up from
//! the bottom line. The five lines sit on even steps, the spaces on odd ones.
//!
//! ```text
//!  10  ── (ledger)
//!   9
//!   8  ─────────── line 5
//!   7
//!   6  ─────────── line 4
//!   5
//!   4  ─────────── line 3 (middle)
//!   3
//!   2  ─────────── line 2
//!   1
//!   0  ─────────── line 1
//!  -1
//!  -2  ── (ledger)
//! ```
//!
//! ## Conventions
//! - `steps = clef.reference_offset() + note_index`
//! - Ledger lines are drawn on every even step outside the staff up to the
//!   note, never for the first space just outside (-1 or 9).
//! - Stems point up below the middle line and down from it upwards. Standard
//!   engraving treats the middle line as ambiguous; this game always turns
//!   the stem down there.
//!
//! The resolver is pure and total. Indices far outside the staff just
//! produce many ledger lines; nothing is clamped.

use serde::Serialize;

use crate::clef::Clef;
use crate::note::NoteIndex;

/// Step of the bottom staff line.
pub const BOTTOM_LINE: i32 = 0;
/// Step of the top staff line.
pub const TOP_LINE: i32 = 8;
/// Step of the middle staff line.
pub const MIDDLE_LINE: i32 = 4;

const FIRST_LEDGER_BELOW: i32 = BOTTOM_LINE - 2;
const FIRST_LEDGER_ABOVE: i32 = TOP_LINE + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StemDirection {
    Up,
    Down,
}

/// Everything a renderer needs to draw one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePosition {
    /// Steps from the bottom line (lines are 0, 2, 4, 6, 8).
    pub steps: i32,
    /// Steps that need a ledger line, ordered outward from the staff.
    pub ledger_lines: Vec<i32>,
    pub stem: StemDirection,
}

impl NotePosition {
    pub fn is_on_line(&self) -> bool {
        self.steps % 2 == 0
    }

    pub fn is_within_staff(&self) -> bool {
        (BOTTOM_LINE..=TOP_LINE).contains(&self.steps)
    }
}

/// Resolve the drawing geometry for `note_index` under `clef`.
///
/// ```
/// use clef_quest::{resolve_note, Clef, StemDirection};
///
/// // Index 0 under the treble clef sits on the first ledger line below.
/// let pos = resolve_note(Clef::Treble, 0);
/// assert_eq!(pos.steps, -2);
/// assert_eq!(pos.ledger_lines, vec![-2]);
/// assert_eq!(pos.stem, StemDirection::Up);
/// ```
pub fn resolve_note(clef: Clef, note_index: NoteIndex) -> NotePosition {
    let steps = steps_from_bottom_line(clef, note_index);
    NotePosition {
        steps,
        ledger_lines: ledger_lines(steps),
        stem: stem_direction(steps),
    }
}

/// Vertical position of a note, saturating at the `i32` range.
pub fn steps_from_bottom_line(clef: Clef, note_index: NoteIndex) -> i32 {
    clef.reference_offset().saturating_add(note_index)
}

/// Ledger line steps for a note at `steps`, ordered from the staff outward.
pub fn ledger_lines(steps: i32) -> Vec<i32> {
    if steps < FIRST_LEDGER_BELOW + 1 {
        std::iter::successors(Some(FIRST_LEDGER_BELOW), |s| s.checked_sub(2))
            .take_while(|&s| s >= steps)
            .collect()
    } else if steps > FIRST_LEDGER_ABOVE - 1 {
        std::iter::successors(Some(FIRST_LEDGER_ABOVE), |s| s.checked_add(2))
            .take_while(|&s| s <= steps)
            .collect()
    } else {
        Vec::new()
    }
}

/// Number of ledger lines [`ledger_lines`] would produce, without allocating.
pub fn ledger_line_count(steps: i32) -> u32 {
    if steps < FIRST_LEDGER_BELOW + 1 {
        let distance = i64::from(FIRST_LEDGER_BELOW) - i64::from(steps);
        (distance / 2 + 1) as u32
    } else if steps > FIRST_LEDGER_ABOVE - 1 {
        let distance = i64::from(steps) - i64::from(FIRST_LEDGER_ABOVE);
        (distance / 2 + 1) as u32
    } else {
        0
    }
}

pub fn stem_direction(steps: i32) -> StemDirection {
    if steps < MIDDLE_LINE {
        StemDirection::Up
    } else {
        StemDirection::Down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Clef::Treble, 0, -2)]
    #[case(Clef::Treble, 2, 0)]
    #[case(Clef::Bass, 0, 3)]
    #[case(Clef::Bass, -4, -1)]
    #[case(Clef::Alto, 0, 4)]
    #[case(Clef::Alto, -7, -3)]
    #[case(Clef::Tenor, 0, 6)]
    #[case(Clef::Tenor, -9, -3)]
    fn test_steps_per_clef(#[case] clef: Clef, #[case] index: NoteIndex, #[case] steps: i32) {
        assert_eq!(steps_from_bottom_line(clef, index), steps);
    }

    #[test]
    fn test_treble_middle_c_has_one_ledger_line() {
        let pos = resolve_note(Clef::Treble, 0);
        assert_eq!(pos.steps, -2);
        assert_eq!(pos.ledger_lines, vec![-2]);
    }

    #[test]
    fn test_first_space_outside_has_no_ledger_line() {
        assert!(ledger_lines(-1).is_empty());
        assert!(ledger_lines(9).is_empty());
    }

    #[test]
    fn test_no_ledger_lines_inside_staff() {
        for steps in 0..=8 {
            assert!(ledger_lines(steps).is_empty(), "steps {steps}");
        }
    }

    #[test]
    fn test_ledger_lines_below_round_toward_staff() {
        assert_eq!(ledger_lines(-3), vec![-2]);
        assert_eq!(ledger_lines(-4), vec![-2, -4]);
        assert_eq!(ledger_lines(-5), vec![-2, -4]);
    }

    #[test]
    fn test_ledger_lines_above() {
        assert_eq!(ledger_lines(10), vec![10]);
        assert_eq!(ledger_lines(11), vec![10]);
        assert_eq!(ledger_lines(14), vec![10, 12, 14]);
    }

    #[test]
    fn test_ledger_count_matches_lines() {
        for steps in -40..40 {
            assert_eq!(ledger_line_count(steps) as usize, ledger_lines(steps).len(), "steps {steps}");
        }
    }

    #[test]
    fn test_extreme_indices_do_not_overflow() {
        assert_eq!(steps_from_bottom_line(Clef::Tenor, i32::MAX), i32::MAX);
        assert_eq!(steps_from_bottom_line(Clef::Treble, i32::MIN), i32::MIN);
        assert_eq!(ledger_line_count(i32::MIN), (i32::MAX as u32) / 2 + 1);
        let far = resolve_note(Clef::Treble, -1000);
        assert_eq!(far.ledger_lines.len(), 501);
        assert_eq!(far.ledger_lines.last(), Some(&-1002));
    }

    #[rstest]
    #[case(-2, StemDirection::Up)]
    #[case(3, StemDirection::Up)]
    #[case(4, StemDirection::Down)]
    #[case(12, StemDirection::Down)]
    fn test_stem_direction(#[case] steps: i32, #[case] stem: StemDirection) {
        assert_eq!(stem_direction(steps), stem);
    }

    #[test]
    fn test_resolver_is_deterministic() {
        for clef in Clef::ALL {
            for index in -12..=12 {
                assert_eq!(resolve_note(clef, index), resolve_note(clef, index));
            }
        }
    }

    #[test]
    fn test_position_helpers() {
        let on_line = resolve_note(Clef::Alto, 0);
        assert!(on_line.is_on_line());
        assert!(on_line.is_within_staff());
        let below = resolve_note(Clef::Bass, -4);
        assert!(!below.is_on_line());
        assert!(!below.is_within_staff());
    }
}
