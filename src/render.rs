//! Staff drawings built from resolver output.
//!
//! Two targets: an SVG fragment matching the browser game's 300×200 staff,
//! and a plain-text staff for terminals. Both consume only a [`NotePosition`].

use crate::clef::Clef;
use crate::staff::{NotePosition, StemDirection, BOTTOM_LINE, TOP_LINE};

// ── SVG geometry (user units) ───────────────────────────────────────
const VIEW_WIDTH: f64 = 300.0;
const VIEW_HEIGHT: f64 = 200.0;
pub const LINE_SPACING: f64 = 20.0;
pub const STAFF_TOP_Y: f64 = 60.0;
const STAFF_LEFT_X: f64 = 10.0;
const STAFF_RIGHT_X: f64 = 290.0;
const NOTE_X: f64 = 150.0;
const NOTE_RADIUS: f64 = 9.0;
const STEM_LENGTH: f64 = 55.0;
const LEDGER_HALF_WIDTH: f64 = 20.0;
const LINE_COLOR: &str = "#374151";
const NOTE_COLOR: &str = "#000";
const CLEF_COLOR: &str = "#111827";

const TREBLE_GLYPH: &str = "M26.5 63.5C26.5 68 25 71 22 73.5C19 76 15 76.5 11.5 75.5C8 74.5 5.5 72 4 68.5C2.5 65 2.5 61 4 57.5C5.5 54 8.5 51.5 12 50.5C12.5 50.4 13 50.4 13.5 50.4C10.5 48.4 8.5 45.4 8.5 41.5C8.5 35.7 13.2 31 19 31C19.5 31 20 31 20.5 31.1C20.5 31.1 20.4 31 20.4 31C19.4 25.4 18.5 19.9 17.5 14.5C17.2 12.8 17 11 17 9.5C17 4.2 21.2 0 26.5 0C31.8 0 36 4.2 36 9.5C36 12.5 34.9 15.2 33 17.2C31.2 19.3 28.7 20.6 26 20.9L27.5 29.5C33.5 30.5 38 35.7 38 42C38 48.6 32.6 54 26 54C25.4 54 24.8 53.9 24.3 53.9C25.6 56.6 26.5 59.9 26.5 63.5ZM26 49.9C29.3 49.2 32 46.1 32 42C32 37.9 29.3 34.8 26 34.1L24.3 44.4C25.3 45.9 26 47.8 26 49.9ZM20.8 35.1L22.4 44.4C20.4 43.1 18.2 42.6 16 43.1C14.7 43.4 13.6 44 12.8 44.9C13.2 39.9 16.5 35.8 20.8 35.1ZM22.5 57.5L21.4 51.1C16.9 52.4 13.6 56.5 13.6 61.5C13.6 66.2 17.4 70 22.1 70C24.4 70 26.5 69.1 28.1 67.5C29.7 65.9 30.6 63.8 30.6 61.5C30.6 60.1 30.3 58.7 29.7 57.5H22.5ZM29.5 5.5C29.5 3.8 28.2 2.5 26.5 2.5C24.8 2.5 23.5 3.8 23.5 5.5C23.5 6.8 23.9 7.9 24.6 8.8L26.4 18.7C28.2 18.2 29.5 16.5 29.5 14.5V5.5Z";
const BASS_GLYPH: &str = "M12 16.5C12 12.4 15.4 9 19.5 9C23.6 9 27 12.4 27 16.5C27 20.6 23.6 24 19.5 24C18.6 24 17.7 23.8 16.9 23.5C19.3 26.6 20.6 30.5 20.6 34.5C20.6 44.7 12.4 53 2.1 53C1.4 53 0.7 52.9 0 52.8C1.8 56.9 5.9 60 10.6 60C16.7 60 21.6 55.1 21.6 49C21.6 47.3 21.2 45.7 20.6 44.2C24.1 41.8 26.5 37.9 26.5 33.5C26.5 30.2 25.4 27.2 23.6 24.7C26.2 23.1 28 20.1 28 16.5C28 11.8 24.2 8 19.5 8C14.8 8 11 11.8 11 16.5H12ZM34 16.5C34 17.9 35.1 19 36.5 19C37.9 19 39 17.9 39 16.5C39 15.1 37.9 14 36.5 14C35.1 14 34 15.1 34 16.5ZM34 25.5C34 26.9 35.1 28 36.5 28C37.9 28 39 26.9 39 25.5C39 24.1 37.9 23 36.5 23C35.1 23 34 24.1 34 25.5Z";
const C_CLEF_GLYPH: &str = "M20 0V60M20 30L0 30M20 30L35 15M20 30L35 45M35 15C38 15 40 18 40 22C40 26 38 29 35 30C38 31 40 34 40 38C40 42 38 45 35 45M20 0H10M20 60H10";

// ── Text geometry (columns / rows) ──────────────────────────────────
const TEXT_WIDTH: usize = 25;
const TEXT_NOTE_COL: usize = 12;
const TEXT_LEDGER_HALF_WIDTH: usize = 3;
const TEXT_STEM_STEPS: i32 = 5;

/// Y coordinate of the bottom staff line.
pub fn bottom_line_y() -> f64 {
    STAFF_TOP_Y + 4.0 * LINE_SPACING
}

/// Y coordinate of a staff step; each step is half a line spacing.
pub fn y_for_step(steps: i32) -> f64 {
    bottom_line_y() - f64::from(steps) * (LINE_SPACING / 2.0)
}

/// Render a single-note staff as a standalone SVG document.
pub fn staff_svg(clef: Clef, position: &NotePosition) -> String {
    let mut svg = String::new();

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = VIEW_WIDTH,
        h = VIEW_HEIGHT
    ));
    svg.push('\n');

    for line in 0..5 {
        let y = STAFF_TOP_Y + f64::from(line) * LINE_SPACING;
        svg.push_str(&svg_line(STAFF_LEFT_X, y, STAFF_RIGHT_X, y, LINE_COLOR));
    }

    let (glyph, scale, translate_y) = clef_placement(clef);
    svg.push_str(&format!(
        "  <g transform=\"translate(20, {translate_y}) scale({scale})\"><path d=\"{glyph}\" fill=\"{CLEF_COLOR}\"/></g>\n"
    ));

    for &ledger in &position.ledger_lines {
        let y = y_for_step(ledger);
        svg.push_str(&svg_line(
            NOTE_X - LEDGER_HALF_WIDTH,
            y,
            NOTE_X + LEDGER_HALF_WIDTH,
            y,
            LINE_COLOR,
        ));
    }

    svg.push_str(&format!(
        "  <g transform=\"translate({NOTE_X}, {:.1})\">\n",
        y_for_step(position.steps)
    ));
    svg.push_str(&format!(
        "    <ellipse cx=\"0\" cy=\"0\" rx=\"{:.1}\" ry=\"{NOTE_RADIUS}\" fill=\"{NOTE_COLOR}\" transform=\"rotate(-15)\"/>\n",
        NOTE_RADIUS * 1.3
    ));
    let stem_x = NOTE_RADIUS + 1.0;
    let stem = match position.stem {
        StemDirection::Up => svg_line(stem_x, 0.0, stem_x, -STEM_LENGTH, NOTE_COLOR),
        StemDirection::Down => svg_line(-stem_x, 5.0, -stem_x, STEM_LENGTH, NOTE_COLOR),
    };
    svg.push_str("  ");
    svg.push_str(&stem);
    svg.push_str("  </g>\n");

    svg.push_str("</svg>\n");
    svg
}

fn svg_line(x1: f64, y1: f64, x2: f64, y2: f64, color: &str) -> String {
    format!(
        "  <line x1=\"{x1:.1}\" y1=\"{y1:.1}\" x2=\"{x2:.1}\" y2=\"{y2:.1}\" stroke=\"{color}\" stroke-width=\"2\"/>\n"
    )
}

/// Glyph path, scale and vertical offset for each clef symbol.
fn clef_placement(clef: Clef) -> (&'static str, f64, f64) {
    match clef {
        Clef::Treble => (TREBLE_GLYPH, 1.0, STAFF_TOP_Y - 15.0),
        Clef::Bass => (BASS_GLYPH, 1.2, STAFF_TOP_Y - 5.0),
        Clef::Alto => (C_CLEF_GLYPH, 0.8, STAFF_TOP_Y - 10.0),
        Clef::Tenor => (C_CLEF_GLYPH, 0.8, STAFF_TOP_Y - 20.0),
    }
}

/// Whether `row` carries one of the ledger lines of a note at `steps`.
fn is_ledger_row(steps: i32, row: i32) -> bool {
    row % 2 == 0
        && ((steps..=BOTTOM_LINE - 2).contains(&row) || (TOP_LINE + 2..=steps).contains(&row))
}

/// Render a single-note staff as text, one row per step, top row first.
///
/// Staff lines span the full width, ledger lines are short, the note head is
/// `O` and the stem is `|`.
pub fn staff_text(position: &NotePosition) -> String {
    let steps = position.steps;
    let (stem_low, stem_high) = match position.stem {
        StemDirection::Up => (steps.saturating_add(1), steps.saturating_add(TEXT_STEM_STEPS)),
        StemDirection::Down => (steps.saturating_sub(TEXT_STEM_STEPS), steps.saturating_sub(1)),
    };
    let top = stem_high.max(steps).max(TOP_LINE + 2);
    let bottom = stem_low.min(steps).min(BOTTOM_LINE - 2);
    let stem_col = match position.stem {
        StemDirection::Up => TEXT_NOTE_COL + 1,
        StemDirection::Down => TEXT_NOTE_COL - 1,
    };

    let mut out = String::new();
    let mut row = top;
    loop {
        let mut cells = vec![' '; TEXT_WIDTH];
        let on_staff_line = row % 2 == 0 && (BOTTOM_LINE..=TOP_LINE).contains(&row);
        if on_staff_line {
            cells.iter_mut().for_each(|c| *c = '-');
        } else if is_ledger_row(steps, row) {
            let from = TEXT_NOTE_COL - TEXT_LEDGER_HALF_WIDTH;
            let to = TEXT_NOTE_COL + TEXT_LEDGER_HALF_WIDTH;
            cells[from..=to].iter_mut().for_each(|c| *c = '-');
        }
        if (stem_low..=stem_high).contains(&row) {
            cells[stem_col] = '|';
        }
        if row == steps {
            cells[TEXT_NOTE_COL] = 'O';
        }

        let line: String = cells.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');

        if row <= bottom {
            break;
        }
        row -= 1;
    }
    out
}
