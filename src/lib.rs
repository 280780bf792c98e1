pub mod clef;
pub mod collection;
pub mod config;
pub mod error;
pub mod image;
pub mod level;
pub mod note;
pub mod quiz;
pub mod render;
pub mod reward;
pub mod staff;

#[cfg(feature = "native")]
pub mod game;
#[cfg(feature = "native")]
pub mod gemini;

pub use clef::Clef;
pub use collection::{Collection, Doll};
pub use config::{GameConfig, GeminiConfig, QuestConfig};
pub use error::*;
pub use image::{edit_doll_image, EditOutcome, ImageData, ImageEditor, NoImageEditor};
pub use level::{Difficulty, LevelCatalog, LevelConfig, NoteRange};
pub use note::{name, NoteIndex, NoteName, NOTE_NAMES};
pub use quiz::QuizController;
pub use render::{staff_svg, staff_text};
pub use reward::{OfflineRewards, RewardData, RewardProvider};
pub use staff::{resolve_note, NotePosition, StemDirection};

/// Resolve and draw a note as an SVG staff in one step.
/// This is the main entry point for front ends that only display notes.
pub fn render_note(clef: Clef, note_index: NoteIndex) -> String {
    staff_svg(clef, &resolve_note(clef, note_index))
}
