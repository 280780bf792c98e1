//! # Quiz Session Controller
//!
//! Drives one playthrough of a level: draws questions, scores answers and
//! decides whether the level was passed.
//!
//! The controller works purely in note-index space and never touches the
//! staff geometry. It performs no I/O and never sleeps; deferred events
//! (the feedback delay, the reward request) are represented by tickets the
//! caller hands back later:
//!
//! - [`AdvanceTicket`] from [`QuizController::submit_answer`], redeemed with
//!   [`QuizController::advance`] once feedback has been shown
//! - [`RewardTicket`] from a passed level, redeemed with
//!   [`QuizController::resolve_reward`] when the reward content arrives
//!
//! Every `start` and `return_to_menu` moves the controller to a new epoch.
//! Tickets from an earlier epoch are stale and have no effect, so a late
//! timer or reward can never touch a session the player already left.
//!
//! ## Scoring
//! A correct answer earns `10 + 2 × streak`, where `streak` counts the
//! correct answers immediately before it. A wrong answer earns nothing and
//! resets the streak. A level is passed when the final score reaches the
//! level's required score.
//!
//! ## Example
//! ```rust
//! use clef_quest::quiz::{AdvanceOutcome, QuizController};
//! use clef_quest::{LevelCatalog, NoteName};
//!
//! let catalog = LevelCatalog::load_builtin().unwrap();
//! let mut quiz = QuizController::seeded(7);
//! let note = quiz.start(catalog.require(1).unwrap()).unwrap();
//!
//! let submission = quiz.submit_answer(NoteName::from_index(note)).unwrap();
//! assert_eq!(submission.points, 10);
//! assert!(matches!(quiz.advance(submission.ticket), AdvanceOutcome::NextQuestion { .. }));
//! ```

mod controller;
mod picker;
mod types;

pub use controller::{points_for, QuizController, BASE_POINTS, STREAK_BONUS};
pub use picker::{draw_question, NotePicker, RandomPicker};
pub use types::{
    AdvanceOutcome, AdvanceTicket, Feedback, LevelResult, Phase, RewardStatus, RewardTicket,
    SessionState, Submission,
};

#[cfg(test)]
mod tests;
