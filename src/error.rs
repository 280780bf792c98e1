//! # Error Types
//!
//! This module defines the error types for clef-quest.
//!
//! Only setup and lookup problems are errors. Gameplay never fails: invalid
//! answers are ignored, and collaborator failures become fallback content
//! before they reach this module.
//!
//! ## Error Types
//! - `QuestError` - catalog loading, lookups, parsing of user input, configuration
//! - `QuizError` - a quiz transition that was refused in the current phase
//!
//! ## Usage
//! ```rust
//! use clef_quest::{LevelCatalog, QuestError};
//!
//! let catalog = LevelCatalog::load_builtin().unwrap();
//! match catalog.require(42) {
//!     Ok(level) => println!("Playing {}", level.name),
//!     Err(QuestError::UnknownLevel(id)) => eprintln!("No level {id}"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuestError {
    /// The level catalog YAML could not be parsed.
    ///
    /// # Example
    /// ```
    /// # use clef_quest::LevelCatalog;
    /// let err = LevelCatalog::from_yaml("levels: 12").unwrap_err();
    /// assert!(err.to_string().starts_with("Failed to parse level catalog"));
    /// ```
    #[error("Failed to parse level catalog: {0}")]
    CatalogParse(#[from] serde_yaml::Error),

    /// The level catalog parsed but violates a catalog rule.
    ///
    /// # Example
    /// ```
    /// # use clef_quest::QuestError;
    /// let err = QuestError::Catalog("level 3: note range min 5 is above max 2".to_string());
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid level catalog: level 3: note range min 5 is above max 2"
    /// );
    /// ```
    #[error("Invalid level catalog: {0}")]
    Catalog(String),

    #[error("Unknown level id: {0}")]
    UnknownLevel(u32),

    /// A clef name that is not one of treble, bass, alto or tenor.
    #[error("Unknown clef '{0}' (expected treble, bass, alto or tenor)")]
    UnknownClef(String),

    /// An answer that is not a single letter A-G.
    #[error("Invalid note name '{0}' (expected one of C D E F G A B)")]
    InvalidNoteName(String),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// A quiz transition refused by the session controller.
///
/// Answer submissions are never refused this way; a submission outside of
/// `AwaitingAnswer` is a silent no-op.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizError {
    /// The previous level passed and its reward has not arrived yet.
    #[error("Reward for level {level_id} is still being prepared")]
    RewardPending { level_id: u32 },

    /// A question is live; the player must finish or return to the menu first.
    #[error("Level {level_id} is still in progress")]
    SessionInProgress { level_id: u32 },

    /// `retry` was called before any level was played.
    #[error("No level has been played yet")]
    NothingToRetry,

    /// The level cannot produce questions (empty note range or zero questions).
    #[error("Level {level_id} cannot be played: {reason}")]
    UnplayableLevel { level_id: u32, reason: &'static str },
}

impl From<figment::Error> for QuestError {
    fn from(err: figment::Error) -> Self {
        QuestError::Config(Box::new(err))
    }
}
