//! # Level Catalog
//!
//! Static level descriptors, loaded once from YAML and read-only afterwards.
//!
//! ## Catalog Rules
//! Every catalog (built-in or custom) must satisfy:
//! - at least one level, with unique ids
//! - each note range has `min <= max`
//! - each level asks at least one question
//!
//! The built-in catalog additionally has exactly one level per
//! (clef, difficulty) pair: 4 clefs × 3 difficulties = 12 levels.
//!
//! ## Example
//! ```rust
//! use clef_quest::{Clef, LevelCatalog};
//!
//! let catalog = LevelCatalog::load_builtin().unwrap();
//! assert_eq!(catalog.levels().len(), 12);
//! assert_eq!(catalog.for_clef(Clef::Alto).count(), 3);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::clef::Clef;
use crate::error::QuestError;
use crate::note::NoteIndex;

const BUILTIN_CATALOG: &str = include_str!("levels.yaml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

/// Inclusive range of note indices questions are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRange {
    pub min: NoteIndex,
    pub max: NoteIndex,
}

impl NoteRange {
    pub fn new(min: NoteIndex, max: NoteIndex) -> Self {
        Self { min, max }
    }

    /// Number of distinct note indices in the range (0 if `min > max`).
    pub fn size(&self) -> u64 {
        let span = i64::from(self.max) - i64::from(self.min) + 1;
        span.max(0) as u64
    }

    pub fn contains(&self, index: NoteIndex) -> bool {
        (self.min..=self.max).contains(&index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub clef: Clef,
    pub difficulty: Difficulty,
    pub required_score: u32,
    pub total_questions: u32,
    pub notes_range: NoteRange,
}

impl LevelConfig {
    /// How many different notes the level can ask about.
    pub fn note_count(&self) -> u64 {
        self.notes_range.size()
    }

    /// Display name without the parenthesised English subtitle.
    pub fn short_name(&self) -> &str {
        self.name.split('(').next().unwrap_or(&self.name).trim()
    }
}

#[derive(Deserialize)]
struct RawCatalog {
    levels: Vec<LevelConfig>,
}

/// Ordered, validated collection of levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelCatalog {
    levels: Vec<LevelConfig>,
}

impl LevelCatalog {
    /// Load the catalog embedded in the crate.
    pub fn load_builtin() -> Result<Self, QuestError> {
        let catalog = Self::from_yaml(BUILTIN_CATALOG)?;
        validate_grid(&catalog.levels)?;
        Ok(catalog)
    }

    /// Parse and validate a catalog from YAML with a top-level `levels` list.
    pub fn from_yaml(content: &str) -> Result<Self, QuestError> {
        let raw: RawCatalog = serde_yaml::from_str(content)?;
        Self::new(raw.levels)
    }

    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, QuestError> {
        validate(&levels)?;
        tracing::debug!(levels = levels.len(), "level catalog loaded");
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[LevelConfig] {
        &self.levels
    }

    pub fn get(&self, id: u32) -> Option<&LevelConfig> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// Like [`get`](Self::get), but an unknown id is an error.
    pub fn require(&self, id: u32) -> Result<&LevelConfig, QuestError> {
        self.get(id).ok_or(QuestError::UnknownLevel(id))
    }

    /// Levels for one clef tab of the menu, in catalog order.
    pub fn for_clef(&self, clef: Clef) -> impl Iterator<Item = &LevelConfig> {
        self.levels.iter().filter(move |level| level.clef == clef)
    }
}

fn validate(levels: &[LevelConfig]) -> Result<(), QuestError> {
    if levels.is_empty() {
        return Err(QuestError::Catalog("catalog has no levels".to_string()));
    }
    validate_ids(levels)?;
    for level in levels {
        validate_level(level)?;
    }
    Ok(())
}

fn validate_ids(levels: &[LevelConfig]) -> Result<(), QuestError> {
    let mut seen = HashSet::new();
    for level in levels {
        if !seen.insert(level.id) {
            return Err(QuestError::Catalog(format!("level id {} appears more than once", level.id)));
        }
    }
    Ok(())
}

fn validate_level(level: &LevelConfig) -> Result<(), QuestError> {
    let range = level.notes_range;
    if range.min > range.max {
        return Err(QuestError::Catalog(format!(
            "level {}: note range min {} is above max {}",
            level.id, range.min, range.max
        )));
    }
    if level.total_questions == 0 {
        return Err(QuestError::Catalog(format!("level {}: total questions must be at least 1", level.id)));
    }
    Ok(())
}

/// Exactly one level per (clef, difficulty) pair.
fn validate_grid(levels: &[LevelConfig]) -> Result<(), QuestError> {
    let expected = Clef::ALL.len() * Difficulty::ALL.len();
    if levels.len() != expected {
        return Err(QuestError::Catalog(format!(
            "expected {expected} built-in levels, found {}",
            levels.len()
        )));
    }
    for clef in Clef::ALL {
        for difficulty in Difficulty::ALL {
            let count = levels
                .iter()
                .filter(|l| l.clef == clef && l.difficulty == difficulty)
                .count();
            if count != 1 {
                return Err(QuestError::Catalog(format!(
                    "expected one {difficulty:?} level for the {clef} clef, found {count}"
                )));
            }
        }
    }
    Ok(())
}
