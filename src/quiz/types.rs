//! Quiz session type definitions

use serde::{Deserialize, Serialize};

use crate::clef::Clef;
use crate::level::LevelConfig;
use crate::note::{NoteIndex, NoteName};
use crate::reward::RewardData;

/// Controller phase.
///
/// ```text
/// Idle ──start──▶ AwaitingAnswer ──submit──▶ ShowingFeedback ──advance──┐
///   ▲                   ▲                                              │
///   │                   └─────────────── more questions ◀──────────────┤
///   │                                                                  ▼
///   └──────────── return_to_menu ◀──────────────────────────────── Completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    AwaitingAnswer,
    ShowingFeedback,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Feedback {
    Correct,
    Wrong,
}

/// Per-playthrough state, created by `start` and dropped on return to the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub level: LevelConfig,
    /// The active question.
    pub note_index: NoteIndex,
    pub score: u32,
    pub questions_answered: u32,
    pub streak: u32,
    /// Feedback for the last answer while it is on screen.
    pub feedback: Option<Feedback>,
}

impl SessionState {
    pub(crate) fn new(level: LevelConfig, first_note: NoteIndex) -> Self {
        Self {
            level,
            note_index: first_note,
            score: 0,
            questions_answered: 0,
            streak: 0,
            feedback: None,
        }
    }

    pub fn questions_remaining(&self) -> u32 {
        self.level.total_questions.saturating_sub(self.questions_answered)
    }

    /// Letter the player is expected to answer.
    pub fn correct_name(&self) -> NoteName {
        NoteName::from_index(self.note_index)
    }
}

/// Token for the deferred advance after feedback has been shown.
///
/// Only the ticket issued for the current answer of the current session is
/// honoured; anything older is stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceTicket {
    pub(crate) epoch: u64,
    pub(crate) level_id: u32,
    pub(crate) question: u32,
}

/// Token for an outstanding reward request of a passed level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardTicket {
    pub(crate) epoch: u64,
    pub(crate) level_id: u32,
    pub(crate) clef: Clef,
    pub(crate) score: u32,
    pub(crate) level_name: String,
}

impl RewardTicket {
    pub fn level_id(&self) -> u32 {
        self.level_id
    }

    pub fn clef(&self) -> Clef {
        self.clef
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }
}

/// Result of an accepted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub feedback: Feedback,
    /// The letter that was expected.
    pub correct_name: NoteName,
    /// Points added by this answer (0 when wrong).
    pub points: u32,
    pub ticket: AdvanceTicket,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "status")]
pub enum RewardStatus {
    /// The level was failed.
    NotEarned,
    /// Waiting for the reward collaborator.
    Pending,
    Unlocked { reward: RewardData, doll_id: String },
}

/// Final verdict of a finished level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelResult {
    pub level_id: u32,
    pub final_score: u32,
    pub required_score: u32,
    pub passed: bool,
    pub reward: RewardStatus,
}

/// What an advance ticket did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum AdvanceOutcome {
    /// The ticket belonged to an abandoned or already-advanced question.
    Stale,
    NextQuestion { note_index: NoteIndex },
    Completed {
        result: LevelResult,
        reward_ticket: Option<RewardTicket>,
    },
}
