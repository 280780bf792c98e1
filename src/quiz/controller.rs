use crate::collection::{Collection, Doll};
use crate::error::QuizError;
use crate::level::LevelConfig;
use crate::note::{NoteIndex, NoteName};
use crate::reward::RewardData;

use super::picker::{draw_question, NotePicker, RandomPicker};
use super::types::{
    AdvanceOutcome, AdvanceTicket, Feedback, LevelResult, Phase, RewardStatus, RewardTicket,
    SessionState, Submission,
};

/// Points for a correct answer before the streak bonus.
pub const BASE_POINTS: u32 = 10;
/// Extra points per consecutive correct answer before this one.
pub const STREAK_BONUS: u32 = 2;

/// Points for a correct answer given the streak before it.
pub fn points_for(streak: u32) -> u32 {
    BASE_POINTS.saturating_add(STREAK_BONUS.saturating_mul(streak))
}

/// State machine for one player's quiz sessions.
#[derive(Debug, Clone)]
pub struct QuizController<P = RandomPicker> {
    picker: P,
    phase: Phase,
    session: Option<SessionState>,
    result: Option<LevelResult>,
    last_level: Option<LevelConfig>,
    epoch: u64,
    pending_reward: Option<RewardTicket>,
}

impl QuizController<RandomPicker> {
    /// Controller with reproducible question order.
    pub fn seeded(seed: u64) -> Self {
        Self::with_picker(RandomPicker::seeded(seed))
    }

    #[cfg(feature = "native")]
    pub fn from_entropy() -> Self {
        Self::with_picker(RandomPicker::from_entropy())
    }
}

impl<P: NotePicker> QuizController<P> {
    pub fn with_picker(picker: P) -> Self {
        Self {
            picker,
            phase: Phase::Idle,
            session: None,
            result: None,
            last_level: None,
            epoch: 0,
            pending_reward: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    /// Verdict of the last finished level, until the player leaves it.
    pub fn result(&self) -> Option<&LevelResult> {
        self.result.as_ref()
    }

    pub fn pending_reward(&self) -> Option<&RewardTicket> {
        self.pending_reward.as_ref()
    }

    pub fn is_reward_pending(&self) -> bool {
        self.pending_reward.is_some()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn last_level(&self) -> Option<&LevelConfig> {
        self.last_level.as_ref()
    }

    /// Begin a fresh session of `level` and return the first question.
    pub fn start(&mut self, level: &LevelConfig) -> Result<NoteIndex, QuizError> {
        if let Some(ticket) = &self.pending_reward {
            return Err(QuizError::RewardPending {
                level_id: ticket.level_id,
            });
        }
        if matches!(self.phase, Phase::AwaitingAnswer | Phase::ShowingFeedback) {
            let level_id = self.session.as_ref().map_or(level.id, |s| s.level.id);
            return Err(QuizError::SessionInProgress { level_id });
        }
        if level.notes_range.size() == 0 {
            return Err(QuizError::UnplayableLevel {
                level_id: level.id,
                reason: "empty note range",
            });
        }
        if level.total_questions == 0 {
            return Err(QuizError::UnplayableLevel {
                level_id: level.id,
                reason: "no questions",
            });
        }

        self.epoch = self.epoch.wrapping_add(1);
        let first = draw_question(&mut self.picker, level.notes_range, None);
        self.session = Some(SessionState::new(level.clone(), first));
        self.result = None;
        self.last_level = Some(level.clone());
        self.phase = Phase::AwaitingAnswer;
        tracing::debug!(level = level.id, epoch = self.epoch, note = first, "level started");
        Ok(first)
    }

    /// Start the most recently played level again.
    pub fn retry(&mut self) -> Result<NoteIndex, QuizError> {
        let level = self.last_level.clone().ok_or(QuizError::NothingToRetry)?;
        self.start(&level)
    }

    /// Score an answer to the current question.
    ///
    /// Returns `None` without touching any state unless a question is
    /// waiting for its answer.
    pub fn submit_answer(&mut self, answer: NoteName) -> Option<Submission> {
        if self.phase != Phase::AwaitingAnswer {
            return None;
        }
        let session = self.session.as_mut()?;
        let correct_name = session.correct_name();

        let (feedback, points) = if answer == correct_name {
            let points = points_for(session.streak);
            session.score = session.score.saturating_add(points);
            session.streak = session.streak.saturating_add(1);
            (Feedback::Correct, points)
        } else {
            session.streak = 0;
            (Feedback::Wrong, 0)
        };
        session.feedback = Some(feedback);
        self.phase = Phase::ShowingFeedback;

        let ticket = AdvanceTicket {
            epoch: self.epoch,
            level_id: session.level.id,
            question: session.questions_answered,
        };
        tracing::debug!(
            ?answer,
            expected = ?correct_name,
            ?feedback,
            score = session.score,
            "answer scored"
        );
        Some(Submission {
            feedback,
            correct_name,
            points,
            ticket,
        })
    }

    /// Move past the feedback of an answered question.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> AdvanceOutcome {
        if self.phase != Phase::ShowingFeedback || ticket.epoch != self.epoch {
            tracing::debug!(?ticket, epoch = self.epoch, "stale advance ticket");
            return AdvanceOutcome::Stale;
        }
        let Some(session) = self.session.as_mut() else {
            return AdvanceOutcome::Stale;
        };
        if ticket.level_id != session.level.id || ticket.question != session.questions_answered {
            tracing::debug!(?ticket, "advance ticket does not match the live question");
            return AdvanceOutcome::Stale;
        }

        session.questions_answered = session.questions_answered.saturating_add(1);
        session.feedback = None;
        if session.questions_answered >= session.level.total_questions {
            return self.complete();
        }

        let next = draw_question(
            &mut self.picker,
            session.level.notes_range,
            Some(session.note_index),
        );
        session.note_index = next;
        self.phase = Phase::AwaitingAnswer;
        AdvanceOutcome::NextQuestion { note_index: next }
    }

    fn complete(&mut self) -> AdvanceOutcome {
        let Some(session) = self.session.as_ref() else {
            return AdvanceOutcome::Stale;
        };
        let level = &session.level;
        let passed = session.score >= level.required_score;

        let reward_ticket = passed.then(|| RewardTicket {
            epoch: self.epoch,
            level_id: level.id,
            clef: level.clef,
            score: session.score,
            level_name: level.name.clone(),
        });
        let result = LevelResult {
            level_id: level.id,
            final_score: session.score,
            required_score: level.required_score,
            passed,
            reward: if passed {
                RewardStatus::Pending
            } else {
                RewardStatus::NotEarned
            },
        };
        tracing::info!(
            level = level.id,
            score = session.score,
            required = level.required_score,
            passed,
            "level completed"
        );

        self.pending_reward = reward_ticket.clone();
        self.result = Some(result.clone());
        self.phase = Phase::Completed;
        AdvanceOutcome::Completed {
            result,
            reward_ticket,
        }
    }

    /// Deliver the reward for `ticket` and unlock its doll.
    ///
    /// Incomplete rewards are replaced by the fallback reward. Returns `None`
    /// when the ticket is no longer outstanding.
    pub fn resolve_reward(
        &mut self,
        ticket: &RewardTicket,
        reward: RewardData,
        collection: &mut Collection,
    ) -> Option<Doll> {
        if self.pending_reward.as_ref() != Some(ticket) {
            tracing::debug!(level = ticket.level_id, "discarding reward for an abandoned level");
            return None;
        }
        self.pending_reward = None;

        let reward = reward.or_fallback();
        let doll = collection.unlock(&reward).clone();
        if let Some(result) = self.result.as_mut().filter(|r| r.level_id == ticket.level_id) {
            result.reward = RewardStatus::Unlocked {
                reward,
                doll_id: doll.id.clone(),
            };
        }
        Some(doll)
    }

    /// Abandon whatever is on screen and go back to level selection.
    ///
    /// Outstanding advance and reward tickets become stale.
    pub fn return_to_menu(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(ticket) = self.pending_reward.take() {
            tracing::debug!(level = ticket.level_id, "pending reward dropped");
        }
        self.session = None;
        self.result = None;
        self.phase = Phase::Idle;
    }
}
