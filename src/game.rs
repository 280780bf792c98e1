//! # Game Driver
//!
//! Runs a [`QuizController`] against real time and a [`RewardProvider`].
//!
//! The controller itself never waits. The driver sleeps for the feedback
//! delay between an answer and the next question, and awaits the reward
//! collaborator when a level is passed. Both deferred steps go through the
//! controller's tickets, so an abandoned session is never touched by them.

use std::time::Duration;

use crate::collection::{Collection, Doll};
use crate::config::GameConfig;
use crate::error::QuestError;
use crate::image::{edit_doll_image, EditOutcome, ImageData, ImageEditor};
use crate::level::{LevelCatalog, LevelConfig};
use crate::note::{NoteIndex, NoteName};
use crate::quiz::{
    AdvanceOutcome, AdvanceTicket, NotePicker, QuizController, RandomPicker, Submission,
};
use crate::reward::RewardProvider;
use crate::staff::{resolve_note, NotePosition};

/// One answered question: the verdict and what came after the feedback delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub submission: Submission,
    pub outcome: AdvanceOutcome,
}

pub struct Game<R, P = RandomPicker> {
    catalog: LevelCatalog,
    quiz: QuizController<P>,
    collection: Collection,
    rewards: R,
    feedback_delay: Duration,
}

impl<R: RewardProvider, P: NotePicker> Game<R, P> {
    /// Game with the configured feedback delay.
    pub fn from_config(
        catalog: LevelCatalog,
        quiz: QuizController<P>,
        rewards: R,
        config: &GameConfig,
    ) -> Self {
        Self::new(catalog, quiz, rewards, config.feedback_delay())
    }

    pub fn new(
        catalog: LevelCatalog,
        quiz: QuizController<P>,
        rewards: R,
        feedback_delay: Duration,
    ) -> Self {
        Self {
            catalog,
            quiz,
            collection: Collection::new(),
            rewards,
            feedback_delay,
        }
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn quiz(&self) -> &QuizController<P> {
        &self.quiz
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// The level being played or just finished.
    pub fn current_level(&self) -> Option<&LevelConfig> {
        self.quiz.session().map(|session| &session.level)
    }

    /// Staff geometry of the live question.
    pub fn current_position(&self) -> Option<NotePosition> {
        let session = self.quiz.session()?;
        Some(resolve_note(session.level.clef, session.note_index))
    }

    pub fn start_level(&mut self, level_id: u32) -> Result<NoteIndex, QuestError> {
        let level = self.catalog.require(level_id)?;
        Ok(self.quiz.start(level)?)
    }

    pub fn retry(&mut self) -> Result<NoteIndex, QuestError> {
        Ok(self.quiz.retry()?)
    }

    /// Score an answer without advancing; pair with [`finish_feedback`](Self::finish_feedback).
    pub fn submit(&mut self, answer: NoteName) -> Option<Submission> {
        self.quiz.submit_answer(answer)
    }

    /// Wait out the feedback delay, then move on to the next question or the result.
    pub async fn finish_feedback(&mut self, ticket: AdvanceTicket) -> AdvanceOutcome {
        if !self.feedback_delay.is_zero() {
            tokio::time::sleep(self.feedback_delay).await;
        }
        self.quiz.advance(ticket)
    }

    /// Submit an answer, show feedback for the configured delay, then advance.
    ///
    /// `None` when no question is waiting for an answer.
    pub async fn answer(&mut self, answer: NoteName) -> Option<Turn> {
        let submission = self.submit(answer)?;
        let outcome = self.finish_feedback(submission.ticket).await;
        Some(Turn {
            submission,
            outcome,
        })
    }

    /// Fetch the reward of a passed level and unlock its doll.
    ///
    /// `None` when no reward is outstanding.
    pub async fn claim_reward(&mut self) -> Option<Doll> {
        let ticket = self.quiz.pending_reward()?.clone();
        tracing::debug!(level = ticket.level_id(), "requesting reward");
        let reward = self
            .rewards
            .request_reward(ticket.clef(), ticket.score(), ticket.level_name())
            .await;
        self.quiz.resolve_reward(&ticket, reward, &mut self.collection)
    }

    /// Apply a magic edit to one of the collected dolls.
    ///
    /// On [`EditOutcome::Retry`] the doll keeps its picture.
    pub async fn retouch_doll<E: ImageEditor>(
        &mut self,
        editor: &E,
        doll_id: &str,
        source: &ImageData,
        prompt: &str,
    ) -> EditOutcome {
        edit_doll_image(editor, &mut self.collection, doll_id, source, prompt).await
    }

    pub fn return_to_menu(&mut self) {
        self.quiz.return_to_menu();
    }
}
