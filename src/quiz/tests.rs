use super::*;
use crate::clef::Clef;
use crate::collection::Collection;
use crate::error::QuizError;
use crate::level::{Difficulty, LevelConfig, LevelCatalog, NoteRange};
use crate::note::{NoteIndex, NoteName};
use crate::reward::RewardData;
use pretty_assertions::assert_eq;
use std::collections::VecDeque;

/// Returns scripted draws, then `min` once the script runs out.
struct ScriptedPicker(VecDeque<NoteIndex>);

impl NotePicker for ScriptedPicker {
    fn pick(&mut self, min: NoteIndex, _max: NoteIndex) -> NoteIndex {
        self.0.pop_front().unwrap_or(min)
    }
}

fn scripted(values: &[NoteIndex]) -> QuizController<ScriptedPicker> {
    QuizController::with_picker(ScriptedPicker(values.iter().copied().collect()))
}

fn level(id: u32, total_questions: u32, required_score: u32) -> LevelConfig {
    LevelConfig {
        id,
        name: format!("Test {id} (Test)"),
        description: "test level".to_string(),
        clef: Clef::Bass,
        difficulty: Difficulty::Medium,
        required_score,
        total_questions,
        notes_range: NoteRange::new(0, 6),
    }
}

/// Answer the live question right or wrong.
fn answer<P: NotePicker>(quiz: &mut QuizController<P>, correct: bool) -> Submission {
    let note = quiz.session().unwrap().note_index;
    let name = if correct {
        NoteName::from_index(note)
    } else {
        NoteName::from_index(note + 1)
    };
    quiz.submit_answer(name).unwrap()
}

/// Answer and advance once per entry of `pattern`, returning the last outcome.
fn play<P: NotePicker>(quiz: &mut QuizController<P>, pattern: &[bool]) -> AdvanceOutcome {
    let mut outcome = AdvanceOutcome::Stale;
    for &correct in pattern {
        let submission = answer(quiz, correct);
        outcome = quiz.advance(submission.ticket);
    }
    outcome
}

fn completed(outcome: AdvanceOutcome) -> (LevelResult, Option<RewardTicket>) {
    match outcome {
        AdvanceOutcome::Completed {
            result,
            reward_ticket,
        } => (result, reward_ticket),
        other => panic!("expected completion, got {other:?}"),
    }
}

#[test]
fn test_start_resets_session() {
    let mut quiz = scripted(&[3]);
    assert_eq!(quiz.phase(), Phase::Idle);

    let first = quiz.start(&level(1, 10, 80)).unwrap();

    assert_eq!(first, 3);
    assert_eq!(quiz.phase(), Phase::AwaitingAnswer);
    let session = quiz.session().unwrap();
    assert_eq!(session.note_index, 3);
    assert_eq!(session.score, 0);
    assert_eq!(session.streak, 0);
    assert_eq!(session.questions_answered, 0);
    assert_eq!(session.feedback, None);
    assert_eq!(session.questions_remaining(), 10);
    assert_eq!(session.correct_name(), NoteName::F);
}

#[test]
fn test_streak_scoring() {
    let mut quiz = scripted(&[0, 1, 2, 3, 4, 5]);
    quiz.start(&level(1, 10, 80)).unwrap();

    let mut points = Vec::new();
    for correct in [true, true, true, false, true] {
        let submission = answer(&mut quiz, correct);
        points.push(submission.points);
        quiz.advance(submission.ticket);
    }

    assert_eq!(points, vec![10, 12, 14, 0, 10]);
    let session = quiz.session().unwrap();
    assert_eq!(session.score, 46);
    assert_eq!(session.streak, 1);
    assert_eq!(session.questions_answered, 5);
}

#[test]
fn test_feedback_reports_expected_letter() {
    let mut quiz = scripted(&[4]);
    quiz.start(&level(1, 3, 10)).unwrap();

    let submission = quiz.submit_answer(NoteName::C).unwrap();

    assert_eq!(submission.feedback, Feedback::Wrong);
    assert_eq!(submission.correct_name, NoteName::G);
    assert_eq!(quiz.phase(), Phase::ShowingFeedback);
    assert_eq!(quiz.session().unwrap().feedback, Some(Feedback::Wrong));
}

#[test]
fn test_double_submit_is_ignored() {
    let mut quiz = scripted(&[2]);
    quiz.start(&level(1, 10, 80)).unwrap();

    let first = answer(&mut quiz, true);
    let before = quiz.session().unwrap().clone();

    assert_eq!(quiz.submit_answer(NoteName::E), None);
    assert_eq!(quiz.submit_answer(NoteName::A), None);
    assert_eq!(quiz.session().unwrap(), &before);
    assert_eq!(first.points, 10);
}

#[test]
fn test_submit_without_session_is_ignored() {
    let mut quiz = QuizController::seeded(1);
    assert_eq!(quiz.submit_answer(NoteName::C), None);
    assert_eq!(quiz.phase(), Phase::Idle);
}

#[test]
fn test_anti_repeat_nudges_repeated_draw() {
    let mut quiz = scripted(&[2, 2, 2, 6, 6]);
    let mut level = level(1, 10, 80);
    level.notes_range = NoteRange::new(0, 6);

    let first = quiz.start(&level).unwrap();
    let mut questions = vec![first];
    for _ in 0..4 {
        let submission = answer(&mut quiz, true);
        match quiz.advance(submission.ticket) {
            AdvanceOutcome::NextQuestion { note_index } => questions.push(note_index),
            other => panic!("unexpected {other:?}"),
        }
    }

    assert_eq!(questions, vec![2, 3, 2, 6, 5]);
}

#[test]
fn test_single_note_level_repeats() {
    let mut quiz = QuizController::seeded(5);
    let mut level = level(1, 4, 10);
    level.notes_range = NoteRange::new(-3, -3);

    quiz.start(&level).unwrap();
    for _ in 0..3 {
        let submission = answer(&mut quiz, true);
        assert_eq!(
            quiz.advance(submission.ticket),
            AdvanceOutcome::NextQuestion { note_index: -3 }
        );
    }
}

#[test]
fn test_first_question_is_never_nudged() {
    let mut quiz = scripted(&[4, 4]);
    let level = level(1, 1, 10);

    assert_eq!(quiz.start(&level).unwrap(), 4);
    play(&mut quiz, &[true]);
    quiz.return_to_menu();

    assert_eq!(quiz.start(&level).unwrap(), 4);
}

/// Ten answers worth exactly 80: 10 + 12 + 14, reset, 10 + 12, reset, 10 + 12, reset.
const EIGHTY_IN_TEN: [bool; 10] = [true, true, true, false, true, true, false, true, true, false];

#[test]
fn test_pass_at_required_score() {
    let mut quiz = QuizController::seeded(11);

    quiz.start(&level(1, 10, 80)).unwrap();
    let (result, ticket) = completed(play(&mut quiz, &EIGHTY_IN_TEN));

    assert_eq!(result.final_score, 80);
    assert!(result.passed);
    assert_eq!(result.reward, RewardStatus::Pending);
    let ticket = ticket.unwrap();
    assert_eq!(ticket.level_id(), 1);
    assert_eq!(ticket.score(), 80);
    assert_eq!(ticket.clef(), Clef::Bass);
    assert_eq!(ticket.level_name(), "Test 1 (Test)");
    assert!(quiz.is_reward_pending());
    assert_eq!(quiz.phase(), Phase::Completed);
}

#[test]
fn test_fail_below_required_score() {
    let mut quiz = QuizController::seeded(11);

    quiz.start(&level(1, 10, 81)).unwrap();
    let (result, ticket) = completed(play(&mut quiz, &EIGHTY_IN_TEN));

    assert_eq!(result.final_score, 80);
    assert!(!result.passed);
    assert_eq!(result.reward, RewardStatus::NotEarned);
    assert_eq!(ticket, None);
    assert!(!quiz.is_reward_pending());
}

#[test]
fn test_short_level_passes_on_streak() {
    let mut quiz = QuizController::seeded(11);
    // 10 + 12 + 14 + 16 + 18, reset, 10
    let pattern = [true, true, true, true, true, false, true];

    quiz.start(&level(1, 7, 80)).unwrap();
    let (result, _) = completed(play(&mut quiz, &pattern));

    assert_eq!(result.final_score, 80);
    assert!(result.passed);
}

#[test]
fn test_final_answer_counts_toward_score() {
    let mut quiz = QuizController::seeded(3);
    quiz.start(&level(1, 1, 10)).unwrap();

    let (result, _) = completed(play(&mut quiz, &[true]));

    assert_eq!(result.final_score, 10);
    assert!(result.passed);
}

#[test]
fn test_reward_unlocks_doll() {
    let mut quiz = QuizController::seeded(3);
    let mut collection = Collection::new();
    quiz.start(&level(2, 1, 10)).unwrap();
    let (_, ticket) = completed(play(&mut quiz, &[true]));
    let ticket = ticket.unwrap();

    let reward = RewardData::new("Clef Wizard", "The bass clef is also called the F clef.");
    let doll = quiz.resolve_reward(&ticket, reward.clone(), &mut collection).unwrap();

    assert_eq!(doll.name, "Clef Wizard");
    assert_eq!(collection.len(), 1);
    assert!(!quiz.is_reward_pending());
    assert_eq!(
        quiz.result().unwrap().reward,
        RewardStatus::Unlocked {
            reward,
            doll_id: doll.id.clone()
        }
    );

    // A ticket is only honoured once.
    assert_eq!(quiz.resolve_reward(&ticket, RewardData::offline(), &mut collection), None);
    assert_eq!(collection.len(), 1);
}

#[test]
fn test_empty_reward_falls_back() {
    let mut quiz = QuizController::seeded(3);
    let mut collection = Collection::new();
    quiz.start(&level(2, 1, 10)).unwrap();
    let (_, ticket) = completed(play(&mut quiz, &[true]));

    let doll = quiz
        .resolve_reward(&ticket.unwrap(), RewardData::new("", ""), &mut collection)
        .unwrap();

    assert_eq!(doll.name, RewardData::fallback().nickname);
    assert_eq!(doll.description, RewardData::fallback().fun_fact);
}

#[test]
fn test_start_rejected_while_reward_pending() {
    let mut quiz = QuizController::seeded(3);
    let mut collection = Collection::new();
    let level = level(4, 1, 10);
    quiz.start(&level).unwrap();
    let (_, ticket) = completed(play(&mut quiz, &[true]));

    assert_eq!(quiz.start(&level), Err(QuizError::RewardPending { level_id: 4 }));
    assert_eq!(quiz.retry(), Err(QuizError::RewardPending { level_id: 4 }));

    quiz.resolve_reward(&ticket.unwrap(), RewardData::offline(), &mut collection);
    assert!(quiz.start(&level).is_ok());
}

#[test]
fn test_start_rejected_mid_session() {
    let mut quiz = QuizController::seeded(3);
    quiz.start(&level(5, 10, 80)).unwrap();

    assert_eq!(
        quiz.start(&level(6, 10, 80)),
        Err(QuizError::SessionInProgress { level_id: 5 })
    );

    answer(&mut quiz, true);
    assert_eq!(
        quiz.start(&level(6, 10, 80)),
        Err(QuizError::SessionInProgress { level_id: 5 })
    );
}

#[test]
fn test_unplayable_levels() {
    let mut quiz = QuizController::seeded(3);
    let mut inverted = level(7, 10, 80);
    inverted.notes_range = NoteRange::new(5, 2);
    let no_questions = level(8, 0, 0);

    assert!(matches!(
        quiz.start(&inverted),
        Err(QuizError::UnplayableLevel { level_id: 7, .. })
    ));
    assert!(matches!(
        quiz.start(&no_questions),
        Err(QuizError::UnplayableLevel { level_id: 8, .. })
    ));
    assert_eq!(quiz.phase(), Phase::Idle);
}

#[test]
fn test_advance_ticket_used_twice_is_stale() {
    let mut quiz = scripted(&[1, 2, 3]);
    quiz.start(&level(1, 10, 80)).unwrap();

    let submission = answer(&mut quiz, true);
    assert!(matches!(quiz.advance(submission.ticket), AdvanceOutcome::NextQuestion { .. }));
    assert_eq!(quiz.advance(submission.ticket), AdvanceOutcome::Stale);
    assert_eq!(quiz.session().unwrap().questions_answered, 1);
}

#[test]
fn test_advance_after_menu_is_stale() {
    let mut quiz = QuizController::seeded(9);
    let level = level(1, 10, 80);
    quiz.start(&level).unwrap();
    let submission = answer(&mut quiz, true);

    quiz.return_to_menu();
    assert_eq!(quiz.phase(), Phase::Idle);
    assert!(quiz.session().is_none());
    assert_eq!(quiz.advance(submission.ticket), AdvanceOutcome::Stale);

    // Same level, new session: the old ticket still must not advance it.
    quiz.start(&level).unwrap();
    answer(&mut quiz, false);
    assert_eq!(quiz.advance(submission.ticket), AdvanceOutcome::Stale);
    assert_eq!(quiz.session().unwrap().questions_answered, 0);
}

#[test]
fn test_menu_drops_pending_reward() {
    let mut quiz = QuizController::seeded(3);
    let mut collection = Collection::new();
    quiz.start(&level(2, 1, 10)).unwrap();
    let (_, ticket) = completed(play(&mut quiz, &[true]));
    let epoch = quiz.epoch();

    quiz.return_to_menu();

    assert!(quiz.epoch() > epoch);
    assert!(!quiz.is_reward_pending());
    assert!(quiz.result().is_none());
    assert_eq!(
        quiz.resolve_reward(&ticket.unwrap(), RewardData::offline(), &mut collection),
        None
    );
    assert!(collection.is_empty());
}

#[test]
fn test_retry_restarts_last_level() {
    let mut quiz = QuizController::seeded(8);
    assert_eq!(quiz.retry(), Err(QuizError::NothingToRetry));

    quiz.start(&level(3, 2, 100)).unwrap();
    let (result, _) = completed(play(&mut quiz, &[true, false]));
    assert!(!result.passed);

    quiz.retry().unwrap();
    let session = quiz.session().unwrap();
    assert_eq!(session.level.id, 3);
    assert_eq!(session.score, 0);
    assert_eq!(session.questions_answered, 0);
    assert!(quiz.result().is_none());
}

#[test]
fn test_builtin_level_full_run() {
    let catalog = LevelCatalog::load_builtin().unwrap();
    let level = catalog.require(12).unwrap();
    let mut quiz = QuizController::seeded(2024);

    quiz.start(level).unwrap();
    let pattern = vec![true; level.total_questions as usize];
    let (result, ticket) = completed(play(&mut quiz, &pattern));

    // 10 + 12 + ... + 38
    assert_eq!(result.final_score, 360);
    assert!(result.passed);
    assert_eq!(ticket.unwrap().clef(), Clef::Tenor);
}

#[test]
fn test_points_saturate() {
    assert_eq!(points_for(0), 10);
    assert_eq!(points_for(2), 14);
    assert_eq!(points_for(u32::MAX), u32::MAX);
}

#[test]
fn test_outcome_json_shape() {
    let next = serde_json::to_value(AdvanceOutcome::NextQuestion { note_index: -2 }).unwrap();
    assert_eq!(next, serde_json::json!({ "kind": "nextQuestion", "noteIndex": -2 }));

    let unlocked = RewardStatus::Unlocked {
        reward: RewardData::new("a", "b"),
        doll_id: "d1".to_string(),
    };
    assert_eq!(
        serde_json::to_value(unlocked).unwrap(),
        serde_json::json!({
            "status": "unlocked",
            "reward": { "nickname": "a", "funFact": "b" },
            "dollId": "d1"
        })
    );
}

#[test]
fn test_ticket_round_trips_through_json() {
    let mut quiz = scripted(&[1, 2]);
    quiz.start(&level(1, 10, 80)).unwrap();
    let submission = answer(&mut quiz, true);

    let json = serde_json::to_string(&submission.ticket).unwrap();
    let ticket: AdvanceTicket = serde_json::from_str(&json).unwrap();

    assert_eq!(quiz.advance(ticket), AdvanceOutcome::NextQuestion { note_index: 2 });
}
