//! Integration tests for clef-quest
//!
//! Exercises the public API end to end: catalog, resolver, renderer and a
//! complete quiz run through the collection.

use clef_quest::quiz::{AdvanceOutcome, Phase, QuizController, RewardStatus};
use clef_quest::{
    render_note, resolve_note, Clef, Collection, LevelCatalog, NoteName, RewardData,
    StemDirection,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(Clef::Treble, 0, -2, vec![-2], StemDirection::Up)]
#[case(Clef::Treble, 1, -1, vec![], StemDirection::Up)]
#[case(Clef::Treble, -1, -3, vec![-2], StemDirection::Up)]
#[case(Clef::Treble, 11, 9, vec![], StemDirection::Down)]
#[case(Clef::Treble, 12, 10, vec![10], StemDirection::Down)]
#[case(Clef::Bass, 0, 3, vec![], StemDirection::Up)]
#[case(Clef::Bass, -7, -4, vec![-2, -4], StemDirection::Up)]
#[case(Clef::Alto, 0, 4, vec![], StemDirection::Down)]
#[case(Clef::Tenor, 0, 6, vec![], StemDirection::Down)]
#[case(Clef::Tenor, -9, -3, vec![-2], StemDirection::Up)]
fn test_resolver_table(
    #[case] clef: Clef,
    #[case] index: i32,
    #[case] steps: i32,
    #[case] ledger_lines: Vec<i32>,
    #[case] stem: StemDirection,
) {
    let position = resolve_note(clef, index);
    assert_eq!(position.steps, steps);
    assert_eq!(position.ledger_lines, ledger_lines);
    assert_eq!(position.stem, stem);
}

#[test]
fn test_every_catalog_note_renders() {
    let catalog = LevelCatalog::load_builtin().unwrap();
    for level in catalog.levels() {
        for index in level.notes_range.min..=level.notes_range.max {
            let svg = render_note(level.clef, index);
            assert!(svg.starts_with("<svg"), "level {} index {index}", level.id);
            assert!(svg.contains("<ellipse"));
        }
    }
}

#[test]
fn test_menu_tabs() {
    let catalog = LevelCatalog::load_builtin().unwrap();
    for clef in Clef::ALL {
        let levels: Vec<_> = catalog.for_clef(clef).collect();
        assert_eq!(levels.len(), 3, "{clef}");
        assert!(levels.iter().all(|l| !l.short_name().contains('(')));
    }
}

#[test]
fn test_complete_run_unlocks_doll_with_fallback() {
    let catalog = LevelCatalog::load_builtin().unwrap();
    let level = catalog.require(5).unwrap();
    let mut quiz = QuizController::seeded(17);
    let mut collection = Collection::new();

    quiz.start(level).unwrap();
    let outcome = loop {
        let session = quiz.session().unwrap();
        let position = resolve_note(session.level.clef, session.note_index);
        assert_eq!(position, resolve_note(Clef::Bass, session.note_index));

        let answer = NoteName::from_index(session.note_index);
        let submission = quiz.submit_answer(answer).unwrap();
        match quiz.advance(submission.ticket) {
            AdvanceOutcome::NextQuestion { .. } => continue,
            other => break other,
        }
    };

    let AdvanceOutcome::Completed {
        result,
        reward_ticket: Some(ticket),
    } = outcome
    else {
        panic!("level should pass with all answers correct");
    };
    assert!(result.passed);
    assert_eq!(quiz.phase(), Phase::Completed);

    // The generator produced nothing usable.
    let doll = quiz
        .resolve_reward(&ticket, RewardData::new("", "   "), &mut collection)
        .unwrap();
    assert_eq!(doll.name, RewardData::fallback().nickname);
    assert_eq!(collection.newest().map(|d| d.id.as_str()), Some(doll.id.as_str()));
    assert!(matches!(
        quiz.result().unwrap().reward,
        RewardStatus::Unlocked { .. }
    ));
}

#[test]
fn test_session_json_shape() {
    let catalog = LevelCatalog::load_builtin().unwrap();
    let mut quiz = QuizController::seeded(3);
    quiz.start(catalog.require(1).unwrap()).unwrap();

    let json = serde_json::to_value(quiz.session().unwrap()).unwrap();
    assert_eq!(json["level"]["clef"], "TREBLE");
    assert_eq!(json["level"]["notesRange"]["min"], 0);
    assert_eq!(json["questionsAnswered"], 0);
    assert_eq!(json["feedback"], serde_json::Value::Null);
}
