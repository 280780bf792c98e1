use wasm_bindgen::prelude::*;
use serde::Serialize;
use std::fmt::Display;

use clef_quest::collection::Collection;
use clef_quest::quiz::{AdvanceTicket, LevelResult, Phase, QuizController, RewardTicket, SessionState};
use clef_quest::{Clef, LevelCatalog, NoteName, NotePosition, RewardData};

#[derive(Serialize)]
struct WasmError {
    message: String,
}

fn js_error(e: impl Display) -> JsValue {
    let error = WasmError {
        message: e.to_string(),
    };
    let json = serde_json::to_string(&error).unwrap_or_else(|_| format!("{{\"message\":{:?}}}", error.message));
    JsValue::from_str(&json)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

fn parse_clef(clef: &str) -> Result<Clef, JsValue> {
    clef.parse().map_err(js_error)
}

/// Note geometry for `index` under `clef` as JSON (`steps`, `ledgerLines`, `stem`)
#[wasm_bindgen]
pub fn resolve_note(clef: &str, index: i32) -> Result<String, JsValue> {
    to_json(&clef_quest::resolve_note(parse_clef(clef)?, index))
}

/// SVG markup of a staff showing one note
#[wasm_bindgen]
pub fn render_staff(clef: &str, index: i32) -> Result<String, JsValue> {
    Ok(clef_quest::render_note(parse_clef(clef)?, index))
}

#[wasm_bindgen]
pub fn note_name(index: i32) -> String {
    clef_quest::name(index).to_string()
}

/// The built-in levels as a JSON array
#[wasm_bindgen]
pub fn level_catalog() -> Result<String, JsValue> {
    let catalog = LevelCatalog::load_builtin().map_err(js_error)?;
    to_json(catalog.levels())
}

/// One of the two fixed rewards, for hosts that cannot reach the generator
#[wasm_bindgen]
pub fn fallback_reward(offline: bool) -> Result<String, JsValue> {
    let reward = if offline {
        RewardData::offline()
    } else {
        RewardData::fallback()
    };
    to_json(&reward)
}

/// Snapshot of everything the page needs to draw the quiz screen.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuizView<'a> {
    phase: Phase,
    session: Option<&'a SessionState>,
    /// Geometry of the live question.
    position: Option<NotePosition>,
    result: Option<&'a LevelResult>,
    reward_pending: bool,
}

/// Host-provided reward JSON; anything unusable becomes the fallback reward.
fn parse_reward(reward_json: &str) -> RewardData {
    serde_json::from_str::<RewardData>(reward_json)
        .map(RewardData::or_fallback)
        .unwrap_or_else(|_| RewardData::fallback())
}

/// Quiz controller plus doll collection for one browser tab.
///
/// The host page owns time and network: after `submit` it waits its
/// feedback delay and hands the ticket to `advance`; when a level is passed
/// it fetches the reward and hands it to `resolve_reward` with the reward
/// ticket.
#[wasm_bindgen]
pub struct WasmQuiz {
    quiz: QuizController,
    catalog: LevelCatalog,
    collection: Collection,
}

#[wasm_bindgen]
impl WasmQuiz {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> Result<WasmQuiz, JsValue> {
        Ok(WasmQuiz {
            quiz: QuizController::seeded(u64::from(seed)),
            catalog: LevelCatalog::load_builtin().map_err(js_error)?,
            collection: Collection::new(),
        })
    }

    /// Start a level and return the quiz view.
    pub fn start(&mut self, level_id: u32) -> Result<String, JsValue> {
        let level = self.catalog.require(level_id).map_err(js_error)?;
        self.quiz.start(level).map_err(js_error)?;
        self.state()
    }

    pub fn retry(&mut self) -> Result<String, JsValue> {
        self.quiz.retry().map_err(js_error)?;
        self.state()
    }

    /// Submit a letter; returns the submission (with its advance ticket) or `null`.
    pub fn submit(&mut self, letter: &str) -> Result<String, JsValue> {
        let answer: NoteName = letter.parse().map_err(js_error)?;
        to_json(&self.quiz.submit_answer(answer))
    }

    /// Redeem an advance ticket once the feedback has been shown.
    pub fn advance(&mut self, ticket_json: &str) -> Result<String, JsValue> {
        let ticket: AdvanceTicket = serde_json::from_str(ticket_json).map_err(js_error)?;
        to_json(&self.quiz.advance(ticket))
    }

    /// The outstanding reward ticket, or `null`.
    pub fn pending_reward(&self) -> Result<String, JsValue> {
        to_json(&self.quiz.pending_reward())
    }

    /// Deliver reward content for a ticket; returns the unlocked doll or `null`.
    pub fn resolve_reward(&mut self, ticket_json: &str, reward_json: &str) -> Result<String, JsValue> {
        let ticket: RewardTicket = serde_json::from_str(ticket_json).map_err(js_error)?;
        let reward = parse_reward(reward_json);
        to_json(&self.quiz.resolve_reward(&ticket, reward, &mut self.collection))
    }

    pub fn return_to_menu(&mut self) {
        self.quiz.return_to_menu();
    }

    pub fn state(&self) -> Result<String, JsValue> {
        to_json(&self.view())
    }

    /// Collected dolls, newest first
    pub fn collection(&self) -> Result<String, JsValue> {
        to_json(self.collection.dolls())
    }

    /// Store the result of a magic edit. Returns `false` for an unknown doll.
    pub fn set_doll_image(&mut self, doll_id: &str, image_url: &str) -> bool {
        self.collection.set_image(doll_id, image_url.to_string())
    }
}

impl WasmQuiz {
    fn view(&self) -> QuizView<'_> {
        let session = self.quiz.session();
        let position = session
            .filter(|_| self.quiz.phase() != Phase::Completed)
            .map(|s| clef_quest::resolve_note(s.level.clef, s.note_index));
        QuizView {
            phase: self.quiz.phase(),
            session,
            position,
            result: self.quiz.result(),
            reward_pending: self.quiz.is_reward_pending(),
        }
    }
}
