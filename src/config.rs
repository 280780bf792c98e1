//! # Configuration
//!
//! Layered configuration loading using figment.
//!
//! Sources, highest priority first:
//! 1. `CLEF_QUEST_*` environment variables, `__` separating sections
//!    (`CLEF_QUEST_GEMINI__API_KEY` → `gemini.api_key`)
//! 2. `GEMINI_API_KEY`, accepted as a shorthand for the API key
//! 3. `clef-quest.toml` in the working directory
//! 4. Built-in defaults
//!
//! An empty API key is a valid configuration: the game then runs with its
//! offline reward content.
//!
//! ## Example
//! ```rust
//! use clef_quest::QuestConfig;
//!
//! let config = QuestConfig::default();
//! assert!(!config.gemini.is_configured());
//! assert_eq!(config.game.feedback_delay_ms, 1000);
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::QuestError;

pub const CONFIG_FILE: &str = "clef-quest.toml";
pub const ENV_PREFIX: &str = "CLEF_QUEST_";

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    20
}

const fn default_feedback_delay_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub game: GameConfig,
}

/// Settings for the Gemini reward and image collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeminiConfig {
    #[serde(default)]
    pub api_key: String,

    /// Text model used for reward generation.
    #[serde(default = "default_model")]
    pub model: String,

    /// Model used for doll image edits.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            image_model: default_image_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeminiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameConfig {
    /// How long answer feedback stays on screen before the next question.
    #[serde(default = "default_feedback_delay_ms")]
    pub feedback_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            feedback_delay_ms: default_feedback_delay_ms(),
        }
    }
}

impl GameConfig {
    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}

impl QuestConfig {
    /// Load configuration from the config file and the environment.
    ///
    /// Does not read `.env`; see [`load_with_dotenv`](Self::load_with_dotenv).
    pub fn load() -> Result<Self, QuestError> {
        Ok(Self::figment().extract()?)
    }

    /// Load `.env` from the working directory (if present), then [`load`](Self::load).
    pub fn load_with_dotenv() -> Result<Self, QuestError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(%err, "ignoring unreadable .env file");
            }
        }
        Self::load()
    }

    /// The provider chain, exposed so callers can merge extra providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let local_path = PathBuf::from(CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
            .merge(Env::raw().only(&["GEMINI_API_KEY"]).map(|_| "gemini.api_key".into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
