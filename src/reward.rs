//! Reward content for a passed level and the collaborator that produces it.
//!
//! A reward request never fails from the caller's point of view. Providers
//! substitute one of two fixed rewards instead:
//! - [`RewardData::offline`] when no credentials are configured
//! - [`RewardData::fallback`] when the remote call or its payload is unusable

use serde::{Deserialize, Serialize};

use crate::clef::Clef;

/// Nickname and fun fact shown on the level-complete screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardData {
    pub nickname: String,
    pub fun_fact: String,
}

impl RewardData {
    pub fn new(nickname: impl Into<String>, fun_fact: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            fun_fact: fun_fact.into(),
        }
    }

    /// Reward used when the generator has no credentials.
    pub fn offline() -> Self {
        Self::new(
            "小小音樂家",
            "你知道嗎？五線譜最早起源於中世紀的紐姆記譜法喔！",
        )
    }

    /// Reward used when the generator fails or answers with nothing usable.
    pub fn fallback() -> Self {
        Self::new(
            "超級音樂學徒",
            "熟能生巧！每天練習五線譜，看譜速度會越來越快喔！",
        )
    }

    /// Both fields carry visible text.
    pub fn is_complete(&self) -> bool {
        !self.nickname.trim().is_empty() && !self.fun_fact.trim().is_empty()
    }

    /// `self` if complete, otherwise the fallback reward.
    pub fn or_fallback(self) -> Self {
        if self.is_complete() {
            self
        } else {
            Self::fallback()
        }
    }
}

/// Produces the reward for a passed level.
///
/// Implementations handle their own failures and always return displayable
/// content.
#[allow(async_fn_in_trait)]
pub trait RewardProvider {
    async fn request_reward(&self, clef: Clef, score: u32, level_name: &str) -> RewardData;
}

/// Provider for setups without a generator; always answers with the offline reward.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRewards;

impl RewardProvider for OfflineRewards {
    async fn request_reward(&self, _clef: Clef, _score: u32, _level_name: &str) -> RewardData {
        RewardData::offline()
    }
}
