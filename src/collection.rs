//! The player's collection of unlocked dolls.
//!
//! Append-only and newest first. The only mutation after unlocking is
//! swapping a doll's image reference after a successful image edit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reward::RewardData;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doll {
    pub id: String,
    pub name: String,
    pub description: String,
    /// URL or `data:` URL of the doll's picture.
    pub image_url: String,
    pub date_unlocked: DateTime<Utc>,
}

/// Placeholder picture for a new doll, seeded so each unlock looks different.
pub fn placeholder_image_url(seed: i64) -> String {
    format!("https://picsum.photos/seed/{seed}/400/400")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Collection {
    dolls: Vec<Doll>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlock a doll for `reward`, timestamped now.
    pub fn unlock(&mut self, reward: &RewardData) -> &Doll {
        self.unlock_at(reward, Utc::now())
    }

    pub fn unlock_at(&mut self, reward: &RewardData, unlocked_at: DateTime<Utc>) -> &Doll {
        let doll = Doll {
            id: Uuid::new_v4().to_string(),
            name: reward.nickname.clone(),
            description: reward.fun_fact.clone(),
            image_url: placeholder_image_url(unlocked_at.timestamp_millis()),
            date_unlocked: unlocked_at,
        };
        tracing::info!(doll = %doll.id, name = %doll.name, "doll unlocked");
        self.dolls.insert(0, doll);
        &self.dolls[0]
    }

    /// All dolls, newest first.
    pub fn dolls(&self) -> &[Doll] {
        &self.dolls
    }

    pub fn get(&self, id: &str) -> Option<&Doll> {
        self.dolls.iter().find(|doll| doll.id == id)
    }

    pub fn newest(&self) -> Option<&Doll> {
        self.dolls.first()
    }

    pub fn len(&self) -> usize {
        self.dolls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dolls.is_empty()
    }

    /// Replace a doll's image reference. Returns `false` for an unknown id.
    pub fn set_image(&mut self, id: &str, image_url: String) -> bool {
        match self.dolls.iter_mut().find(|doll| doll.id == id) {
            Some(doll) => {
                doll.image_url = image_url;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unlock_prepends() {
        let mut collection = Collection::new();
        assert!(collection.is_empty());
        let first = collection.unlock(&RewardData::new("First", "fact one")).id.clone();
        let second = collection.unlock(&RewardData::new("Second", "fact two")).id.clone();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.dolls()[0].id, second);
        assert_eq!(collection.dolls()[1].id, first);
        assert_eq!(collection.newest().map(|d| d.name.as_str()), Some("Second"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_doll_copies_reward_and_timestamp() {
        let mut collection = Collection::new();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let doll = collection.unlock_at(&RewardData::offline(), at).clone();
        assert_eq!(doll.name, RewardData::offline().nickname);
        assert_eq!(doll.description, RewardData::offline().fun_fact);
        assert_eq!(doll.date_unlocked, at);
        assert_eq!(doll.image_url, placeholder_image_url(at.timestamp_millis()));
    }

    #[test]
    fn test_set_image() {
        let mut collection = Collection::new();
        let id = collection.unlock(&RewardData::fallback()).id.clone();
        assert!(collection.set_image(&id, "data:image/png;base64,AAAA".to_string()));
        assert_eq!(collection.get(&id).unwrap().image_url, "data:image/png;base64,AAAA");
        assert!(!collection.set_image("missing", "x".to_string()));
    }
}
