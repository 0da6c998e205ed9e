//! Unlock progress across the registry
//!
//! Stored as a JSON object under `retro_progress`, keyed by game id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::ALWAYS_UNLOCKED;
use crate::storage::{KeyValueStore, set_best_effort};

/// Progress for a single game
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProgress {
    #[serde(default)]
    pub unlocked: bool,
}

/// Unlock map for the whole arcade
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress {
    pub games: BTreeMap<String, GameProgress>,
}

impl Progress {
    const STORAGE_KEY: &'static str = "retro_progress";

    /// Load progress; missing or corrupt JSON reads as empty
    pub fn load(store: &dyn KeyValueStore) -> Self {
        store
            .get(Self::STORAGE_KEY)
            .and_then(|json| match serde_json::from_str(&json) {
                Ok(progress) => Some(progress),
                Err(e) => {
                    log::warn!("Discarding unreadable progress: {}", e);
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Save progress (best-effort)
    pub fn save(&self, store: &dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => set_best_effort(store, Self::STORAGE_KEY, &json),
            Err(e) => log::warn!("Failed to encode progress: {}", e),
        }
    }

    /// Whether the game at `index` in the registry can be played
    pub fn is_unlocked(&self, game_id: &str, index: usize) -> bool {
        index < ALWAYS_UNLOCKED || self.games.get(game_id).is_some_and(|g| g.unlocked)
    }

    /// Mark a game unlocked. Returns true if it was previously locked.
    pub fn unlock(&mut self, game_id: &str) -> bool {
        let entry = self.games.entry(game_id.to_string()).or_default();
        let changed = !entry.unlocked;
        entry.unlocked = true;
        if changed {
            log::info!("Unlocked {}", game_id);
        }
        changed
    }

    /// Number of unlocked games among the given registry ids
    pub fn unlocked_count<'a>(&self, game_ids: impl IntoIterator<Item = &'a str>) -> usize {
        game_ids
            .into_iter()
            .enumerate()
            .filter(|(i, id)| self.is_unlocked(id, *i))
            .count()
    }
}
