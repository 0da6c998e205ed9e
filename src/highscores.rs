//! Per-game high score records
//!
//! One decimal integer per game, persisted under `retro_hs_<game_id>`.

use crate::storage::{KeyValueStore, set_best_effort};

/// Storage key prefix for per-game high scores
pub const KEY_PREFIX: &str = "retro_hs_";

/// Storage key for a game's high score
pub fn storage_key(game_id: &str) -> String {
    format!("{}{}", KEY_PREFIX, game_id)
}

/// The best score achieved in one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScore {
    pub game_id: String,
    pub score: u64,
}

impl HighScore {
    /// Load a game's high score. Missing or unparseable values read as 0.
    pub fn load(store: &dyn KeyValueStore, game_id: &str) -> Self {
        let score = store
            .get(&storage_key(game_id))
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0);
        Self {
            game_id: game_id.to_string(),
            score,
        }
    }

    /// Check if a score beats the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.score
    }

    /// Record a score, writing through to storage when it beats the record.
    /// Returns true if the record changed.
    pub fn record(&mut self, store: &dyn KeyValueStore, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.score = score;
        set_best_effort(store, &storage_key(&self.game_id), &score.to_string());
        true
    }
}

/// Sum of the stored high scores for the given games
pub fn total<'a>(store: &dyn KeyValueStore, game_ids: impl IntoIterator<Item = &'a str>) -> u64 {
    game_ids
        .into_iter()
        .map(|id| HighScore::load(store, id).score)
        .sum()
}
