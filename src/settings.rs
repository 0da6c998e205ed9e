//! Global player preferences
//!
//! Persisted separately from scores. The mute flag keeps its historical
//! `"true"`/`"false"` encoding so existing browsers keep their choice.

use crate::storage::{KeyValueStore, set_best_effort};

/// Player preferences shared by every game
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// All sound effects silenced
    pub muted: bool,
    /// Effect volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            volume: 1.0,
        }
    }
}

impl Settings {
    const MUTED_KEY: &'static str = "retro_muted";
    const VOLUME_KEY: &'static str = "retro_volume";

    /// Load settings, falling back to defaults per field
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        let muted = store
            .get(Self::MUTED_KEY)
            .map(|v| v == "true")
            .unwrap_or(defaults.muted);
        let volume = store
            .get(Self::VOLUME_KEY)
            .and_then(|v| v.parse::<f32>().ok())
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(defaults.volume);
        log::info!("Loaded settings (muted: {}, volume: {:.2})", muted, volume);
        Self { muted, volume }
    }

    /// Save settings (best-effort)
    pub fn save(&self, store: &dyn KeyValueStore) {
        set_best_effort(store, Self::MUTED_KEY, if self.muted { "true" } else { "false" });
        set_best_effort(store, Self::VOLUME_KEY, &format!("{:.2}", self.volume));
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_when_empty() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_mute_flag_encoding() {
        let store = MemoryStore::new();
        store.set("retro_muted", "true").unwrap();
        assert!(Settings::load(&store).muted);

        let settings = Settings {
            muted: false,
            volume: 0.5,
        };
        settings.save(&store);
        assert_eq!(store.get("retro_muted").as_deref(), Some("false"));
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_volume_clamped() {
        let store = MemoryStore::new();
        store.set("retro_volume", "3.5").unwrap();
        assert_eq!(Settings::load(&store).volume, 1.0);

        let mut settings = Settings::default();
        settings.set_volume(-1.0);
        assert_eq!(settings.volume, 0.0);
    }
}
