//! Lifetime player stats
//!
//! Persisted to LocalStorage. The quest layer bumps the completion count;
//! the menu layer reads it to gate the highest difficulty tier.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Stats carried across sessions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub total_quests_completed: u32,
    pub high_score: u64,
}

impl PlayerStats {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "pd_stats";

    pub fn load() -> Self {
        match storage::load(Self::STORAGE_KEY) {
            Some(stats) => {
                log::info!("Loaded player stats");
                stats
            }
            None => {
                log::info!("No player stats found, starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        storage::save(Self::STORAGE_KEY, self);
        log::info!(
            "Player stats saved (high score {}, {} quests)",
            self.high_score,
            self.total_quests_completed
        );
    }

    /// Record a finished game's score. Returns true on a new high score.
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            return true;
        }
        false
    }
}
