//! Game settings and preferences
//!
//! Persisted separately from player stats in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::LOW_FPS_FRAME_MS;
use crate::platform::storage;

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Sound on/off (owned by the menu layer; the core plays nothing)
    pub sound_enabled: bool,
    /// Throttle the frame driver to a 30 FPS budget
    pub low_fps: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            low_fps: false,
        }
    }
}

impl GameSettings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "pd_settings";

    pub fn load() -> Self {
        match storage::load(Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        storage::save(Self::STORAGE_KEY, self);
        log::info!("Settings saved");
    }

    /// Minimum delta before the frame driver runs a tick/draw pair
    pub fn frame_budget_ms(&self) -> f64 {
        if self.low_fps { LOW_FPS_FRAME_MS } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GameSettings::default();
        assert!(settings.sound_enabled);
        assert!(!settings.low_fps);
        assert_eq!(settings.frame_budget_ms(), 0.0);
    }

    #[test]
    fn test_low_fps_budget() {
        let settings = GameSettings {
            low_fps: true,
            ..Default::default()
        };
        assert!((settings.frame_budget_ms() - 1000.0 / 30.0).abs() < 1e-9);
    }
}
