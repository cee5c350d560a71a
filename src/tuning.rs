//! Data-driven game balance
//!
//! Difficulty tiers and their tunable profiles. The tiers are fixed for the
//! length of a session; nothing in the simulation ramps them over time
//! (only score accrual accelerates with survival).

use serde::{Deserialize, Serialize};

/// Quest completions required before [`Difficulty::Void`] unlocks.
pub const VOID_UNLOCK_QUESTS: u32 = 15;

/// Difficulty tiers, ordered by increasing challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Insane,
    Impossible,
    Void,
}

/// Tunable parameter set selected at session start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Milliseconds of (slow-mo-scaled) time between spike spawns
    pub spawn_interval_ms: f32,
    /// Base fall speed for spikes (units per tick)
    pub spike_speed: f32,
    /// Score accrual multiplier
    pub score_multiplier: f32,
    /// Tier accent color (also used for the player body)
    pub color: [f32; 4],
}

static PROFILES: [DifficultyProfile; 6] = [
    DifficultyProfile {
        spawn_interval_ms: 1500.0,
        spike_speed: 2.0,
        score_multiplier: 1.0,
        color: [0.290, 0.871, 0.502, 1.0],
    },
    DifficultyProfile {
        spawn_interval_ms: 1000.0,
        spike_speed: 3.5,
        score_multiplier: 2.0,
        color: [0.376, 0.647, 0.980, 1.0],
    },
    DifficultyProfile {
        spawn_interval_ms: 600.0,
        spike_speed: 5.0,
        score_multiplier: 4.0,
        color: [0.984, 0.749, 0.141, 1.0],
    },
    DifficultyProfile {
        spawn_interval_ms: 350.0,
        spike_speed: 7.0,
        score_multiplier: 8.0,
        color: [0.973, 0.443, 0.443, 1.0],
    },
    DifficultyProfile {
        spawn_interval_ms: 200.0,
        spike_speed: 9.5,
        score_multiplier: 15.0,
        color: [0.655, 0.545, 0.980, 1.0],
    },
    DifficultyProfile {
        spawn_interval_ms: 120.0,
        spike_speed: 12.0,
        score_multiplier: 50.0,
        color: [0.957, 0.447, 0.714, 1.0],
    },
];

impl Difficulty {
    /// All tiers in ascending challenge order
    pub const ALL: [Difficulty; 6] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Insane,
        Difficulty::Impossible,
        Difficulty::Void,
    ];

    /// The tier's tunable profile
    pub fn profile(self) -> &'static DifficultyProfile {
        &PROFILES[self as usize]
    }

    /// Parse a menu-supplied tier name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "insane" => Some(Difficulty::Insane),
            "impossible" => Some(Difficulty::Impossible),
            "void" | "ultravoid" => Some(Difficulty::Void),
            _ => None,
        }
    }

    /// HUD label
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
            Difficulty::Insane => "INSANE",
            Difficulty::Impossible => "IMPOSSIBLE",
            Difficulty::Void => "ULTRAVOID",
        }
    }

    /// Whether the tier is selectable given the player's lifetime quest
    /// count. Only the highest tier is gated; the gate lives here so the
    /// menu layer can query it without the engine knowing about quests.
    pub fn unlocked(self, total_quests_completed: u32) -> bool {
        match self {
            Difficulty::Void => total_quests_completed >= VOID_UNLOCK_QUESTS,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_ordered_by_challenge() {
        for pair in Difficulty::ALL.windows(2) {
            let (a, b) = (pair[0].profile(), pair[1].profile());
            assert!(a.spawn_interval_ms > b.spawn_interval_ms);
            assert!(a.spike_speed < b.spike_speed);
            assert!(a.score_multiplier < b.score_multiplier);
        }
    }

    #[test]
    fn test_void_gated_behind_quest_count() {
        assert!(!Difficulty::Void.unlocked(0));
        assert!(!Difficulty::Void.unlocked(VOID_UNLOCK_QUESTS - 1));
        assert!(Difficulty::Void.unlocked(VOID_UNLOCK_QUESTS));
        assert!(Difficulty::Easy.unlocked(0));
        assert!(Difficulty::Impossible.unlocked(0));
    }
}
