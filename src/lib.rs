//! Pixel Dodge - a falling-hazard dodging arcade game
//!
//! Core modules:
//! - `sim`: Variable-timestep simulation (player, spikes, power-ups, scoring)
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance (difficulty tiers)
//! - `quests`: Hourly quest batch with offline fallback
//! - `platform`: Browser/native storage and clock abstraction

pub mod platform;
pub mod quests;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stats;
pub mod tuning;

pub use settings::GameSettings;
pub use stats::PlayerStats;
pub use tuning::{Difficulty, DifficultyProfile};

/// Game configuration constants
pub mod consts {
    /// Logical play-field dimensions
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player bounding box (square)
    pub const PLAYER_SIZE: f32 = 24.0;
    /// Horizontal margin the player cannot cross on either side
    pub const PLAYER_MARGIN: f32 = 10.0;
    /// Fixed player altitude
    pub const PLAYER_Y: f32 = CANVAS_HEIGHT - 70.0;
    /// Horizontal speed while a direction is held (units per tick)
    pub const PLAYER_SPEED: f32 = 6.0;
    /// Velocity fraction retained per tick once input is released
    pub const RELEASE_DAMPING: f32 = 0.8;
    /// Eye-mark offset while moving (facing cue)
    pub const EYE_OFFSET: f32 = 4.0;

    /// Spike dimensions and spawn parameters
    pub const SPIKE_MIN_WIDTH: f32 = 22.0;
    pub const SPIKE_MAX_WIDTH: f32 = 42.0;
    pub const SPIKE_HEIGHT: f32 = 40.0;
    pub const SPIKE_SPAWN_Y: f32 = -60.0;
    /// Random speed added on top of the tier base speed
    pub const SPIKE_SPEED_JITTER: f32 = 2.0;

    /// Power-up size and cadence
    pub const POWER_UP_SIZE: f32 = 24.0;
    pub const POWER_UP_SPAWN_Y: f32 = -50.0;
    /// Spawn interval, accumulated from RAW delta (not slow-mo scaled)
    pub const POWER_UP_INTERVAL_MS: f32 = 9000.0;
    /// Fall speed (units per tick, slow-mo scaled)
    pub const POWER_UP_FALL_SPEED: f32 = 2.5;

    /// Slow-motion window
    pub const SLOW_MO_DURATION_MS: f32 = 5000.0;
    pub const SLOW_MO_FACTOR: f32 = 0.35;

    /// Screen shake magnitude set by a bomb pickup
    pub const BOMB_SHAKE: f32 = 6.0;

    /// Frame budget when the low-FPS setting is on
    pub const LOW_FPS_FRAME_MS: f64 = 1000.0 / 30.0;
}
