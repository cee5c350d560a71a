//! Game state and entity types
//!
//! Everything a session mutates lives here. `GameState::new` is the only
//! reset path; entities are plain structs owned by `Vec`s on the state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Aabb;
use crate::consts::*;
use crate::tuning::{Difficulty, DifficultyProfile};

/// The player square. Never destroyed; reset only by a new session.
#[derive(Debug, Clone)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal velocity (units per tick)
    pub vel_x: f32,
    /// Squash/stretch factor derived from |vel_x|, cosmetic only
    pub squash: f32,
    /// Eye-mark offset, damped toward zero like velocity
    pub eye_dir: f32,
}

impl Player {
    fn new() -> Self {
        Self {
            x: CANVAS_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
            y: PLAYER_Y,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            vel_x: 0.0,
            squash: 1.0,
            eye_dir: 0.0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

/// A falling hazard
#[derive(Debug, Clone)]
pub struct Spike {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Fall speed (units per tick), fixed at spawn
    pub speed: f32,
    /// Decorative tilt assigned at spawn; not part of collision
    pub rotation: f32,
}

impl Spike {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

/// Power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Scales all motion by [`SLOW_MO_FACTOR`] for a fixed window
    Slow,
    /// Clears every spike on pickup
    Bomb,
}

/// A falling collectible
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PowerUpKind,
    /// Phase for the pulsing render effect
    pub pulse: f32,
}

impl PowerUp {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

/// A burst particle. Visual only; never collides.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, decays to 0; doubles as render alpha
    pub life: f32,
    pub size: f32,
    /// Color tag: the pickup kind that spawned the burst
    pub kind: PowerUpKind,
}

/// Per-tick snapshot returned to the frame driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickResult {
    pub running: bool,
    /// Floored score
    pub score: u64,
    pub survival_secs: f32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub difficulty: Difficulty,
    pub profile: &'static DifficultyProfile,
    pub player: Player,
    pub spikes: Vec<Spike>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    /// Accumulates slow-mo-scaled delta toward the spawn interval
    pub spawn_timer_ms: f32,
    /// Accumulates raw delta toward [`POWER_UP_INTERVAL_MS`]
    pub power_up_timer_ms: f32,
    /// Remaining slow-motion window; speed factor is 0.35 while positive
    pub slow_mo_ms: f32,
    /// Shake magnitude, decays linearly toward zero
    pub screen_shake: f32,
    /// Fractional score accumulator; consumers floor it
    pub score: f64,
    pub survival_secs: f64,
    pub running: bool,
    /// Score/survival frozen at the collision tick
    pub final_score: u64,
    pub final_survival_secs: u32,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Start a fresh session: empty entity lists, zeroed timers and score.
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            difficulty,
            profile: difficulty.profile(),
            player: Player::new(),
            spikes: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            spawn_timer_ms: 0.0,
            power_up_timer_ms: 0.0,
            slow_mo_ms: 0.0,
            screen_shake: 0.0,
            score: 0.0,
            survival_secs: 0.0,
            running: true,
            final_score: 0,
            final_survival_secs: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Global motion scale: 0.35 during an active slow-motion window
    pub fn speed_factor(&self) -> f32 {
        if self.slow_mo_ms > 0.0 {
            SLOW_MO_FACTOR
        } else {
            1.0
        }
    }

    /// The snapshot for the current tick (frozen once `running` is false)
    pub fn result(&self) -> TickResult {
        if self.running {
            TickResult {
                running: true,
                score: self.score as u64,
                survival_secs: self.survival_secs as f32,
            }
        } else {
            TickResult {
                running: false,
                score: self.final_score,
                survival_secs: self.final_survival_secs as f32,
            }
        }
    }

    pub(crate) fn spawn_spike(&mut self) {
        let width = self.rng.random_range(SPIKE_MIN_WIDTH..SPIKE_MAX_WIDTH);
        let spike = Spike {
            x: self.rng.random_range(0.0..CANVAS_WIDTH - width),
            y: SPIKE_SPAWN_Y,
            width,
            height: SPIKE_HEIGHT,
            speed: self.profile.spike_speed + self.rng.random_range(0.0..SPIKE_SPEED_JITTER),
            rotation: self.rng.random_range(-0.1..0.1),
        };
        self.spikes.push(spike);
    }

    pub(crate) fn spawn_power_up(&mut self) {
        let kind = if self.rng.random::<bool>() {
            PowerUpKind::Slow
        } else {
            PowerUpKind::Bomb
        };
        self.power_ups.push(PowerUp {
            x: self.rng.random_range(30.0..CANVAS_WIDTH - 30.0),
            y: POWER_UP_SPAWN_Y,
            width: POWER_UP_SIZE,
            height: POWER_UP_SIZE,
            kind,
            pulse: 0.0,
        });
    }

    /// Burst of `count` particles centered on a pickup
    pub(crate) fn spawn_particles(&mut self, x: f32, y: f32, kind: PowerUpKind, count: usize) {
        for _ in 0..count {
            let vel = Vec2::new(
                self.rng.random_range(-4.0..4.0),
                self.rng.random_range(-4.0..4.0),
            );
            self.particles.push(Particle {
                pos: Vec2::new(x, y),
                vel,
                life: 1.0,
                size: self.rng.random_range(4.0..10.0),
                kind,
            });
        }
    }
}
