//! Variable-timestep simulation tick
//!
//! The whole per-frame algorithm. Deltas are wall-clock milliseconds from
//! the frame driver, not a fixed step: per-tick integration (positions)
//! rides the frame rate while timers ride the delta, which is the shipped
//! tuning and must not be converted to a fixed step.

use super::state::{GameState, PowerUpKind, TickResult};
use crate::consts::*;

/// Level-triggered input state, sampled by the driver at tick time.
///
/// This is a snapshot of a pressed-key map, not an event queue; there is no
/// "pressed this frame" edge detection. Pause is handled out-of-band by the
/// frame driver and never reaches the tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
}

/// Advance the session by `delta_ms` of wall-clock time.
///
/// Non-positive deltas are a no-op, and once the engine has stopped every
/// call returns the frozen result without touching state.
pub fn tick(state: &mut GameState, input: &InputSnapshot, delta_ms: f32) -> TickResult {
    if !state.running || delta_ms <= 0.0 {
        return state.result();
    }

    if state.screen_shake > 0.0 {
        state.screen_shake = (state.screen_shake - delta_ms * 0.01).max(0.0);
    }

    // Speed factor is read before the timer decays, so a window expiring
    // mid-tick still slows this tick's motion.
    let speed_factor = state.speed_factor();
    if state.slow_mo_ms > 0.0 {
        state.slow_mo_ms -= delta_ms;
    }

    // Held direction pins velocity; release decays it for inertial drift.
    let player = &mut state.player;
    if input.left {
        player.vel_x = -PLAYER_SPEED;
        player.eye_dir = -EYE_OFFSET;
    } else if input.right {
        player.vel_x = PLAYER_SPEED;
        player.eye_dir = EYE_OFFSET;
    } else {
        player.vel_x *= RELEASE_DAMPING;
        player.eye_dir *= RELEASE_DAMPING;
    }

    player.x += player.vel_x;
    let max_x = CANVAS_WIDTH - player.width - PLAYER_MARGIN;
    player.x = player.x.clamp(PLAYER_MARGIN, max_x);
    player.squash = 1.0 + player.vel_x.abs() * 0.02;

    state.spawn_timer_ms += delta_ms * speed_factor;
    if state.spawn_timer_ms > state.profile.spawn_interval_ms {
        state.spawn_spike();
        state.spawn_timer_ms = 0.0;
    }

    // Raw delta here: power-ups must not become rarer during slow motion.
    state.power_up_timer_ms += delta_ms;
    if state.power_up_timer_ms > POWER_UP_INTERVAL_MS {
        state.spawn_power_up();
        state.power_up_timer_ms = 0.0;
    }

    let player_box = state.player.aabb();
    let mut hit = false;
    for spike in &mut state.spikes {
        spike.y += spike.speed * speed_factor;
        if spike.aabb().overlaps(&player_box) {
            hit = true;
        }
    }
    if hit {
        state.running = false;
        state.final_score = state.score as u64;
        state.final_survival_secs = state.survival_secs as u32;
        return state.result();
    }
    state.spikes.retain(|s| s.y <= CANVAS_HEIGHT);

    let mut picked: Vec<(PowerUpKind, f32, f32)> = Vec::new();
    state.power_ups.retain_mut(|p| {
        p.y += POWER_UP_FALL_SPEED * speed_factor;
        p.pulse += delta_ms * 0.005;
        if p.aabb().overlaps(&player_box) {
            picked.push((p.kind, p.x + p.width / 2.0, p.y + p.height / 2.0));
            return false;
        }
        p.y <= CANVAS_HEIGHT
    });
    for (kind, cx, cy) in picked {
        match kind {
            PowerUpKind::Slow => {
                state.slow_mo_ms = SLOW_MO_DURATION_MS;
                state.spawn_particles(cx, cy, PowerUpKind::Slow, 15);
            }
            PowerUpKind::Bomb => {
                state.spawn_particles(cx, cy, PowerUpKind::Bomb, 25);
                state.spikes.clear();
                state.screen_shake = BOMB_SHAKE;
            }
        }
    }

    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.life -= delta_ms * 0.002;
        particle.size *= 0.98;
    }
    state.particles.retain(|p| p.life > 0.0);

    state.survival_secs += f64::from(delta_ms) / 1000.0;
    // Accrual accelerates with survival; hazard difficulty itself is fixed.
    state.score += f64::from(delta_ms) / 100.0
        * f64::from(state.profile.score_multiplier)
        * (1.0 + state.survival_secs / 45.0);

    state.result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{PowerUp, Spike};
    use crate::tuning::Difficulty;
    use proptest::prelude::*;

    const IDLE: InputSnapshot = InputSnapshot {
        left: false,
        right: false,
    };
    const LEFT: InputSnapshot = InputSnapshot {
        left: true,
        right: false,
    };

    fn easy_state() -> GameState {
        GameState::new(Difficulty::Easy, 12345)
    }

    /// Keep the seeded entities alone: no timer-driven spawns interfere.
    fn park_timers(state: &mut GameState) {
        state.spawn_timer_ms = f32::MIN;
        state.power_up_timer_ms = f32::MIN;
    }

    fn spike_at(x: f32, y: f32, speed: f32) -> Spike {
        Spike {
            x,
            y,
            width: 30.0,
            height: SPIKE_HEIGHT,
            speed,
            rotation: 0.0,
        }
    }

    fn power_up_on_player(state: &GameState, kind: PowerUpKind) -> PowerUp {
        PowerUp {
            x: state.player.x,
            y: state.player.y,
            width: POWER_UP_SIZE,
            height: POWER_UP_SIZE,
            kind,
            pulse: 0.0,
        }
    }

    #[test]
    fn test_fresh_session_is_empty() {
        let state = easy_state();
        assert!(state.running);
        assert!(state.spikes.is_empty());
        assert!(state.power_ups.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.score, 0.0);
        assert_eq!(state.survival_secs, 0.0);
    }

    #[test]
    fn test_non_positive_delta_is_noop() {
        let mut state = easy_state();
        tick(&mut state, &IDLE, 16.0);
        let before_x = state.player.x;
        let before_score = state.score;
        let before_survival = state.survival_secs;

        for delta in [0.0, -1.0, -1000.0] {
            let result = tick(&mut state, &LEFT, delta);
            assert!(result.running);
            assert_eq!(state.player.x, before_x);
            assert_eq!(state.score, before_score);
            assert_eq!(state.survival_secs, before_survival);
        }
    }

    #[test]
    fn test_left_clamp_holds_at_margin() {
        let mut state = easy_state();
        park_timers(&mut state);
        state.player.x = PLAYER_MARGIN;
        for _ in 0..50 {
            tick(&mut state, &LEFT, 16.0);
            assert_eq!(state.player.x, PLAYER_MARGIN);
        }
    }

    #[test]
    fn test_release_decays_velocity() {
        let mut state = easy_state();
        park_timers(&mut state);
        tick(&mut state, &LEFT, 16.0);
        assert_eq!(state.player.vel_x, -PLAYER_SPEED);

        tick(&mut state, &IDLE, 16.0);
        assert_eq!(state.player.vel_x, -PLAYER_SPEED * RELEASE_DAMPING);
        // Drift continues while velocity decays
        tick(&mut state, &IDLE, 16.0);
        assert_eq!(state.player.vel_x, -PLAYER_SPEED * RELEASE_DAMPING * RELEASE_DAMPING);
    }

    #[test]
    fn test_squash_follows_speed() {
        let mut state = easy_state();
        park_timers(&mut state);
        tick(&mut state, &LEFT, 16.0);
        assert!((state.player.squash - (1.0 + PLAYER_SPEED * 0.02)).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_count_matches_interval() {
        // EASY interval is 1500 ms; 100 ticks of 100 ms is 10 000 ms of
        // full-speed time, which crosses the interval six times.
        let mut state = easy_state();
        for _ in 0..100 {
            tick(&mut state, &IDLE, 100.0);
        }
        assert!(state.running);
        assert_eq!(state.spikes.len(), 6);
    }

    #[test]
    fn test_spike_descends_and_prunes() {
        let mut state = easy_state();
        park_timers(&mut state);
        state.spikes.push(spike_at(300.0, SPIKE_SPAWN_Y, 2.0));

        for _ in 0..300 {
            tick(&mut state, &IDLE, 16.0);
        }
        assert_eq!(state.spikes.len(), 1);
        assert_eq!(state.spikes[0].y, 540.0);

        // 30 more ticks lands exactly on the bottom edge: still retained
        for _ in 0..30 {
            tick(&mut state, &IDLE, 16.0);
        }
        assert_eq!(state.spikes.len(), 1);
        assert_eq!(state.spikes[0].y, CANVAS_HEIGHT);

        tick(&mut state, &IDLE, 16.0);
        assert!(state.spikes.is_empty());
    }

    #[test]
    fn test_collision_stops_engine_and_freezes() {
        let mut state = easy_state();
        park_timers(&mut state);
        for _ in 0..10 {
            tick(&mut state, &IDLE, 16.0);
        }
        let score_at_hit = state.score as u64;
        state
            .spikes
            .push(spike_at(state.player.x, state.player.y - 1.0, 0.0));

        let result = tick(&mut state, &IDLE, 16.0);
        assert!(!result.running);
        assert_eq!(result.score, score_at_hit);
        assert_eq!(state.final_score, score_at_hit);

        // Repeated ticks after game over are inert
        let frozen_spikes = state.spikes.len();
        let frozen_survival = state.survival_secs;
        for _ in 0..20 {
            let again = tick(&mut state, &LEFT, 16.0);
            assert_eq!(again, result);
        }
        assert_eq!(state.spikes.len(), frozen_spikes);
        assert_eq!(state.survival_secs, frozen_survival);
    }

    #[test]
    fn test_bomb_clears_spikes_same_tick() {
        let mut state = easy_state();
        park_timers(&mut state);
        state.spikes.push(spike_at(50.0, 100.0, 2.0));
        state.spikes.push(spike_at(150.0, 200.0, 3.0));
        state.spikes.push(spike_at(300.0, 50.0, 2.5));
        let bomb = power_up_on_player(&state, PowerUpKind::Bomb);
        state.power_ups.push(bomb);

        let result = tick(&mut state, &IDLE, 16.0);
        assert!(result.running);
        assert!(state.spikes.is_empty());
        assert!(state.power_ups.is_empty());
        assert_eq!(state.screen_shake, BOMB_SHAKE);
        assert_eq!(state.particles.len(), 25);
    }

    #[test]
    fn test_slow_pickup_sets_timer_exactly() {
        let mut state = easy_state();
        park_timers(&mut state);
        state.slow_mo_ms = 1234.0;
        let slow = power_up_on_player(&state, PowerUpKind::Slow);
        state.power_ups.push(slow);

        tick(&mut state, &IDLE, 16.0);
        assert_eq!(state.slow_mo_ms, SLOW_MO_DURATION_MS);
        assert_eq!(state.particles.len(), 15);
    }

    #[test]
    fn test_slow_motion_scales_spike_fall() {
        let mut state = easy_state();
        park_timers(&mut state);
        state.slow_mo_ms = SLOW_MO_DURATION_MS;
        state.spikes.push(spike_at(300.0, 0.0, 2.0));

        tick(&mut state, &IDLE, 16.0);
        assert!((state.spikes[0].y - 2.0 * SLOW_MO_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn test_power_up_timer_ignores_slow_motion() {
        // The power-up timer accumulates raw delta, so slow motion does
        // not stretch the 9 s cadence.
        let mut state = easy_state();
        state.slow_mo_ms = 1.0e9;
        for _ in 0..90 {
            tick(&mut state, &IDLE, 100.0);
        }
        assert!(state.power_ups.is_empty());
        tick(&mut state, &IDLE, 100.0);
        assert_eq!(state.power_ups.len(), 1);
    }

    #[test]
    fn test_score_scales_with_survival_ramp() {
        let mut a = GameState::new(Difficulty::Easy, 1);
        park_timers(&mut a);
        tick(&mut a, &IDLE, 100.0);
        let first_tick_gain = a.score;

        // Push survival out to 45 s: the ramp term doubles accrual
        a.survival_secs = 45.0;
        let before = a.score;
        tick(&mut a, &IDLE, 100.0);
        let late_gain = a.score - before;
        assert!(late_gain > first_tick_gain * 1.9);
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            seed in any::<u64>(),
            moves in prop::collection::vec(0u8..3, 1..200),
        ) {
            let mut state = GameState::new(Difficulty::Medium, seed);
            for m in moves {
                let input = match m {
                    0 => IDLE,
                    1 => LEFT,
                    _ => InputSnapshot { left: false, right: true },
                };
                tick(&mut state, &input, 16.7);
                prop_assert!(state.player.x >= PLAYER_MARGIN);
                prop_assert!(
                    state.player.x <= CANVAS_WIDTH - state.player.width - PLAYER_MARGIN
                );
            }
        }

        #[test]
        fn prop_score_and_survival_monotonic(
            seed in any::<u64>(),
            deltas in prop::collection::vec(-5.0f32..50.0, 1..200),
        ) {
            let mut state = GameState::new(Difficulty::Hard, seed);
            let mut last_score = 0.0;
            let mut last_survival = 0.0;
            for delta in deltas {
                tick(&mut state, &IDLE, delta);
                prop_assert!(state.score >= last_score);
                prop_assert!(state.survival_secs >= last_survival);
                last_score = state.score;
                last_survival = state.survival_secs;
            }
        }
    }
}
