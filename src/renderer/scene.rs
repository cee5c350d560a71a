//! Scene assembly: one vertex list per frame from the simulation state
//!
//! Pure read of the game state. The only randomness is the screen-shake
//! jitter, drawn from a render-local RNG so it can never feed back into
//! gameplay; given the same state and jitter RNG the output is identical.

use glam::Vec2;
use rand::Rng;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::{GameState, PowerUpKind};

const GRID_STEP: f32 = 40.0;
const CIRCLE_SEGMENTS: u32 = 24;

/// Build the frame's vertex list in logical 400x600 coordinates
pub fn build(state: &GameState, shake_rng: &mut impl Rng) -> Vec<Vertex> {
    let mut verts = Vec::with_capacity(1024);

    shapes::rect(
        &mut verts,
        0.0,
        0.0,
        CANVAS_WIDTH,
        CANVAS_HEIGHT,
        colors::BACKGROUND,
    );
    grid(&mut verts);
    particles(&mut verts, state);
    player(&mut verts, state);
    power_ups(&mut verts, state);
    spikes(&mut verts, state);
    slow_mo_bar(&mut verts, state);

    // Whole-frame jitter translation, HUD included
    if state.screen_shake > 0.0 {
        let dx = (shake_rng.random::<f32>() - 0.5) * state.screen_shake * 12.0;
        let dy = (shake_rng.random::<f32>() - 0.5) * state.screen_shake * 12.0;
        for v in &mut verts {
            v.position[0] += dx;
            v.position[1] += dy;
        }
    }

    verts
}

fn grid(out: &mut Vec<Vertex>) {
    let mut x = 0.0;
    while x < CANVAS_WIDTH {
        shapes::rect(out, x, 0.0, 1.0, CANVAS_HEIGHT, colors::GRID);
        x += GRID_STEP;
    }
    let mut y = 0.0;
    while y < CANVAS_HEIGHT {
        shapes::rect(out, 0.0, y, CANVAS_WIDTH, 1.0, colors::GRID);
        y += GRID_STEP;
    }
}

fn particles(out: &mut Vec<Vertex>, state: &GameState) {
    for p in &state.particles {
        let base = match p.kind {
            PowerUpKind::Slow => colors::PARTICLE_SLOW,
            PowerUpKind::Bomb => colors::PARTICLE_BOMB,
        };
        let color = [base[0], base[1], base[2], p.life.clamp(0.0, 1.0)];
        shapes::rect(
            out,
            p.pos.x - p.size / 2.0,
            p.pos.y - p.size / 2.0,
            p.size,
            p.size,
            color,
        );
    }
}

fn player(out: &mut Vec<Vertex>, state: &GameState) {
    let p = &state.player;
    let center = Vec2::new(p.x + p.width / 2.0, p.y + p.height / 2.0);
    // Squash widens the footprint and flattens the height equally
    let (sx, sy) = (p.squash, 1.0 / p.squash);

    // White border, then body in the tier color
    shapes::centered_rect(
        out,
        center,
        p.width / 2.0 + 2.0,
        p.height / 2.0 + 2.0,
        sx,
        sy,
        colors::WHITE,
    );
    shapes::centered_rect(
        out,
        center,
        p.width / 2.0,
        p.height / 2.0,
        sx,
        sy,
        state.profile.color,
    );

    // Two eye marks, offset by facing direction, inside the same squash
    for local_x in [-8.0, 2.0] {
        let x0 = center.x + (local_x + p.eye_dir) * sx;
        let y0 = center.y + (-8.0) * sy;
        shapes::rect(out, x0, y0, 6.0 * sx, 6.0 * sy, colors::BLACK);
    }
}

fn power_ups(out: &mut Vec<Vertex>, state: &GameState) {
    for pw in &state.power_ups {
        let center = Vec2::new(pw.x + pw.width / 2.0, pw.y + pw.height / 2.0);
        let pulse_scale = 1.0 + pw.pulse.sin() * 0.1;
        let radius = 10.0 * pulse_scale;

        let fill = match pw.kind {
            PowerUpKind::Slow => colors::POWER_UP_SLOW,
            PowerUpKind::Bomb => colors::POWER_UP_BOMB,
        };
        shapes::circle(out, center, radius, fill, CIRCLE_SEGMENTS);
        shapes::ring(
            out,
            center,
            radius - 1.5,
            radius + 1.5,
            colors::WHITE,
            CIRCLE_SEGMENTS,
        );
        if pw.kind == PowerUpKind::Bomb {
            shapes::rect(out, center.x - 2.0, center.y - 2.0, 4.0, 4.0, colors::WHITE);
        }
    }
}

fn spikes(out: &mut Vec<Vertex>, state: &GameState) {
    for s in &state.spikes {
        let center = Vec2::new(s.x + s.width / 2.0, s.y + s.height / 2.0);
        // Outline drawn as a slightly larger triangle underneath
        shapes::spike_triangle(
            out,
            center,
            s.width / 2.0 + 2.0,
            s.height / 2.0 + 2.0,
            s.rotation,
            colors::WHITE,
        );
        shapes::spike_triangle(
            out,
            center,
            s.width / 2.0,
            s.height / 2.0,
            s.rotation,
            colors::SPIKE,
        );
    }
}

fn slow_mo_bar(out: &mut Vec<Vertex>, state: &GameState) {
    if state.slow_mo_ms <= 0.0 {
        return;
    }
    let ratio = (state.slow_mo_ms / SLOW_MO_DURATION_MS).clamp(0.0, 1.0);
    shapes::rect(out, CANVAS_WIDTH - 134.0, 20.0, 124.0, 12.0, colors::WHITE);
    shapes::rect(
        out,
        CANVAS_WIDTH - 132.0,
        22.0,
        ratio * 120.0,
        8.0,
        colors::SLOW_BAR_FILL,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_build_is_deterministic() {
        let mut state = GameState::new(Difficulty::Easy, 42);
        state.screen_shake = 3.0;
        state.spawn_spike();
        state.spawn_power_up();
        state.spawn_particles(200.0, 300.0, PowerUpKind::Slow, 10);

        let a = build(&state, &mut Pcg32::seed_from_u64(9));
        let b = build(&state, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a.len(), b.len());
        for (va, vb) in a.iter().zip(&b) {
            assert_eq!(va.position, vb.position);
            assert_eq!(va.color, vb.color);
        }
    }

    #[test]
    fn test_slow_mo_bar_only_during_window() {
        let state = GameState::new(Difficulty::Easy, 42);
        let without = build(&state, &mut Pcg32::seed_from_u64(0)).len();

        let mut slowed = GameState::new(Difficulty::Easy, 42);
        slowed.slow_mo_ms = 2500.0;
        let with = build(&slowed, &mut Pcg32::seed_from_u64(0)).len();
        assert_eq!(with, without + 12);
    }

    #[test]
    fn test_particle_alpha_tracks_life() {
        let mut state = GameState::new(Difficulty::Easy, 42);
        state.spawn_particles(100.0, 100.0, PowerUpKind::Bomb, 1);
        state.particles[0].life = 0.25;

        let verts = build(&state, &mut Pcg32::seed_from_u64(0));
        assert!(verts.iter().any(|v| v.color[3] == 0.25));
    }
}
