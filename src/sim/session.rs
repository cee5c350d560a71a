//! Session lifecycle around the raw game state
//!
//! A `Session` is one run: started with a difficulty, ticked until the
//! engine stops, then drained of its single game-over event. The
//! exactly-once guarantee lives here rather than in the frame driver so it
//! holds for every caller.

use super::state::{GameState, TickResult};
use super::tick::{InputSnapshot, tick};
use crate::tuning::Difficulty;

/// Terminal result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOver {
    pub score: u64,
    pub survival_secs: u32,
}

/// One game run from start to game over
pub struct Session {
    pub state: GameState,
    game_over_emitted: bool,
}

impl Session {
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self {
            state: GameState::new(difficulty, seed),
            game_over_emitted: false,
        }
    }

    /// Advance by `delta_ms`; frozen once the engine has stopped.
    pub fn tick(&mut self, delta_ms: f32, input: &InputSnapshot) -> TickResult {
        tick(&mut self.state, input, delta_ms)
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// The game-over event, yielded exactly once after the engine stops.
    pub fn take_game_over(&mut self) -> Option<GameOver> {
        if self.state.running || self.game_over_emitted {
            return None;
        }
        self.game_over_emitted = true;
        Some(GameOver {
            score: self.state.final_score,
            survival_secs: self.state.final_survival_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SPIKE_HEIGHT;
    use crate::sim::state::Spike;

    fn crash(session: &mut Session) {
        session.state.spawn_timer_ms = f32::MIN;
        session.state.power_up_timer_ms = f32::MIN;
        let player = &session.state.player;
        session.state.spikes.push(Spike {
            x: player.x,
            y: player.y - 1.0,
            width: 30.0,
            height: SPIKE_HEIGHT,
            speed: 0.0,
            rotation: 0.0,
        });
        session.tick(16.0, &InputSnapshot::default());
    }

    #[test]
    fn test_no_game_over_while_running() {
        let mut session = Session::new(Difficulty::Easy, 7);
        session.tick(16.0, &InputSnapshot::default());
        assert!(session.is_running());
        assert!(session.take_game_over().is_none());
    }

    #[test]
    fn test_game_over_fires_exactly_once() {
        let mut session = Session::new(Difficulty::Easy, 7);
        for _ in 0..5 {
            session.tick(16.0, &InputSnapshot::default());
        }
        crash(&mut session);
        assert!(!session.is_running());

        let over = session.take_game_over().expect("first poll yields the event");
        assert_eq!(over.score, session.state.final_score);
        assert_eq!(over.survival_secs, session.state.final_survival_secs);

        assert!(session.take_game_over().is_none());
        // Further ticks never re-arm it
        session.tick(16.0, &InputSnapshot::default());
        assert!(session.take_game_over().is_none());
    }
}
