//! Variable-timestep simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Deltas come from the caller; there is no internal clock
//! - No rendering or platform dependencies

pub mod collision;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use session::{GameOver, Session};
pub use state::{GameState, Particle, Player, PowerUp, PowerUpKind, Spike, TickResult};
pub use tick::{InputSnapshot, tick};
