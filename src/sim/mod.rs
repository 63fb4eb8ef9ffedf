//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod motion;
pub mod score;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::FixedStep;
pub use collision::{Rect, first_collision};
pub use motion::Command;
pub use snapshot::{ObstacleView, Snapshot};
pub use state::{Anchor, GamePhase, GameState, JumpState, Obstacle, Player, Playfield, SizeClass};
pub use tick::{TickInput, tick};
