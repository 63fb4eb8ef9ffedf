//! Bird Dodge - A side-scrolling obstacle dodging game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, scoring)
//! - `config`: Data-driven game constants and policies
//! - `assets`: Sprite manifest and the "all assets loaded" gate
//! - `renderer`: WebGPU rendering pipeline
//! - `term`: Terminal front-end (native only)

pub mod assets;
pub mod config;
pub mod error;
pub mod renderer;
pub mod sim;
#[cfg(not(target_arch = "wasm32"))]
pub mod term;

pub use assets::{AssetError, AssetGate, Sprite, SpriteAtlas};
pub use config::{ConfigError, GameConfig};
pub use error::StartupError;

/// Game configuration constants (defaults for `GameConfig`)
pub mod consts {
    /// Fixed simulation timestep in milliseconds
    pub const TICK_MS: u32 = 100;
    /// Maximum catch-up ticks per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (origin top-left, y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player defaults - the bird never moves horizontally
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    /// Vertical distance of one up/down step
    pub const PLAYER_STEP: f32 = 20.0;

    /// Jump variant: apex height above the take-off point, and total duration
    pub const JUMP_HEIGHT: f32 = 100.0;
    pub const JUMP_DURATION_MS: u32 = 600;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 50.0;
    /// Horizontal distance travelled per tick
    pub const OBSTACLE_SPEED: f32 = 5.0;
    /// Time between spawns
    pub const SPAWN_INTERVAL_MS: u64 = 3000;

    /// Fixed obstacle heights per size class
    pub const SMALL_HEIGHT: f32 = 50.0;
    pub const MEDIUM_HEIGHT: f32 = 100.0;
    pub const LARGE_HEIGHT: f32 = 150.0;
}
