//! Game state and core simulation types
//!
//! Everything a session needs to advance deterministically lives here.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::{ConfigError, GameConfig};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player hit an obstacle; terminal until restart
    GameOver,
}

/// Which playfield edge an obstacle hangs from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    Top,
    Bottom,
}

/// Obstacle size class (picks the sprite and, for fixed heights, the height)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    /// Declared set for uniform selection
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Medium, SizeClass::Large];
    /// Order walked by the cyclic size policy
    pub const CYCLE: [SizeClass; 3] = [SizeClass::Small, SizeClass::Large, SizeClass::Medium];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }
}

/// Logical playfield bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Lowest top-left y an entity of `height` may occupy
    pub fn max_y(&self, height: f32) -> f32 {
        (self.height - height).max(0.0)
    }
}

/// In-flight jump (jump control only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpState {
    /// Resting y the jump returns to
    pub start_y: f32,
    pub elapsed_ms: u32,
}

/// The player's bird
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Fixed for the whole session
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub jump: Option<JumpState>,
}

impl Player {
    /// Player centred vertically in the playfield
    pub fn centered(config: &GameConfig, playfield: &Playfield) -> Self {
        let mut player = Self {
            x: config.player_x,
            y: playfield.height / 2.0 - config.player_height / 2.0,
            width: config.player_width,
            height: config.player_height,
            jump: None,
        };
        player.clamp_to(playfield);
        player
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    /// Re-establish `0 <= y <= playfield.height - height`
    pub fn clamp_to(&mut self, playfield: &Playfield) {
        self.y = self.y.clamp(0.0, playfield.max_y(self.height));
    }
}

/// An obstacle bird
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub x: f32,
    /// Spawn-time y; collision and drawing use the anchored span
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub anchor: Anchor,
    pub size: SizeClass,
    /// Already moved past the player (scored at most once)
    #[serde(default)]
    pub passed: bool,
}

impl Obstacle {
    /// Bounding box with the vertical span resolved against the anchor edge
    pub fn bounds(&self, playfield: &Playfield) -> Rect {
        let top = match self.anchor {
            Anchor::Top => 0.0,
            Anchor::Bottom => playfield.height - self.height,
        };
        Rect::new(self.x, top, self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Fully exited past the trailing edge
    pub fn is_off_screen(&self) -> bool {
        self.right() <= 0.0
    }
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Validated configuration the session runs under
    pub config: GameConfig,
    /// Session seed; restart replays it
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    /// Accumulated simulation time
    pub clock_ms: u64,
    /// Simulation time of the last spawn (0 before the first one)
    pub last_spawn_ms: u64,
    /// Ticks executed this session
    pub time_ticks: u64,
    pub playfield: Playfield,
    pub player: Player,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Next obstacle ID
    next_id: u32,
}

impl GameState {
    /// Create a new session; fails fast on an invalid configuration
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let playfield = Playfield::new(config.playfield_width, config.playfield_height);
        let player = Player::centered(&config, &playfield);
        Ok(Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            score: 0,
            clock_ms: 0,
            last_spawn_ms: 0,
            time_ticks: 0,
            playfield,
            player,
            obstacles: Vec::new(),
            next_id: 1,
        })
    }

    /// Full reinitialisation into `Playing`, keeping seed and current bounds
    pub fn restart(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.clock_ms = 0;
        self.last_spawn_ms = 0;
        self.time_ticks = 0;
        self.player = Player::centered(&self.config, &self.playfield);
        self.obstacles.clear();
        self.next_id = 1;
        log::info!("Session restarted (seed {})", self.seed);
    }

    /// Bind the playfield to a new viewport size
    ///
    /// Positions are not rescaled; the player is re-clamped on the next tick.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.playfield = Playfield::new(width, height);
            self.config.playfield_width = width;
            self.config.playfield_height = height;
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Allocate a new obstacle ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
