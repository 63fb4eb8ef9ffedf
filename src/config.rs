//! Game configuration
//!
//! Every constant the simulation uses lives here so a session can be tuned
//! without recompiling. Loaded from JSON (a file on native, LocalStorage on
//! the web) and validated once before the first tick.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::SizeClass;

/// Configuration errors, all detected at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("obstacle height range is inverted (min {min} > max {max})")]
    InvertedHeightRange { min: f32, max: f32 },
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} ({value}) does not fit the playfield ({limit})")]
    ExceedsPlayfield {
        field: &'static str,
        value: f32,
        limit: f32,
    },
}

/// How the spawner picks an obstacle's size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizePolicy {
    /// Uniform over small/medium/large
    #[default]
    Random,
    /// `floor(clock / spawn_interval) mod 3` over small, large, medium
    Cyclic,
}

/// How the spawner derives an obstacle's height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HeightPolicy {
    /// Fixed lookup per size class
    Fixed { small: f32, medium: f32, large: f32 },
    /// Uniform in `[min, max]`, independent of size class
    Range { min: f32, max: f32 },
}

impl Default for HeightPolicy {
    fn default() -> Self {
        HeightPolicy::Fixed {
            small: SMALL_HEIGHT,
            medium: MEDIUM_HEIGHT,
            large: LARGE_HEIGHT,
        }
    }
}

impl HeightPolicy {
    /// Fixed height for a size class, `None` for ranged policies
    pub fn fixed_height(&self, size: SizeClass) -> Option<f32> {
        match *self {
            HeightPolicy::Fixed {
                small,
                medium,
                large,
            } => Some(match size {
                SizeClass::Small => small,
                SizeClass::Medium => medium,
                SizeClass::Large => large,
            }),
            HeightPolicy::Range { .. } => None,
        }
    }

    /// Tallest obstacle this policy can produce
    pub fn max_height(&self) -> f32 {
        match *self {
            HeightPolicy::Fixed {
                small,
                medium,
                large,
            } => small.max(medium).max(large),
            HeightPolicy::Range { max, .. } => max,
        }
    }
}

/// Which event awards a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// One point per obstacle that moves past the player
    #[default]
    PerPass,
    /// One point per obstacle spawned
    PerSpawn,
}

/// Which player commands the session honours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerControl {
    /// Discrete up/down steps
    #[default]
    Step,
    /// Timed rise-and-fall jump
    Jump,
}

impl PlayerControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerControl::Step => "step",
            PlayerControl::Jump => "jump",
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Player ===
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Distance of one up/down step
    pub player_step: f32,
    pub control: PlayerControl,
    /// Apex height of a jump above its take-off point
    pub jump_height: f32,
    pub jump_duration_ms: u32,

    // === Obstacles ===
    pub obstacle_width: f32,
    /// Distance moved per tick
    pub obstacle_speed: f32,
    pub spawn_interval_ms: u64,
    pub size_policy: SizePolicy,
    pub height_policy: HeightPolicy,

    // === Timing ===
    pub tick_ms: u32,
    pub max_substeps: u32,

    // === Scoring ===
    pub score_policy: ScorePolicy,

    // === Session ===
    /// Fixed RNG seed; the host picks one from the clock when absent
    pub seed: Option<u64>,

    // === Assets ===
    /// Directory (native) or URL prefix (web) holding the sprite documents
    pub asset_base: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            player_x: PLAYER_X,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_step: PLAYER_STEP,
            control: PlayerControl::Step,
            jump_height: JUMP_HEIGHT,
            jump_duration_ms: JUMP_DURATION_MS,

            obstacle_width: OBSTACLE_WIDTH,
            obstacle_speed: OBSTACLE_SPEED,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            size_policy: SizePolicy::Random,
            height_policy: HeightPolicy::default(),

            tick_ms: TICK_MS,
            max_substeps: MAX_SUBSTEPS,

            score_policy: ScorePolicy::PerPass,

            seed: None,

            asset_base: "assets".to_string(),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    // Written so NaN is rejected too
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn fits(field: &'static str, value: f32, limit: f32) -> Result<(), ConfigError> {
    if value <= limit {
        Ok(())
    } else {
        Err(ConfigError::ExceedsPlayfield {
            field,
            value,
            limit,
        })
    }
}

impl GameConfig {
    /// Parse and validate a JSON document (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Copy with the playfield bound to a host viewport
    pub fn with_playfield(mut self, width: f32, height: f32) -> Self {
        self.playfield_width = width;
        self.playfield_height = height;
        self
    }

    /// Reject degenerate constants before any tick runs
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("playfield_width", self.playfield_width as f64)?;
        positive("playfield_height", self.playfield_height as f64)?;
        positive("player_width", self.player_width as f64)?;
        positive("player_height", self.player_height as f64)?;
        positive("player_step", self.player_step as f64)?;
        positive("obstacle_width", self.obstacle_width as f64)?;
        positive("obstacle_speed", self.obstacle_speed as f64)?;
        positive("spawn_interval_ms", self.spawn_interval_ms as f64)?;
        positive("tick_ms", self.tick_ms as f64)?;
        positive("max_substeps", self.max_substeps as f64)?;
        if self.control == PlayerControl::Jump {
            positive("jump_height", self.jump_height as f64)?;
            positive("jump_duration_ms", self.jump_duration_ms as f64)?;
        }
        if !(self.player_x >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "player_x",
                value: self.player_x as f64,
            });
        }

        match self.height_policy {
            HeightPolicy::Fixed {
                small,
                medium,
                large,
            } => {
                positive("height_policy.small", small as f64)?;
                positive("height_policy.medium", medium as f64)?;
                positive("height_policy.large", large as f64)?;
            }
            HeightPolicy::Range { min, max } => {
                positive("height_policy.min", min as f64)?;
                if min > max {
                    return Err(ConfigError::InvertedHeightRange { min, max });
                }
            }
        }

        fits("player_height", self.player_height, self.playfield_height)?;
        fits(
            "player_x + player_width",
            self.player_x + self.player_width,
            self.playfield_width,
        )?;
        fits(
            "obstacle height",
            self.height_policy.max_height(),
            self.playfield_height,
        )?;
        Ok(())
    }

    /// Read, parse and validate a config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "bird_dodge_config";

    /// Load config overrides from LocalStorage (WASM only)
    ///
    /// Unparseable documents are logged and ignored; validation against the
    /// real viewport happens later in startup.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = GameConfig {
            height_policy: HeightPolicy::Range {
                min: 120.0,
                max: 80.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedHeightRange { min, max }) if min == 120.0 && max == 80.0
        ));
    }

    #[test]
    fn test_degenerate_range_accepted() {
        let config = GameConfig {
            height_policy: HeightPolicy::Range {
                min: 80.0,
                max: 80.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = GameConfig {
            spawn_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "spawn_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let config = GameConfig {
            obstacle_speed: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_obstacle_taller_than_playfield_rejected() {
        let config = GameConfig::default().with_playfield(800.0, 120.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ExceedsPlayfield {
                field: "obstacle height",
                ..
            })
        ));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = GameConfig::from_json(
            r#"{ "obstacle_speed": 8.0, "size_policy": "cyclic", "score_policy": "per_spawn" }"#,
        )
        .unwrap();
        assert_eq!(config.obstacle_speed, 8.0);
        assert_eq!(config.size_policy, SizePolicy::Cyclic);
        assert_eq!(config.score_policy, ScorePolicy::PerSpawn);
        assert_eq!(config.spawn_interval_ms, SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_tagged_height_policy_json() {
        let config = GameConfig::from_json(
            r#"{ "height_policy": { "mode": "range", "min": 40.0, "max": 160.0 } }"#,
        )
        .unwrap();
        assert_eq!(
            config.height_policy,
            HeightPolicy::Range {
                min: 40.0,
                max: 160.0
            }
        );
    }

    #[test]
    fn test_invalid_json_fails_fast() {
        let err = GameConfig::from_json(
            r#"{ "height_policy": { "mode": "range", "min": 200.0, "max": 100.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedHeightRange { .. }));

        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_policies() {
        let config = GameConfig {
            control: PlayerControl::Jump,
            seed: Some(7),
            ..Default::default()
        };
        let parsed = GameConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
