//! Sprite assets and the startup loading gate
//!
//! Sprites are small JSON pixel-art documents:
//!
//! ```json
//! { "palette": { "y": [245, 200, 66, 255] }, "rows": ["..yy..", ".yyyy."] }
//! ```
//!
//! `.` and space are always transparent. The game declares a fixed manifest;
//! the simulation may not start until every declared sprite has loaded, and
//! any single failure aborts startup.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::sim::SizeClass;

/// RGBA colour, 8 bits per channel
pub type Rgba = [u8; 4];

pub const BACKGROUND: &str = "background";
pub const BIRD_FRAMES: [&str; 2] = ["bird-fly-1", "bird-fly-2"];
const SMALL_FRAMES: [&str; 2] = ["obstacle-bird-small-1", "obstacle-bird-small-2"];
const MEDIUM_FRAMES: [&str; 2] = ["obstacle-bird-medium-1", "obstacle-bird-medium-2"];
const LARGE_FRAMES: [&str; 2] = ["obstacle-bird-large-1", "obstacle-bird-large-2"];

/// Every sprite the game needs before it can start
pub const MANIFEST: [&str; 9] = [
    BACKGROUND,
    BIRD_FRAMES[0],
    BIRD_FRAMES[1],
    SMALL_FRAMES[0],
    SMALL_FRAMES[1],
    MEDIUM_FRAMES[0],
    MEDIUM_FRAMES[1],
    LARGE_FRAMES[0],
    LARGE_FRAMES[1],
];

/// Animation frames for an obstacle size class
pub fn obstacle_frames(size: SizeClass) -> [&'static str; 2] {
    match size {
        SizeClass::Small => SMALL_FRAMES,
        SizeClass::Medium => MEDIUM_FRAMES,
        SizeClass::Large => LARGE_FRAMES,
    }
}

/// File name (or URL suffix) of a declared asset
pub fn file_name(name: &str) -> String {
    format!("{name}.json")
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset '{name}' could not be loaded: {reason}")]
    Unavailable { name: String, reason: String },
    #[error("asset '{name}' is not a valid sprite document: {source}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("asset '{name}' has no pixels")]
    Empty { name: String },
    #[error("asset '{name}' row {row} is {found} pixels wide, expected {expected}")]
    RaggedRow {
        name: String,
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("asset '{name}' palette key '{key}' must be a single character")]
    BadPaletteKey { name: String, key: String },
    #[error("asset '{name}' uses '{key}' which is not in its palette")]
    UnknownPaletteKey { name: String, key: char },
    #[error("asset '{name}' is not declared in the manifest")]
    Undeclared { name: String },
    #[error("asset '{name}' never finished loading")]
    Missing { name: String },
}

#[derive(Debug, Deserialize)]
struct SpriteDocument {
    #[serde(default)]
    palette: BTreeMap<String, Rgba>,
    rows: Vec<String>,
}

/// Decoded sprite (row-major, `None` = transparent)
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Option<Rgba>>,
}

impl Sprite {
    /// Decode a sprite document
    pub fn parse(name: &str, document: &str) -> Result<Self, AssetError> {
        let doc: SpriteDocument =
            serde_json::from_str(document).map_err(|source| AssetError::Malformed {
                name: name.to_string(),
                source,
            })?;

        let mut palette = HashMap::with_capacity(doc.palette.len());
        for (key, color) in doc.palette {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    palette.insert(c, color);
                }
                _ => {
                    return Err(AssetError::BadPaletteKey {
                        name: name.to_string(),
                        key,
                    });
                }
            }
        }

        let width = doc.rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(AssetError::Empty {
                name: name.to_string(),
            });
        }

        let mut pixels = Vec::with_capacity(width * doc.rows.len());
        for (row, line) in doc.rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(AssetError::RaggedRow {
                    name: name.to_string(),
                    row,
                    found,
                    expected: width,
                });
            }
            for key in line.chars() {
                let pixel = match key {
                    '.' | ' ' => None,
                    c => Some(*palette.get(&c).ok_or(AssetError::UnknownPaletteKey {
                        name: name.to_string(),
                        key: c,
                    })?),
                };
                pixels.push(pixel);
            }
        }

        Ok(Self {
            width,
            height: doc.rows.len(),
            pixels,
        })
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            None
        }
    }

    /// Nearest-neighbour lookup with `u`, `v` in `[0, 1)`
    pub fn sample(&self, u: f32, v: f32) -> Option<Rgba> {
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * self.height as f32) as usize).min(self.height - 1);
        self.pixel(x, y)
    }

    /// Horizontal runs of identical opaque pixels in one row: `(x, len, colour)`
    pub fn row_runs(&self, y: usize) -> Vec<(usize, usize, Rgba)> {
        let mut runs = Vec::new();
        let mut x = 0;
        while x < self.width {
            match self.pixel(x, y) {
                Some(color) => {
                    let start = x;
                    while x < self.width && self.pixel(x, y) == Some(color) {
                        x += 1;
                    }
                    runs.push((start, x - start, color));
                }
                None => x += 1,
            }
        }
        runs
    }
}

/// All declared sprites, available only once the gate has opened
#[derive(Debug, Clone, Default)]
pub struct SpriteAtlas {
    sprites: HashMap<String, Sprite>,
}

impl SpriteAtlas {
    pub fn get(&self, name: &str) -> Option<&Sprite> {
        self.sprites.get(name)
    }

    pub fn background(&self) -> Option<&Sprite> {
        self.get(BACKGROUND)
    }

    pub fn bird(&self, frame: usize) -> Option<&Sprite> {
        self.get(BIRD_FRAMES[frame % BIRD_FRAMES.len()])
    }

    pub fn obstacle(&self, size: SizeClass, frame: usize) -> Option<&Sprite> {
        let frames = obstacle_frames(size);
        self.get(frames[frame % frames.len()])
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

/// Joined completion over a fixed set of asset loads
///
/// Loads may complete in any order; the gate opens once every declared
/// name resolved and none failed. The first failure is kept.
#[derive(Debug)]
pub struct AssetGate {
    pending: Vec<&'static str>,
    loaded: HashMap<String, Sprite>,
    error: Option<AssetError>,
}

impl AssetGate {
    pub fn new(manifest: &[&'static str]) -> Self {
        Self {
            pending: manifest.to_vec(),
            loaded: HashMap::with_capacity(manifest.len()),
            error: None,
        }
    }

    /// Gate over the game's own manifest
    pub fn for_manifest() -> Self {
        Self::new(&MANIFEST)
    }

    /// Record one completed load
    pub fn resolve(&mut self, name: &str, document: &str) {
        if self.loaded.contains_key(name) {
            log::warn!("Asset '{}' resolved twice; keeping the first load", name);
            return;
        }
        let Some(index) = self.pending.iter().position(|p| *p == name) else {
            self.fail(AssetError::Undeclared {
                name: name.to_string(),
            });
            return;
        };
        match Sprite::parse(name, document) {
            Ok(sprite) => {
                self.pending.swap_remove(index);
                self.loaded.insert(name.to_string(), sprite);
                log::debug!("Loaded asset '{}'", name);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Record one failed load
    pub fn fail(&mut self, error: AssetError) {
        log::error!("{}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// The readiness flag: every declared asset loaded
    pub fn is_ready(&self) -> bool {
        self.error.is_none() && self.pending.is_empty()
    }

    /// Open the gate
    pub fn finish(self) -> Result<SpriteAtlas, AssetError> {
        if !self.is_ready() {
            return Err(self.error.unwrap_or_else(|| AssetError::Missing {
                name: self.pending.first().map(|n| n.to_string()).unwrap_or_default(),
            }));
        }
        log::info!("All {} assets loaded", self.loaded.len());
        Ok(SpriteAtlas {
            sprites: self.loaded,
        })
    }
}

/// Synchronous provider of raw sprite documents
pub trait AssetSource {
    fn read(&self, name: &str) -> Result<String, AssetError>;
}

/// Load the whole manifest through one gate
pub fn load_all(source: &dyn AssetSource) -> Result<SpriteAtlas, AssetError> {
    let mut gate = AssetGate::for_manifest();
    for name in MANIFEST {
        match source.read(name) {
            Ok(document) => gate.resolve(name, &document),
            Err(e) => gate.fail(e),
        }
    }
    gate.finish()
}

/// Sprites as `<root>/<name>.json` files
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct DirSource {
    root: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl DirSource {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AssetSource for DirSource {
    fn read(&self, name: &str) -> Result<String, AssetError> {
        let path = self.root.join(file_name(name));
        std::fs::read_to_string(&path).map_err(|e| AssetError::Unavailable {
            name: name.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })
    }
}

/// In-memory documents
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, document: &str) -> Self {
        self.documents.insert(name.to_string(), document.to_string());
        self
    }
}

impl AssetSource for MemorySource {
    fn read(&self, name: &str) -> Result<String, AssetError> {
        self.documents
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::Unavailable {
                name: name.to_string(),
                reason: "not found".to_string(),
            })
    }
}
