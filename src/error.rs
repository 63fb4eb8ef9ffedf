//! Startup error aggregation
//!
//! Everything that can stop the game before the first tick ends up here.
//! Nothing in the tick path returns an error.

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::renderer::RenderError;

/// Fatal error surfaced to the host before the simulation starts
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("asset loading failed: {0}")]
    Assets(#[from] AssetError),
    #[error("graphics initialisation failed: {0}")]
    Render(#[from] RenderError),
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
