//! WebGPU rendering module
//!
//! Sprites are drawn as merged pixel-run quads through a single
//! position + colour vertex pipeline.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;
