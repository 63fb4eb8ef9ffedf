//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::assets::Rgba;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Sprite colour (sRGB bytes) to the linear floats an sRGB surface expects
pub fn linear_color(rgba: Rgba) -> [f32; 4] {
    let channel = |c: u8| {
        let c = c as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [
        channel(rgba[0]),
        channel(rgba[1]),
        channel(rgba[2]),
        rgba[3] as f32 / 255.0,
    ]
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    /// Drawn under the sprite if the background sprite is missing
    pub const SKY: [f32; 4] = [0.16, 0.45, 0.8, 1.0];
    pub const GAME_OVER_SHADE: [f32; 4] = [0.0, 0.0, 0.0, 0.55];
    pub const GAME_OVER_BAND: [f32; 4] = [0.75, 0.1, 0.1, 0.85];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_color_endpoints() {
        assert_eq!(linear_color([0, 0, 0, 0]), [0.0, 0.0, 0.0, 0.0]);
        let white = linear_color([255, 255, 255, 255]);
        for c in white {
            assert!((c - 1.0).abs() < 1e-6);
        }
        // Mid grey is darker in linear space
        assert!(linear_color([128, 128, 128, 255])[0] < 0.25);
    }
}
