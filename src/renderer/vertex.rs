//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

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

/// Same color with a different alpha
#[inline]
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// Neon palette
pub mod colors {
    /// #050510
    pub const BACKGROUND: [f32; 4] = [0.020, 0.020, 0.063, 1.0];
    /// #1a1a3a
    pub const ROAD_LINE: [f32; 4] = [0.102, 0.102, 0.227, 1.0];
    /// #00f3ff
    pub const NEON_BLUE: [f32; 4] = [0.0, 0.953, 1.0, 1.0];
    /// #ff00ff
    pub const NEON_PINK: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    /// #00ff00
    pub const NEON_GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    /// Road watermark (white at 10%)
    pub const WATERMARK: [f32; 4] = [1.0, 1.0, 1.0, 0.1];
}
