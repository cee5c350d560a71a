//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
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

/// Colors for game elements
pub mod colors {
    /// Near-black backdrop behind the grid
    pub const BACKGROUND: [f32; 4] = [0.047, 0.039, 0.035, 1.0];
    pub const GRID: [f32; 4] = [0.161, 0.145, 0.141, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const SPIKE: [f32; 4] = [0.973, 0.443, 0.443, 1.0];
    pub const POWER_UP_SLOW: [f32; 4] = [0.133, 0.827, 0.933, 1.0];
    pub const POWER_UP_BOMB: [f32; 4] = [0.976, 0.451, 0.086, 1.0];
    pub const PARTICLE_SLOW: [f32; 4] = [0.024, 0.714, 0.831, 1.0];
    pub const PARTICLE_BOMB: [f32; 4] = [0.937, 0.267, 0.267, 1.0];
    pub const SLOW_BAR_FILL: [f32; 4] = [0.133, 0.827, 0.933, 1.0];
}
