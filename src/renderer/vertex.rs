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

/// Colors for game elements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: [f32; 4],
    pub border: [f32; 4],
    pub ship: [f32; 4],
    pub flame: [f32; 4],
    pub asteroid: [f32; 4],
    pub projectile: [f32; 4],
}

impl Palette {
    /// Electric blue ship, lime rocks, hot pink shots
    pub const fn neon() -> Self {
        Self {
            background: [0.0, 0.0, 0.0, 1.0],
            border: [1.0, 1.0, 1.0, 0.6],
            ship: [0.49, 0.98, 1.0, 1.0],
            flame: [1.0, 1.0, 0.0, 1.0],
            asteroid: [0.2, 0.8, 0.2, 1.0],
            projectile: [1.0, 0.41, 0.71, 1.0],
        }
    }

    pub const fn high_contrast() -> Self {
        Self {
            background: [0.0, 0.0, 0.0, 1.0],
            border: [1.0, 1.0, 1.0, 1.0],
            ship: [1.0, 1.0, 1.0, 1.0],
            flame: [1.0, 0.85, 0.0, 1.0],
            asteroid: [0.6, 0.6, 0.6, 1.0],
            projectile: [1.0, 1.0, 0.0, 1.0],
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::neon()
    }
}
