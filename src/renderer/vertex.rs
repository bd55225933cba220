//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::Rgba;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Rgba,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Rgba) -> Self {
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

/// Colors for scene elements not owned by an entity
pub mod colors {
    use crate::{Rgba, rgb};

    pub const BACKGROUND: Rgba = [0.02, 0.02, 0.06, 1.0];
    pub const GRID: Rgba = [0.0, 1.0, 1.0, 0.05];
    pub const BALL: Rgba = rgb(0xffffff);
    pub const BALL_GLOW: Rgba = rgb(0x00ffff);
    pub const PENETRATING_GLOW: Rgba = rgb(0xff00ff);
    pub const LASER: Rgba = rgb(0xff3300);
    pub const LASER_CORE: Rgba = rgb(0xffff00);
    pub const CRACK: Rgba = [0.0, 0.0, 0.0, 0.45];
    pub const HIT_PIP: Rgba = [1.0, 1.0, 1.0, 0.9];
}
