//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with texture coordinates and a tint color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Untextured vertex (samples the white texel)
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [0.0, 0.0],
            color,
        }
    }

    pub const fn textured(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
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
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements (sRGB, as authored)
pub mod colors {
    /// `0xRRGGBB` to RGBA floats
    pub const fn hex(rgb: u32) -> [f32; 4] {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    pub const SKY: [f32; 4] = hex(0x87CEEB);
    pub const GRASS_LIGHT: [f32; 4] = hex(0x90EE90);
    pub const GRASS_DARK: [f32; 4] = hex(0x228B22);
    pub const GROUND: [f32; 4] = hex(0x8B4513);
    pub const OBSTACLE: [f32; 4] = hex(0x9932CC);
    pub const PLAYER: [f32; 4] = hex(0x228B22);
    pub const OUTLINE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    // Collision overlay (70% opacity)
    pub const OVERLAY_PLAYER: [f32; 4] = [1.0, 0.0, 0.0, 0.7];
    pub const OVERLAY_OBSTACLE: [f32; 4] = [0.0, 1.0, 0.0, 0.7];
    pub const OVERLAY_GROUND: [f32; 4] = [0.0, 0.0, 1.0, 0.7];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes[2].offset, 16);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(colors::hex(0xFF0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(colors::hex(0x000000), [0.0, 0.0, 0.0, 1.0]);
        assert!((colors::SKY[2] - 235.0 / 255.0).abs() < 1e-6);
    }
}
