//! Vertex types for field rendering

use bytemuck::{Pod, Zeroable};

/// World-space vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y, z],
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
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for field elements (sRGB hex, converted to linear for an sRGB surface)
pub mod colors {
    use crate::field::Role;

    /// Convert a 0xRRGGBB sRGB color to linear RGBA
    pub fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
        let channel = |shift: u32| {
            let c = ((rgb >> shift) & 0xff) as f32 / 255.0;
            c.powf(2.2)
        };
        [channel(16), channel(8), channel(0), alpha]
    }

    /// Scale the RGB part, leaving alpha alone (cheap face shading)
    pub fn shade(color: [f32; 4], factor: f32) -> [f32; 4] {
        [color[0] * factor, color[1] * factor, color[2] * factor, color[3]]
    }

    pub fn role(role: Role) -> [f32; 4] {
        match role {
            Role::Batsman => hex(0xffd700, 1.0),      // Gold
            Role::Bowler => hex(0xff4500, 1.0),       // Orange red
            Role::Wicketkeeper => hex(0x00ced1, 1.0), // Dark turquoise
            Role::Fielder => hex(0x32cd32, 1.0),      // Lime green
        }
    }

    pub fn background() -> [f32; 4] {
        hex(0x111827, 1.0)
    }
    pub fn ground() -> [f32; 4] {
        hex(0x4ade80, 1.0)
    }
    pub fn pitch() -> [f32; 4] {
        hex(0xc19a6b, 1.0)
    }
    pub fn line() -> [f32; 4] {
        hex(0xffffff, 1.0)
    }
    pub fn thirty_yard() -> [f32; 4] {
        hex(0xffffff, 0.7)
    }
    pub fn rope() -> [f32; 4] {
        hex(0xff0000, 1.0)
    }
    pub fn stumps() -> [f32; 4] {
        hex(0x8b4513, 1.0)
    }
    pub fn pavilion_base() -> [f32; 4] {
        hex(0x654321, 1.0)
    }
    pub fn skin() -> [f32; 4] {
        hex(0xffd7a8, 1.0)
    }
    pub fn coverage() -> [f32; 4] {
        hex(0x4ade80, 0.2)
    }
    pub fn gap() -> [f32; 4] {
        hex(0xef4420, 0.22)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_size() {
        assert_eq!(std::mem::size_of::<Vertex>(), 28);
    }

    #[test]
    fn test_hex_extremes() {
        assert_eq!(colors::hex(0xffffff, 0.5), [1.0, 1.0, 1.0, 0.5]);
        assert_eq!(colors::hex(0x000000, 1.0), [0.0, 0.0, 0.0, 1.0]);
    }
}
