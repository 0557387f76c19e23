//! # Vertex — Per-Corner Data Sent to the GPU
//!
//! Every sprite quad has four vertices, each carrying a pixel-space position,
//! a texture coordinate and an RGB tint. The layout is fixed and shared by
//! every backend:
//!
//! ```text
//! SpriteVertex (28 bytes, 7 floats per vertex)
//! ┌────────────────┬──────────────┬────────────────────────┐
//! │ position       │ uv           │ color                  │
//! │ [f32; 2]       │ [f32; 2]     │ [f32; 3]               │
//! │ offset 0       │ offset 8     │ offset 16              │
//! │ location(0)    │ location(1)  │ location(2)            │
//! └────────────────┴──────────────┴────────────────────────┘
//! ```
//!
//! Vertices of one quad are emitted top-left, top-right, bottom-right,
//! bottom-left. The static index buffer turns each quad into the triangles
//! `(0, 1, 2)` and `(2, 3, 0)`.

use bytemuck::{Pod, Zeroable};

/// Floats per vertex: position.xy, uv.xy, color.rgb.
pub const FLOATS_PER_VERTEX: usize = 7;
pub const VERTICES_PER_SPRITE: usize = 4;
/// Two triangles per sprite.
pub const INDICES_PER_SPRITE: usize = 6;

/// Per-vertex data for sprite quads. Positions are already in pixel space,
/// the shader only applies the camera's projection-view transform.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 3],
}

impl SpriteVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };
}

/// Camera projection-view matrix uploaded as a uniform buffer.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Index data for `max_sprites` quads laid out back to back.
pub fn quad_indices(max_sprites: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(max_sprites * INDICES_PER_SPRITE);
    for i in 0..max_sprites as u32 {
        let base = i * VERTICES_PER_SPRITE as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_seven_floats() {
        assert_eq!(
            std::mem::size_of::<SpriteVertex>(),
            FLOATS_PER_VERTEX * std::mem::size_of::<f32>()
        );
    }

    #[test]
    fn index_pattern_per_quad() {
        let idx = quad_indices(2);
        assert_eq!(idx, vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
    }

    #[test]
    fn indices_in_range() {
        let n = 1000;
        let idx = quad_indices(n);
        assert_eq!(idx.len(), n * INDICES_PER_SPRITE);
        assert!(idx.iter().all(|&i| (i as usize) < n * VERTICES_PER_SPRITE));
    }
}
