//! # Render2d — Batched Sprite Rendering
//!
//! A 2D sprite renderer turns a stream of "draw this texture region here"
//! requests into as few GPU draw calls as possible. Every sprite is a *quad*
//! (four vertices, two triangles). Quads that sample the same texture can
//! share one vertex buffer and one `draw_indexed` call, so the renderer
//! groups them by texture.
//!
//! ## Architecture
//!
//! ```text
//!   game code
//!     │ draw_sprite / draw_sprite_source / draw_string   (any order)
//!     ▼
//!   ┌───────────────────────────────────────────────┐
//!   │ SpriteRenderer                                │
//!   │   BatchRegistry: TextureHandle → [batch, ..]  │
//!   │     append quad to the *last* batch of that   │
//!   │     texture, start a new batch when full      │
//!   └──────────────────────┬────────────────────────┘
//!                          │ end_frame
//!                          ▼
//!   ┌───────────────────────────────────────────────┐
//!   │ for each texture (first-use order)            │
//!   │   for each non-empty batch                    │
//!   │     buffer = pool.pop() or backend.create()   │
//!   │     backend.write(buffer, vertices)           │
//!   │     backend.draw_batch(texture, 6 × count)    │
//!   │ backend.submit(); pool ← all used buffers     │
//!   └───────────────────────────────────────────────┘
//! ```
//!
//! ## Design Decisions
//!
//! **Deferred, per-texture grouping.** Nothing reaches the GPU until
//! [`SpriteRenderer::end_frame`]. Sprites of one texture drawn at different
//! points of the frame still land in the same batch, as long as it has room.
//! The price is that global draw order is only preserved *within* a texture.
//! Layering across textures follows first-use order.
//!
//! **Fixed batch capacity.** Each batch holds at most
//! `max_sprites_per_batch` quads, matching the static index buffer the
//! backend allocates once. Overflow is never an error. It opens another
//! batch.
//!
//! **Buffer pooling.** GPU vertex buffers are checked out of a pool at flush
//! time and all returned together after submission. A buffer is never reused
//! within a frame. The pool only grows, so once a frame's batch count is
//! stable no new buffers are allocated.
//!
//! **Backend seam.** [`SpriteRenderer`] is generic over [`SpriteBackend`]. The
//! wgpu implementation lives in [`wgpu_backend`]. Tests drive the renderer
//! with an in-memory recorder.

pub mod backend;
pub(crate) mod batch;
pub mod camera;
pub mod font;
pub(crate) mod pipeline;
pub mod renderer;
pub mod texture;
pub mod vertex;
pub mod wgpu_backend;

pub use backend::{SpriteBackend, TextureSource, VertexBufferId};
pub use camera::Camera;
pub use font::{GlyphQuad, Quad, SpriteFont, SpriteFontChar, TextLayout};
pub use renderer::{DrawParams, FrameStats, SpriteRenderer};
pub use texture::{Texture, TextureHandle};
pub use vertex::SpriteVertex;
pub use wgpu_backend::WgpuBackend;

use crate::math::Rect;

/// An RGB tint with floating-point components in [0, 1].
///
/// There is no alpha: the vertex format carries three color floats and
/// transparency comes from the texture itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub(crate) fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A read-only sprite template: a texture plus where to draw it and which
/// pixels of the texture to sample.
///
/// Templates live in the [`Content`](crate::content::Content) registry.
/// Entities copy `draw_rect`/`source_rect` into their own state to move or
/// animate them.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub texture: Texture,
    /// Default on-screen placement and size.
    pub draw_rect: Rect,
    /// Region of the texture, in texture pixels.
    pub source_rect: Rect,
}

impl Sprite {
    pub fn new(texture: Texture, draw_rect: Rect, source_rect: Rect) -> Self {
        Self {
            texture,
            draw_rect,
            source_rect,
        }
    }

    /// A sprite covering the whole texture at its native size.
    pub fn from_texture(texture: Texture) -> Self {
        let rect = Rect::from_size(texture.width() as f32, texture.height() as f32);
        Self::new(texture, rect, rect)
    }
}
