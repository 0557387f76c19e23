//! # Renderer — The Per-Frame Sprite Batcher
//!
//! [`SpriteRenderer`] is what game code draws through. A frame is always
//! bracketed:
//!
//! ```text
//! begin_frame()          reset batches, recompute camera, upload transform
//!   draw_sprite(..)      ┐
//!   draw_sprite_source() ├─ append quads to per-texture batches (CPU only)
//!   draw_string(..)      ┘
//! end_frame()            one draw call per batch, submit, recycle buffers
//! ```
//!
//! Drawing outside the bracket is a programmer error and panics. Calling
//! `end_frame` twice returns [`RenderError::FrameNotActive`].
//!
//! The renderer is generic over [`SpriteBackend`], so everything here runs
//! the same against wgpu or against an in-memory recorder.

use serde::Serialize;

use crate::error::{ConfigError, RenderError};
use crate::math::{Rect, Vec2};

use super::backend::{BufferPool, SpriteBackend};
use super::batch::{BatchRegistry, FULL_UVS, build_quad, source_uvs};
use super::camera::Camera;
use super::font::SpriteFont;
use super::texture::Texture;
use super::vertex::INDICES_PER_SPRITE;
use super::{Color, Sprite};

/// Optional per-draw parameters.
///
/// ```ignore
/// renderer.draw_sprite_with(&ship, rect, DrawParams::new()
///     .color(Color::RED)
///     .rotation(angle)
///     .rotation_anchor(Vec2::splat(0.5)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    pub color: Color,
    /// Radians, clockwise on screen.
    pub rotation: f32,
    /// Pivot as a fraction of the rect's size, measured from its top-left
    /// corner. `None` pivots on the top-left corner itself.
    pub rotation_anchor: Option<Vec2>,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            rotation: 0.0,
            rotation_anchor: None,
        }
    }
}

impl DrawParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    pub fn rotation_anchor(mut self, anchor: Vec2) -> Self {
        self.rotation_anchor = Some(anchor);
        self
    }
}

/// What one frame cost. Returned by [`SpriteRenderer::end_frame`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameStats {
    /// Quads drawn, glyphs included.
    pub sprites: usize,
    pub batches: usize,
    pub draw_calls: usize,
    /// Indices submitted across all draw calls.
    pub indices: usize,
    /// Vertex buffers allocated since the renderer was created.
    pub buffers_allocated: usize,
    /// Vertex buffers idle in the pool after this frame.
    pub buffers_pooled: usize,
    /// Characters dropped because the font had no glyph for them.
    pub glyphs_skipped: usize,
}

/// Batching sprite renderer.
pub struct SpriteRenderer<B: SpriteBackend> {
    backend: B,
    camera: Camera,
    batches: BatchRegistry,
    pool: BufferPool,
    max_sprites_per_batch: usize,
    frame_active: bool,
    glyphs_skipped: usize,
}

impl<B: SpriteBackend> SpriteRenderer<B> {
    /// Create a renderer drawing into a `width × height` pixel space.
    ///
    /// Batch capacity comes from [`SpriteBackend::max_sprites_per_batch`].
    /// A backend reporting zero is rejected.
    pub fn new(backend: B, width: u32, height: u32) -> Result<Self, ConfigError> {
        let max_sprites_per_batch = backend.max_sprites_per_batch();
        if max_sprites_per_batch == 0 {
            return Err(ConfigError::Invalid(
                "backend reports a batch capacity of 0 sprites".into(),
            ));
        }
        log::debug!("sprite renderer: {width}x{height}, {max_sprites_per_batch} sprites per batch");
        Ok(Self {
            backend,
            camera: Camera::new(width, height),
            batches: BatchRegistry::new(max_sprites_per_batch),
            pool: BufferPool::new(),
            max_sprites_per_batch,
            frame_active: false,
            glyphs_skipped: 0,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// New viewport size. Takes effect at the next `begin_frame`.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    pub fn max_sprites_per_batch(&self) -> usize {
        self.max_sprites_per_batch
    }

    pub fn is_frame_active(&self) -> bool {
        self.frame_active
    }

    /// Start a frame: clear last frame's batches and upload the camera.
    pub fn begin_frame(&mut self) {
        if self.frame_active {
            log::warn!("begin_frame while a frame is open, discarding its sprites");
        }
        self.batches.reset();
        self.glyphs_skipped = 0;
        self.camera.update();
        self.backend.write_transform(&self.camera.projection_view());
        self.frame_active = true;
    }

    /// Draw the whole of `texture` stretched over `rect`.
    pub fn draw_sprite(&mut self, texture: &Texture, rect: Rect) {
        self.draw_sprite_with(texture, rect, DrawParams::default());
    }

    pub fn draw_sprite_with(&mut self, texture: &Texture, rect: Rect, params: DrawParams) {
        self.assert_frame_active("draw_sprite");
        let quad = build_quad(
            &rect,
            FULL_UVS,
            params.color,
            params.rotation,
            params.rotation_anchor,
        );
        self.batches.append(texture, quad);
    }

    /// Draw the `source_rect` region (texture pixels) of `texture` into
    /// `rect`.
    pub fn draw_sprite_source(&mut self, texture: &Texture, rect: Rect, source_rect: Rect) {
        self.draw_sprite_source_with(texture, rect, source_rect, DrawParams::default());
    }

    pub fn draw_sprite_source_with(
        &mut self,
        texture: &Texture,
        rect: Rect,
        source_rect: Rect,
        params: DrawParams,
    ) {
        self.assert_frame_active("draw_sprite_source");
        let quad = build_quad(
            &rect,
            source_uvs(texture, &source_rect),
            params.color,
            params.rotation,
            params.rotation_anchor,
        );
        self.batches.append(texture, quad);
    }

    /// Draw a sprite template at its own `draw_rect`.
    pub fn draw(&mut self, sprite: &Sprite) {
        self.draw_sprite_source(&sprite.texture, sprite.draw_rect, sprite.source_rect);
    }

    /// Draw `text` in white at scale 1.
    pub fn draw_string(&mut self, font: &SpriteFont, text: &str, position: Vec2) {
        self.draw_string_with(font, text, position, Color::WHITE, 1.0);
    }

    /// Draw `text` starting at `position` (top-left of the line).
    pub fn draw_string_with(
        &mut self,
        font: &SpriteFont,
        text: &str,
        position: Vec2,
        color: Color,
        scale: f32,
    ) {
        self.assert_frame_active("draw_string");
        let mut layout = font.layout(text, position, scale);
        for glyph in layout.by_ref() {
            let quad = build_quad(&glyph.rect, glyph.uv.corners(), color, 0.0, None);
            self.batches.append(font.texture(), quad);
        }
        self.glyphs_skipped += layout.skipped();
    }

    /// Flush every batch to the backend and submit the frame.
    ///
    /// Vertex buffers go back to the pool even when submission fails.
    pub fn end_frame(&mut self) -> Result<FrameStats, RenderError> {
        if !self.frame_active {
            return Err(RenderError::FrameNotActive);
        }
        self.frame_active = false;

        let mut stats = FrameStats::default();
        for (texture, batch) in self.batches.iter() {
            if batch.is_empty() {
                continue;
            }
            let buffer = self
                .pool
                .acquire(&mut self.backend, self.max_sprites_per_batch);
            self.backend.write_vertex_buffer(buffer, batch.vertices());

            let index_count = batch.instance_count() * INDICES_PER_SPRITE;
            self.backend.draw_batch(texture, buffer, index_count as u32);

            stats.draw_calls += 1;
            stats.indices += index_count;
        }
        stats.sprites = self.batches.sprite_count();
        stats.batches = self.batches.batch_count();

        let submitted = self.backend.submit();
        self.pool.release_frame();

        stats.buffers_allocated = self.pool.allocated();
        stats.buffers_pooled = self.pool.available();
        stats.glyphs_skipped = self.glyphs_skipped;

        if stats.sprites == 0 {
            log::debug!("frame ended with nothing drawn");
        }
        log::debug!(
            "frame: {} sprites in {} batches across {} textures, {} buffers allocated",
            stats.sprites,
            stats.batches,
            self.batches.texture_count(),
            stats.buffers_allocated
        );

        submitted.map(|()| stats)
    }

    fn assert_frame_active(&self, op: &str) {
        assert!(
            self.frame_active,
            "{op} called outside begin_frame/end_frame"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render2d::backend::recording::RecordingBackend;
    use crate::render2d::texture::TextureHandle;

    fn renderer(capacity: usize) -> SpriteRenderer<RecordingBackend> {
        SpriteRenderer::new(RecordingBackend::with_capacity(capacity), 800, 600).unwrap()
    }

    fn tex(index: usize) -> Texture {
        Texture::new(TextureHandle::new(index), format!("t{index}.png"), 64, 64)
    }

    fn rect() -> Rect {
        Rect::new(10.0, 10.0, 32.0, 32.0)
    }

    #[test]
    fn batch_count_follows_capacity() {
        for n in [1usize, 7, 10, 11, 30, 31] {
            let mut r = renderer(10);
            let t = tex(0);
            r.begin_frame();
            for _ in 0..n {
                r.draw_sprite(&t, rect());
            }
            let stats = r.end_frame().unwrap();

            let calls = r.backend().last_frame();
            assert_eq!(calls.len(), n.div_ceil(10), "n={n}");
            let expected_last = if n % 10 == 0 { 10 } else { n % 10 };
            assert_eq!(calls.last().unwrap().index_count as usize, 6 * expected_last);
            assert!(calls.iter().all(|c| c.index_count <= 60));
            assert_eq!(stats.sprites, n);
        }
    }

    #[test]
    fn interleaved_textures_cover_every_sprite() {
        let mut r = renderer(8);
        let textures = [tex(0), tex(1), tex(2)];
        let mut seed = 12345u32;
        let mut drawn = 0;

        r.begin_frame();
        for _ in 0..200 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12345);
            let t = &textures[(seed >> 16) as usize % textures.len()];
            r.draw_sprite(t, rect());
            drawn += 1;
        }
        let stats = r.end_frame().unwrap();

        let calls = r.backend().last_frame();
        assert_eq!(calls.len(), stats.batches);
        assert_eq!(stats.draw_calls, stats.batches);
        let total: u32 = calls.iter().map(|c| c.index_count).sum();
        assert_eq!(total as usize, 6 * drawn);
        assert_eq!(stats.indices, 6 * drawn);
        assert!(calls.iter().all(|c| c.index_count > 0));
    }

    #[test]
    fn buffer_allocation_stabilizes() {
        let mut r = renderer(10);
        let (a, b) = (tex(0), tex(1));
        let mut allocated = Vec::new();
        for _ in 0..6 {
            r.begin_frame();
            for i in 0..45 {
                r.draw_sprite(if i % 3 == 0 { &a } else { &b }, rect());
            }
            allocated.push(r.end_frame().unwrap().buffers_allocated);
        }
        assert!(allocated.iter().all(|&n| n == allocated[0]), "{allocated:?}");
        assert_eq!(r.backend().buffers.len(), allocated[0]);
    }

    #[test]
    fn buffers_are_not_shared_within_a_frame() {
        let mut r = renderer(2);
        let t = tex(0);
        r.begin_frame();
        for _ in 0..6 {
            r.draw_sprite(&t, rect());
        }
        r.end_frame().unwrap();
        let mut ids: Vec<_> = r.backend().last_frame().iter().map(|c| c.buffer).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn full_batch_then_other_texture_then_one_more() {
        let mut r = renderer(1000);
        let (t1, t2) = (tex(1), tex(2));
        r.begin_frame();
        for _ in 0..1000 {
            r.draw_sprite(&t1, rect());
        }
        r.draw_sprite(&t2, rect());
        r.draw_sprite(&t1, rect());
        let stats = r.end_frame().unwrap();

        let calls = r.backend().last_frame();
        assert_eq!(stats.draw_calls, 3);
        let summary: Vec<_> = calls.iter().map(|c| (c.texture.index(), c.index_count)).collect();
        assert_eq!(summary, vec![(1, 6000), (1, 6), (2, 6)]);
    }

    #[test]
    fn source_region_uvs() {
        let mut r = renderer(10);
        let t = tex(0);
        r.begin_frame();
        r.draw_sprite_source(&t, rect(), Rect::new(32.0, 0.0, 16.0, 16.0));
        r.end_frame().unwrap();

        let v = &r.backend().last_frame()[0].vertices;
        assert_eq!(v[0].uv, [0.5, 0.0]);
        assert_eq!(v[1].uv, [0.75, 0.0]);
        assert_eq!(v[2].uv, [0.75, 0.25]);
        assert_eq!(v[3].uv, [0.5, 0.25]);
    }

    #[test]
    fn full_source_rect_equals_draw_sprite() {
        let mut r = renderer(10);
        let t = tex(0);
        r.begin_frame();
        r.draw_sprite(&t, rect());
        r.draw_sprite_source(&t, rect(), Rect::new(0.0, 0.0, 64.0, 64.0));
        r.end_frame().unwrap();

        let v = &r.backend().last_frame()[0].vertices;
        assert_eq!(v[..4], v[4..8]);
    }

    #[test]
    fn rotation_anchor_spans_rect_height() {
        let mut r = renderer(10);
        let t = tex(0);
        r.begin_frame();
        r.draw_sprite_with(
            &t,
            Rect::new(0.0, 0.0, 40.0, 10.0),
            DrawParams::new()
                .rotation(std::f32::consts::PI)
                .rotation_anchor(Vec2::new(0.5, 0.5)),
        );
        r.end_frame().unwrap();

        let v = &r.backend().last_frame()[0].vertices;
        // pivot (20, 5): the top-left corner lands on the bottom-right
        assert!((v[0].position[0] - 40.0).abs() < 1e-4);
        assert!((v[0].position[1] - 10.0).abs() < 1e-4);
    }

    #[test]
    fn tint_reaches_every_vertex() {
        let mut r = renderer(10);
        r.begin_frame();
        r.draw_sprite_with(&tex(0), rect(), DrawParams::new().color(Color::RED));
        r.end_frame().unwrap();
        assert!(r.backend().last_frame()[0].vertices.iter().all(|v| v.color == [1.0, 0.0, 0.0]));
    }

    #[test]
    fn text_shares_font_texture_batch() {
        let atlas = tex(4);
        let mut font = SpriteFont::new(atlas.clone(), 16.0);
        font.insert_glyph('a', Rect::new(0.0, 0.0, 8.0, 8.0), 9.0, Vec2::ZERO);
        font.insert_glyph('b', Rect::new(8.0, 0.0, 8.0, 8.0), 9.0, Vec2::ZERO);

        let mut r = renderer(10);
        r.begin_frame();
        r.draw_string(&font, "ab?ba", Vec2::new(5.0, 5.0));
        r.draw_sprite(&atlas, rect());
        let stats = r.end_frame().unwrap();

        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.sprites, 5);
        assert_eq!(stats.glyphs_skipped, 1);
        let v = &r.backend().last_frame()[0].vertices;
        assert_eq!(v[0].position, [5.0, 5.0]);
        assert_eq!(v[4].position, [14.0, 5.0]);
    }

    #[test]
    fn skipped_glyphs_reset_each_frame() {
        let font = SpriteFont::new(tex(0), 16.0);
        let mut r = renderer(10);
        r.begin_frame();
        r.draw_string(&font, "xyz", Vec2::ZERO);
        assert_eq!(r.end_frame().unwrap().glyphs_skipped, 3);
        r.begin_frame();
        assert_eq!(r.end_frame().unwrap().glyphs_skipped, 0);
    }

    #[test]
    fn begin_frame_uploads_camera_transform() {
        let mut r = renderer(10);
        r.resize(320, 240);
        r.begin_frame();
        r.end_frame().unwrap();
        assert_eq!(r.backend().transforms.len(), 1);
        assert_eq!(r.backend().transforms[0], r.camera().projection_view());
        assert_eq!(r.camera().size(), (320.0, 240.0));
    }

    #[test]
    fn empty_frame_still_submits() {
        let mut r = renderer(10);
        r.begin_frame();
        let stats = r.end_frame().unwrap();
        assert_eq!(stats, FrameStats::default());
        assert_eq!(r.backend().frames.len(), 1);
        assert!(r.backend().last_frame().is_empty());
    }

    #[test]
    #[should_panic(expected = "outside begin_frame/end_frame")]
    fn drawing_outside_a_frame_panics() {
        let mut r = renderer(10);
        r.draw_sprite(&tex(0), rect());
    }

    #[test]
    fn end_frame_requires_begin_frame() {
        let mut r = renderer(10);
        assert!(matches!(r.end_frame(), Err(RenderError::FrameNotActive)));

        r.begin_frame();
        r.end_frame().unwrap();
        assert!(matches!(r.end_frame(), Err(RenderError::FrameNotActive)));
    }

    #[test]
    fn repeated_begin_frame_discards_open_frame() {
        let mut r = renderer(10);
        r.begin_frame();
        r.draw_sprite(&tex(0), rect());
        r.begin_frame();
        r.draw_sprite(&tex(1), rect());
        let stats = r.end_frame().unwrap();
        assert_eq!(stats.sprites, 1);
        assert_eq!(r.backend().last_frame()[0].texture.index(), 1);
    }

    #[test]
    fn failed_submit_still_recycles_buffers() {
        let mut r = renderer(10);
        let t = tex(0);

        r.begin_frame();
        r.draw_sprite(&t, rect());
        r.backend_mut().fail_next_submit = true;
        assert!(matches!(r.end_frame(), Err(RenderError::Surface(_))));
        assert!(!r.is_frame_active());

        r.begin_frame();
        r.draw_sprite(&t, rect());
        let stats = r.end_frame().unwrap();
        assert_eq!(stats.buffers_allocated, 1);
        assert_eq!(stats.buffers_pooled, 1);
    }

    #[test]
    fn zero_capacity_backend_is_rejected() {
        let result = SpriteRenderer::new(RecordingBackend::with_capacity(0), 800, 600);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn batch_capacity_comes_from_backend() {
        let mut r = renderer(3);
        assert_eq!(r.max_sprites_per_batch(), 3);

        let t = tex(0);
        r.begin_frame();
        for _ in 0..7 {
            r.draw_sprite(&t, rect());
        }
        r.end_frame().unwrap();

        let counts: Vec<_> = r.backend().last_frame().iter().map(|c| c.index_count).collect();
        assert_eq!(counts, vec![18, 18, 6]);
        assert!(r.backend().buffer_capacity.iter().all(|&n| n == 3));
    }

    #[test]
    fn sprite_template_draws_its_own_rects() {
        let sheet = tex(0);
        let sprite = Sprite::new(
            sheet.clone(),
            Rect::new(100.0, 50.0, 16.0, 16.0),
            Rect::new(16.0, 32.0, 16.0, 16.0),
        );

        let mut r = renderer(10);
        r.begin_frame();
        r.draw(&sprite);
        r.draw_sprite_source(&sheet, sprite.draw_rect, sprite.source_rect);
        r.end_frame().unwrap();

        let call = &r.backend().last_frame()[0];
        assert_eq!(call.index_count, 12);
        assert_eq!(call.vertices[0].position, [100.0, 50.0]);
        assert_eq!(call.vertices[0].uv, [0.25, 0.5]);
        assert_eq!(call.vertices[2].uv, [0.5, 0.75]);
        assert_eq!(call.vertices[..4], call.vertices[4..8]);
    }

    #[test]
    fn long_string_splits_across_batches() {
        let atlas = tex(2);
        let mut font = SpriteFont::new(atlas, 8.0);
        font.insert_glyph('x', Rect::new(0.0, 0.0, 8.0, 8.0), 8.0, Vec2::ZERO);

        let mut r = renderer(2);
        r.begin_frame();
        r.draw_string(&font, "xxxxx", Vec2::ZERO);
        let stats = r.end_frame().unwrap();

        let calls = r.backend().last_frame();
        let counts: Vec<_> = calls.iter().map(|c| c.index_count).collect();
        assert_eq!(counts, vec![12, 12, 6]);
        assert_eq!(stats.sprites, 5);
        // the fifth glyph opens the third batch at pen x = 32
        assert_eq!(calls[2].vertices[0].position, [32.0, 0.0]);
    }
}
