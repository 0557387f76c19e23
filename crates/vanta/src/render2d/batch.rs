//! # Batch — Group Quads by Texture
//!
//! This module is the CPU-side heart of the 2D renderer. During a frame it
//! collects sprite quads into *batches*. A batch is a fixed-capacity run of
//! quads that all sample the same texture and is later drawn with one
//! `draw_indexed` call.
//!
//! ## The Registry
//!
//! Batches are stored per texture in an arena indexed by
//! [`TextureHandle`]. Handles are small dense integers, so lookup is a `Vec`
//! index on the hot path, not a string hash.
//!
//! ```text
//! slots[handle]
//!   [0] white   → [ ]                      (untouched this frame)
//!   [1] sheet   → [ batch(1000, full), batch(12) ]
//!   [2] font    → [ batch(37) ]
//! order = [1, 2]   (first use this frame)
//! ```
//!
//! Appending a quad finds the texture's slot and writes into its *last*
//! batch. If that batch is full (or the slot has none yet) a new one is
//! started. An interleaved draw of another texture never closes a batch, so
//! `A B A` with room to spare produces two batches, not three.
//!
//! ## Recycling
//!
//! Batches are emptied at the start of each frame and parked on a spare
//! list, so their vertex `Vec`s keep their allocation across frames.

use crate::math::{Rect, Vec2, rotate_about};

use super::Color;
use super::font::Quad;
use super::texture::{Texture, TextureHandle};
use super::vertex::{SpriteVertex, VERTICES_PER_SPRITE};

/// One unit of GPU work: up to `capacity` quads sharing a texture.
#[derive(Debug)]
pub(crate) struct BatchDrawCall {
    vertices: Vec<SpriteVertex>,
    capacity: usize,
}

impl BatchDrawCall {
    pub fn new(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity * VERTICES_PER_SPRITE),
            capacity,
        }
    }

    /// Number of quads written so far.
    pub fn instance_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_SPRITE
    }

    pub fn is_full(&self) -> bool {
        self.instance_count() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    fn push_quad(&mut self, quad: [SpriteVertex; 4]) {
        debug_assert!(!self.is_full(), "quad pushed into a full batch");
        self.vertices.extend_from_slice(&quad);
    }

    fn clear(&mut self) {
        self.vertices.clear();
    }
}

#[derive(Default)]
struct TextureBatches {
    /// Set on first use in the current frame, cleared on reset.
    texture: Option<Texture>,
    batches: Vec<BatchDrawCall>,
}

/// Per-texture batch lists for the current frame.
pub(crate) struct BatchRegistry {
    capacity: usize,
    slots: Vec<TextureBatches>,
    order: Vec<TextureHandle>,
    spare: Vec<BatchDrawCall>,
}

impl BatchRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::new(),
            order: Vec::new(),
            spare: Vec::new(),
        }
    }

    /// Empty every batch touched this frame and park it for reuse.
    pub fn reset(&mut self) {
        for handle in self.order.drain(..) {
            let slot = &mut self.slots[handle.0];
            slot.texture = None;
            for mut batch in slot.batches.drain(..) {
                batch.clear();
                self.spare.push(batch);
            }
        }
    }

    /// Append one quad to the last open batch of `texture`.
    pub fn append(&mut self, texture: &Texture, quad: [SpriteVertex; 4]) {
        let index = texture.handle().index();
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, TextureBatches::default);
        }

        let slot = &mut self.slots[index];
        if slot.texture.is_none() {
            slot.texture = Some(texture.clone());
            self.order.push(texture.handle());
        }

        if slot.batches.last().is_none_or(BatchDrawCall::is_full) {
            let batch = self
                .spare
                .pop()
                .unwrap_or_else(|| BatchDrawCall::new(self.capacity));
            slot.batches.push(batch);
        }

        if let Some(batch) = slot.batches.last_mut() {
            batch.push_quad(quad);
        }
    }

    /// Every batch of the frame: textures in first-use order, batches in
    /// creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&Texture, &BatchDrawCall)> {
        self.order.iter().flat_map(move |handle| {
            let slot = &self.slots[handle.0];
            slot.texture
                .iter()
                .flat_map(move |texture| slot.batches.iter().map(move |batch| (texture, batch)))
        })
    }

    #[cfg(test)]
    pub fn batches_for(&self, handle: TextureHandle) -> &[BatchDrawCall] {
        self.slots
            .get(handle.0)
            .map(|slot| slot.batches.as_slice())
            .unwrap_or(&[])
    }

    pub fn batch_count(&self) -> usize {
        self.iter().count()
    }

    pub fn sprite_count(&self) -> usize {
        self.iter().map(|(_, batch)| batch.instance_count()).sum()
    }

    pub fn texture_count(&self) -> usize {
        self.order.len()
    }
}

/// UVs covering the whole texture, corner order TL, TR, BR, BL.
pub(crate) const FULL_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// UVs for a pixel-space region of `texture`. V grows downward, matching
/// wgpu's top-left texture origin. Regions outside the texture are not
/// clamped.
pub(crate) fn source_uvs(texture: &Texture, source: &Rect) -> [Vec2; 4] {
    Quad::from_pixel_rect(texture, source).corners()
}

/// Build the four vertices of a quad covering `rect`.
///
/// A non-zero `rotation` (radians, clockwise on screen) turns the corners
/// around the rect's top-left corner, or around
/// `top_left + anchor × (width, height)` when an anchor is given, so
/// `(0.5, 0.5)` spins in place.
pub(crate) fn build_quad(
    rect: &Rect,
    uvs: [Vec2; 4],
    color: Color,
    rotation: f32,
    anchor: Option<Vec2>,
) -> [SpriteVertex; 4] {
    let mut corners = rect.corners();

    if rotation != 0.0 {
        let origin = match anchor {
            Some(anchor) => corners[0] + anchor * rect.size(),
            None => corners[0],
        };
        for corner in &mut corners {
            *corner = rotate_about(*corner, origin, rotation);
        }
    }

    let color = color.to_array();
    std::array::from_fn(|i| SpriteVertex {
        position: corners[i].to_array(),
        uv: uvs[i].to_array(),
        color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tex(index: usize, w: u32, h: u32) -> Texture {
        Texture::new(TextureHandle::new(index), format!("tex{index}"), w, h)
    }

    fn quad() -> [SpriteVertex; 4] {
        build_quad(&Rect::new(0.0, 0.0, 1.0, 1.0), FULL_UVS, Color::WHITE, 0.0, None)
    }

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn batch_count_is_ceil_of_capacity() {
        let capacity = 10;
        for n in [1usize, 9, 10, 11, 20, 25, 100] {
            let mut reg = BatchRegistry::new(capacity);
            let t = tex(0, 8, 8);
            for _ in 0..n {
                reg.append(&t, quad());
            }
            let batches = reg.batches_for(t.handle());
            assert_eq!(batches.len(), n.div_ceil(capacity), "n={n}");
            let expected_last = if n % capacity == 0 { capacity } else { n % capacity };
            assert_eq!(batches.last().unwrap().instance_count(), expected_last, "n={n}");
            assert!(batches.iter().all(|b| b.instance_count() <= capacity));
        }
    }

    #[test]
    fn interleaved_texture_does_not_close_batch() {
        let mut reg = BatchRegistry::new(10);
        let (a, b) = (tex(0, 8, 8), tex(1, 8, 8));
        reg.append(&a, quad());
        reg.append(&b, quad());
        reg.append(&a, quad());
        assert_eq!(reg.batches_for(a.handle()).len(), 1);
        assert_eq!(reg.batches_for(a.handle())[0].instance_count(), 2);
        assert_eq!(reg.batch_count(), 2);
        assert_eq!(reg.texture_count(), 2);
    }

    #[test]
    fn iteration_follows_first_use() {
        let mut reg = BatchRegistry::new(10);
        let (a, b, c) = (tex(5, 8, 8), tex(1, 8, 8), tex(3, 8, 8));
        reg.append(&a, quad());
        reg.append(&b, quad());
        reg.append(&c, quad());
        reg.append(&b, quad());
        let order: Vec<usize> = reg.iter().map(|(t, _)| t.handle().index()).collect();
        assert_eq!(order, vec![5, 1, 3]);
        assert_eq!(reg.sprite_count(), 4);
    }

    #[test]
    fn reset_recycles_batches() {
        let mut reg = BatchRegistry::new(4);
        let t = tex(0, 8, 8);
        for _ in 0..9 {
            reg.append(&t, quad());
        }
        assert_eq!(reg.batch_count(), 3);
        reg.reset();
        assert_eq!(reg.batch_count(), 0);
        assert_eq!(reg.texture_count(), 0);
        assert_eq!(reg.spare.len(), 3);

        reg.append(&t, quad());
        assert_eq!(reg.spare.len(), 2);
        assert_eq!(reg.batches_for(t.handle())[0].instance_count(), 1);
    }

    #[test]
    fn full_source_rect_matches_full_uvs() {
        let t = tex(0, 64, 32);
        let uvs = source_uvs(&t, &Rect::new(0.0, 0.0, 64.0, 32.0));
        assert_eq!(uvs, FULL_UVS);
    }

    #[test]
    fn sub_region_uvs() {
        let t = tex(0, 64, 64);
        let uvs = source_uvs(&t, &Rect::new(32.0, 0.0, 16.0, 16.0));
        assert_eq!(uvs[0], Vec2::new(0.5, 0.0));
        assert_eq!(uvs[1], Vec2::new(0.75, 0.0));
        assert_eq!(uvs[2], Vec2::new(0.75, 0.25));
        assert_eq!(uvs[3], Vec2::new(0.5, 0.25));
    }

    #[test]
    fn out_of_bounds_source_is_not_clamped() {
        let t = tex(0, 10, 10);
        let uvs = source_uvs(&t, &Rect::new(5.0, 5.0, 10.0, 10.0));
        assert_eq!(uvs[2], Vec2::new(1.5, 1.5));
    }

    #[test]
    fn unrotated_quad_corners_and_color() {
        let q = build_quad(
            &Rect::new(10.0, 20.0, 30.0, 40.0),
            FULL_UVS,
            Color::rgb(0.1, 0.2, 0.3),
            0.0,
            None,
        );
        assert_eq!(q[0].position, [10.0, 20.0]);
        assert_eq!(q[1].position, [40.0, 20.0]);
        assert_eq!(q[2].position, [40.0, 60.0]);
        assert_eq!(q[3].position, [10.0, 60.0]);
        assert_eq!(q[2].uv, [1.0, 1.0]);
        assert!(q.iter().all(|v| v.color == [0.1, 0.2, 0.3]));
    }

    #[test]
    fn rotation_defaults_to_top_left_pivot() {
        let rect = Rect::new(10.0, 10.0, 20.0, 10.0);
        let q = build_quad(&rect, FULL_UVS, Color::WHITE, std::f32::consts::FRAC_PI_2, None);
        assert!(close(q[0].position, [10.0, 10.0]));
        // top-right swings down below the pivot
        assert!(close(q[1].position, [10.0, 30.0]), "{:?}", q[1].position);
    }

    #[test]
    fn anchor_scales_by_width_and_height() {
        // Non-square rect so a width/height mixup would move the pivot.
        let rect = Rect::new(0.0, 0.0, 40.0, 10.0);
        let q = build_quad(
            &rect,
            FULL_UVS,
            Color::WHITE,
            std::f32::consts::PI,
            Some(Vec2::new(0.5, 0.5)),
        );
        // Half a turn about the center (20, 5) swaps opposite corners.
        assert!(close(q[0].position, [40.0, 10.0]), "{:?}", q[0].position);
        assert!(close(q[2].position, [0.0, 0.0]), "{:?}", q[2].position);
    }
}
