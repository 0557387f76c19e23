//! # Font — Bitmap Font Glyph Tables and Text Layout
//!
//! A [`SpriteFont`] is a pre-rendered glyph atlas (one texture) plus a table
//! mapping each character to the atlas region it lives in and the metrics
//! needed to place it. Fonts are usually parsed from BMFont XML by
//! [`Content`](crate::content::Content), but can be assembled by hand with
//! [`SpriteFont::insert_glyph`].
//!
//! ## Layout
//!
//! Text is laid out on a single line, left to right. There is no wrapping,
//! no kerning and no newline handling.
//!
//! ```text
//!  position
//!     ●──────────────────────────────────────────► x
//!     │   offset.y
//!     │   ┌───┐        ┌───┐
//!     │   │ H │        │ i │
//!     │   └───┘        └───┘
//!     │◄─── advance ───►◄── advance ──►
//!     ▼ y
//! ```
//!
//! For each character the glyph quad is placed at
//! `position + (pen_x + offset.x × scale, offset.y × scale)` with size
//! `size × scale`. The pen then moves right by `advance × scale`, so
//! strings stay evenly spaced at any scale.
//!
//! Characters missing from the table are skipped with a warning. The
//! [`TextLayout`] iterator counts them so callers can report it.

use std::collections::HashMap;

use crate::math::{Rect, Vec2};

use super::texture::Texture;

/// Four UV corners of a glyph or sprite region, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quad {
    pub top_left: Vec2,
    pub top_right: Vec2,
    pub bottom_right: Vec2,
    pub bottom_left: Vec2,
}

impl Quad {
    /// Axis-aligned quad spanning `min` to `max`.
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            top_left: min,
            top_right: Vec2::new(max.x, min.y),
            bottom_right: max,
            bottom_left: Vec2::new(min.x, max.y),
        }
    }

    /// Normalize a pixel region of `texture` into UV space.
    pub fn from_pixel_rect(texture: &Texture, region: &Rect) -> Self {
        let size = Vec2::new(texture.width() as f32, texture.height() as f32);
        Self::from_min_max(region.position() / size, (region.position() + region.size()) / size)
    }

    /// Corners in vertex order: TL, TR, BR, BL.
    pub fn corners(&self) -> [Vec2; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }
}

/// Metrics and atlas coordinates for one character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteFontChar {
    pub texture_coords: Quad,
    /// Glyph size in pixels at scale 1.
    pub size: Vec2,
    /// How far the pen moves after this glyph, in pixels at scale 1.
    pub advance: f32,
    /// Offset from the pen position to the glyph's top-left corner.
    pub offset: Vec2,
}

/// A bitmap font: one atlas texture and a glyph table.
#[derive(Debug, Clone)]
pub struct SpriteFont {
    texture: Texture,
    line_height: f32,
    chars: HashMap<char, SpriteFontChar>,
}

impl SpriteFont {
    pub fn new(texture: Texture, line_height: f32) -> Self {
        Self {
            texture,
            line_height,
            chars: HashMap::new(),
        }
    }

    /// Add or replace a glyph.
    pub fn insert_char(&mut self, ch: char, glyph: SpriteFontChar) {
        self.chars.insert(ch, glyph);
    }

    /// Add a glyph from its pixel region in the atlas. UVs are derived from
    /// the atlas size and the glyph size from the region.
    pub fn insert_glyph(&mut self, ch: char, region: Rect, advance: f32, offset: Vec2) {
        let glyph = SpriteFontChar {
            texture_coords: Quad::from_pixel_rect(&self.texture, &region),
            size: region.size(),
            advance,
            offset,
        };
        self.insert_char(ch, glyph);
    }

    pub fn char(&self, ch: char) -> Option<&SpriteFontChar> {
        self.chars.get(&ch)
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Number of glyphs in the table.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Lay out `text` starting at `position`.
    pub fn layout<'a>(&'a self, text: &'a str, position: Vec2, scale: f32) -> TextLayout<'a> {
        TextLayout {
            font: self,
            chars: text.chars(),
            position,
            scale,
            pen_x: 0.0,
            skipped: 0,
        }
    }

    /// Width of `text` as laid out (sum of scaled advances), and the scaled
    /// line height.
    pub fn measure(&self, text: &str, scale: f32) -> Vec2 {
        let width = text
            .chars()
            .filter_map(|ch| self.char(ch))
            .map(|glyph| glyph.advance * scale)
            .sum();
        Vec2::new(width, self.line_height * scale)
    }
}

/// One placed glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub ch: char,
    /// Screen-space rectangle, already scaled.
    pub rect: Rect,
    pub uv: Quad,
    /// Pen position relative to the layout origin after this glyph.
    pub pen_x: f32,
}

/// Iterator over the glyph quads of a string. See [`SpriteFont::layout`].
#[derive(Debug, Clone)]
pub struct TextLayout<'a> {
    font: &'a SpriteFont,
    chars: std::str::Chars<'a>,
    position: Vec2,
    scale: f32,
    pen_x: f32,
    skipped: usize,
}

impl TextLayout<'_> {
    /// Characters skipped so far because the font has no glyph for them.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for TextLayout<'_> {
    type Item = GlyphQuad;

    fn next(&mut self) -> Option<GlyphQuad> {
        loop {
            let ch = self.chars.next()?;
            let Some(glyph) = self.font.char(ch) else {
                log::warn!(
                    "font '{}' has no glyph for {ch:?}, skipping",
                    self.font.texture.key()
                );
                self.skipped += 1;
                continue;
            };

            let rect = Rect::new(
                self.position.x + self.pen_x + glyph.offset.x * self.scale,
                self.position.y + glyph.offset.y * self.scale,
                glyph.size.x * self.scale,
                glyph.size.y * self.scale,
            );
            self.pen_x += glyph.advance * self.scale;

            return Some(GlyphQuad {
                ch,
                rect,
                uv: glyph.texture_coords,
                pen_x: self.pen_x,
            });
        }
    }
}
