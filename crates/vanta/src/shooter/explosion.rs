use crate::math::Rect;
use crate::render2d::{SpriteBackend, SpriteRenderer, Texture};

/// The explosion sheet is a 4×4 grid of 32×32 frames, read row by row.
pub const EXPLOSION_COLUMNS: usize = 4;
pub const EXPLOSION_ROWS: usize = 4;
pub const EXPLOSION_FRAME_SIZE: f32 = 32.0;
/// Seconds per animation frame.
pub const EXPLOSION_FRAME_TIME: f32 = 1.0 / 30.0;

/// One play-through of the explosion animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    rect: Rect,
    frame: usize,
    timer: f32,
}

impl Explosion {
    /// Start playing over `rect`.
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            frame: 0,
            timer: 0.0,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Advance the animation. Returns `false` once the last frame is done.
    pub fn update(&mut self, dt: f32) -> bool {
        self.timer += dt;
        while self.timer >= EXPLOSION_FRAME_TIME {
            self.timer -= EXPLOSION_FRAME_TIME;
            self.frame += 1;
        }
        self.frame < EXPLOSION_COLUMNS * EXPLOSION_ROWS
    }

    /// Region of the sheet for the current frame.
    pub fn source_rect(&self) -> Rect {
        let column = self.frame % EXPLOSION_COLUMNS;
        let row = self.frame / EXPLOSION_COLUMNS;
        Rect::new(
            column as f32 * EXPLOSION_FRAME_SIZE,
            row as f32 * EXPLOSION_FRAME_SIZE,
            EXPLOSION_FRAME_SIZE,
            EXPLOSION_FRAME_SIZE,
        )
    }

    pub fn draw<B: SpriteBackend>(&self, sheet: &Texture, renderer: &mut SpriteRenderer<B>) {
        renderer.draw_sprite_source(sheet, self.rect, self.source_rect());
    }
}
