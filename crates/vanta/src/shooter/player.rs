use crate::input::{Input, KeyCode};
use crate::math::{CircleCollider, Rect, Vec2};
use crate::render2d::{Sprite, SpriteBackend, SpriteRenderer};

/// Pixels per second, diagonals included.
pub const PLAYER_SPEED: f32 = 250.0;

/// The arrow-key controlled ship.
#[derive(Debug, Clone)]
pub struct Player {
    sprite: Sprite,
    rect: Rect,
    collider: CircleCollider,
}

impl Player {
    /// Place the ship centered near the bottom of `bounds`.
    pub fn new(sprite: &Sprite, bounds: Vec2) -> Self {
        let size = sprite.draw_rect.size();
        let rect = Rect::new(
            (bounds.x - size.x) * 0.5,
            bounds.y - size.y * 2.0,
            size.x,
            size.y,
        );
        Self {
            sprite: sprite.clone(),
            rect,
            collider: CircleCollider::from_rect(&rect),
        }
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn collider(&self) -> &CircleCollider {
        &self.collider
    }

    /// Move by the arrow keys and stay fully inside `bounds`.
    pub fn update(&mut self, dt: f32, input: &Input, bounds: Vec2) {
        let direction = Vec2::new(
            input.axis(KeyCode::ArrowLeft, KeyCode::ArrowRight),
            input.axis(KeyCode::ArrowUp, KeyCode::ArrowDown),
        )
        .normalize_or_zero();

        let step = direction * PLAYER_SPEED * dt;
        self.rect.x = (self.rect.x + step.x).clamp(0.0, (bounds.x - self.rect.width).max(0.0));
        self.rect.y = (self.rect.y + step.y).clamp(0.0, (bounds.y - self.rect.height).max(0.0));
        self.collider.update(&self.rect);
    }

    pub fn draw<B: SpriteBackend>(&self, renderer: &mut SpriteRenderer<B>) {
        renderer.draw_sprite_source(&self.sprite.texture, self.rect, self.sprite.source_rect);
    }
}
