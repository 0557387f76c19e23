use crate::math::{CircleCollider, Rect};
use crate::render2d::{Sprite, SpriteBackend, SpriteRenderer};

/// Pixels per second, straight up.
pub const BULLET_SPEED: f32 = 750.0;

#[derive(Debug, Clone)]
pub struct Bullet {
    sprite: Sprite,
    rect: Rect,
    collider: CircleCollider,
}

impl Bullet {
    /// A bullet centered on and just above `ship`.
    pub fn fired_from(sprite: &Sprite, ship: &Rect) -> Self {
        let size = sprite.draw_rect.size();
        let rect = Rect::new(
            ship.x + (ship.width - size.x) * 0.5,
            ship.y - size.y,
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

    /// Fly upward. Returns `false` once the bullet has left the top edge.
    pub fn update(&mut self, dt: f32) -> bool {
        self.rect.y -= BULLET_SPEED * dt;
        self.collider.update(&self.rect);
        self.rect.bottom() >= 0.0
    }

    pub fn draw<B: SpriteBackend>(&self, renderer: &mut SpriteRenderer<B>) {
        renderer.draw_sprite_source(&self.sprite.texture, self.rect, self.sprite.source_rect);
    }
}
