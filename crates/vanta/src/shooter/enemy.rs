//! Enemy kinds.
//!
//! The set of kinds is closed, so [`Enemy`] is an enum and every kind
//! answers the same questions: where it is, what it collides with, how it
//! moves and how it draws.

use std::ops::Range;

use rand::Rng;

use crate::math::{CircleCollider, Rect, Vec2};
use crate::render2d::{DrawParams, Sprite, SpriteBackend, SpriteRenderer};

/// Fall speed range in pixels per second.
pub const METEOR_SPEED: Range<f32> = 50.0..250.0;
/// Spin range in radians per second, either direction.
pub const METEOR_SPIN: Range<f32> = -2.5..2.5;

#[derive(Debug, Clone)]
pub enum Enemy {
    Meteor(Meteor),
}

impl Enemy {
    pub fn rect(&self) -> &Rect {
        match self {
            Enemy::Meteor(m) => &m.rect,
        }
    }

    pub fn collider(&self) -> &CircleCollider {
        match self {
            Enemy::Meteor(m) => &m.collider,
        }
    }

    /// Score for shooting this enemy down.
    pub fn points(&self) -> u32 {
        match self {
            Enemy::Meteor(_) => 10,
        }
    }

    pub fn update(&mut self, dt: f32) {
        match self {
            Enemy::Meteor(m) => m.update(dt),
        }
    }

    pub fn draw<B: SpriteBackend>(&self, renderer: &mut SpriteRenderer<B>) {
        match self {
            Enemy::Meteor(m) => m.draw(renderer),
        }
    }
}

/// A spinning rock falling straight down.
#[derive(Debug, Clone)]
pub struct Meteor {
    sprite: Sprite,
    rect: Rect,
    collider: CircleCollider,
    speed: f32,
    rotation: f32,
    spin: f32,
}

impl Meteor {
    /// A meteor whose top-left corner starts at `position`.
    pub fn new(sprite: &Sprite, position: Vec2, speed: f32, spin: f32) -> Self {
        let size = sprite.draw_rect.size();
        let rect = Rect::new(position.x, position.y, size.x, size.y);
        Self {
            sprite: sprite.clone(),
            rect,
            collider: CircleCollider::from_rect(&rect),
            speed,
            rotation: 0.0,
            spin,
        }
    }

    /// A meteor with random speed and spin, just above the top edge at a
    /// random x inside `width`.
    pub fn spawn(sprite: &Sprite, width: f32, rng: &mut impl Rng) -> Self {
        let size = sprite.draw_rect.size();
        let max_x = (width - size.x).max(0.0);
        let x = if max_x > 0.0 { rng.random_range(0.0..max_x) } else { 0.0 };
        Self::new(
            sprite,
            Vec2::new(x, -size.y),
            rng.random_range(METEOR_SPEED),
            rng.random_range(METEOR_SPIN),
        )
    }

    fn update(&mut self, dt: f32) {
        self.rect.y += self.speed * dt;
        self.rotation += self.spin * dt;
        self.collider.update(&self.rect);
    }

    fn draw<B: SpriteBackend>(&self, renderer: &mut SpriteRenderer<B>) {
        renderer.draw_sprite_source_with(
            &self.sprite.texture,
            self.rect,
            self.sprite.source_rect,
            DrawParams::new()
                .rotation(self.rotation)
                .rotation_anchor(Vec2::splat(0.5)),
        );
    }
}
