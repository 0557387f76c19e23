//! # Shooter — A Small Space Shooter
//!
//! Gameplay built on the renderer, the [`Content`] registry and the
//! colliders in [`math`](crate::math). [`Shooter`] owns the whole world and
//! is driven from [`Game::update`](crate::app::Game::update) and
//! [`Game::draw`](crate::app::Game::draw):
//!
//! ```text
//! update(dt, input)
//!   player      arrow keys, clamped to the screen, collider refit
//!   background  two copies of one texture scrolling down
//!   enemies     spawn one meteor per second, fall, spin, collide
//!                 vs bullets → explosion + points, bullet released
//!                 vs player  → explosion
//!                 off the bottom edge → released
//!   explosions  16-frame sheet animation, released when done
//!   bullets     auto-fire every 0.25 s, fly up, released off the top
//!
//! draw(renderer)
//!   background → player → enemies → bullets → explosions → score
//! ```
//!
//! Enemies, bullets and explosions each live in a [`Pool`], so after the
//! first few seconds of play nothing is allocated per frame.

mod bullet;
mod enemy;
mod explosion;
mod player;
mod pool;

pub use bullet::{BULLET_SPEED, Bullet};
pub use enemy::{Enemy, METEOR_SPEED, METEOR_SPIN, Meteor};
pub use explosion::{
    EXPLOSION_COLUMNS, EXPLOSION_FRAME_SIZE, EXPLOSION_FRAME_TIME, EXPLOSION_ROWS, Explosion,
};
pub use player::{PLAYER_SPEED, Player};
pub use pool::Pool;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::content::Content;
use crate::error::ContentError;
use crate::input::Input;
use crate::math::{Rect, Vec2};
use crate::render2d::{Color, Sprite, SpriteBackend, SpriteFont, SpriteRenderer, Texture};

/// Seconds between meteor spawns.
pub const ENEMY_SPAWN_INTERVAL: f32 = 1.0;
/// Seconds between shots.
pub const FIRE_INTERVAL: f32 = 0.25;
/// Background scroll in pixels per second.
pub const BACKGROUND_SCROLL_SPEED: f32 = 250.0;

const SCORE_POSITION: Vec2 = Vec2::new(10.0, 10.0);
const SCORE_SCALE: f32 = 0.5;

/// Everything the shooter draws.
#[derive(Debug, Clone)]
pub struct ShooterAssets {
    pub player: Sprite,
    pub laser: Sprite,
    /// One is picked at random for every spawned meteor.
    pub meteors: Vec<Sprite>,
    /// 4×4 sheet of 32×32 frames.
    pub explosion: Texture,
    pub background: Texture,
    pub font: SpriteFont,
}

impl ShooterAssets {
    pub const PLAYER: &'static str = "playerShip1_blue";
    pub const LASER: &'static str = "laserBlue01";
    pub const METEORS: [&'static str; 12] = [
        "meteorBrown_big1",
        "meteorBrown_big2",
        "meteorBrown_big3",
        "meteorBrown_big4",
        "meteorBrown_med1",
        "meteorBrown_med3",
        "meteorGrey_big1",
        "meteorGrey_big2",
        "meteorGrey_big3",
        "meteorGrey_big4",
        "meteorGrey_med1",
        "meteorGrey_med2",
    ];
    pub const EXPLOSION: &'static str = "explosion";
    pub const BACKGROUND: &'static str = "background";
    pub const FONT: &'static str = "font";

    /// Look every asset up by its conventional name. Meteor sprites missing
    /// from the sheet are skipped, but at least one must be present.
    pub fn from_content(content: &Content) -> Result<Self, ContentError> {
        let sprite = |name: &str| {
            content
                .sprite(name)
                .cloned()
                .ok_or_else(|| ContentError::MissingAsset {
                    kind: "sprite",
                    name: name.to_owned(),
                })
        };
        let texture = |name: &str| {
            content
                .texture(name)
                .cloned()
                .ok_or_else(|| ContentError::UnknownTexture(name.to_owned()))
        };

        let meteors: Vec<Sprite> = Self::METEORS
            .iter()
            .filter_map(|name| content.sprite(name).cloned())
            .collect();
        if meteors.is_empty() {
            return Err(ContentError::MissingAsset {
                kind: "sprite",
                name: Self::METEORS[0].to_owned(),
            });
        }
        if meteors.len() < Self::METEORS.len() {
            log::warn!(
                "only {} of {} meteor sprites found",
                meteors.len(),
                Self::METEORS.len()
            );
        }

        Ok(Self {
            player: sprite(Self::PLAYER)?,
            laser: sprite(Self::LASER)?,
            meteors,
            explosion: texture(Self::EXPLOSION)?,
            background: texture(Self::BACKGROUND)?,
            font: content
                .font(Self::FONT)
                .cloned()
                .ok_or_else(|| ContentError::MissingAsset {
                    kind: "font",
                    name: Self::FONT.to_owned(),
                })?,
        })
    }
}

/// A texture tiled twice vertically, scrolling down forever.
#[derive(Debug, Clone)]
struct Background {
    offset: f32,
}

impl Background {
    fn update(&mut self, dt: f32, height: f32) {
        if height > 0.0 {
            self.offset = (self.offset + BACKGROUND_SCROLL_SPEED * dt) % height;
        }
    }

    fn draw<B: SpriteBackend>(
        &self,
        texture: &Texture,
        bounds: Vec2,
        renderer: &mut SpriteRenderer<B>,
    ) {
        let lower = Rect::new(0.0, self.offset, bounds.x, bounds.y);
        renderer.draw_sprite(texture, lower);
        renderer.draw_sprite(texture, lower.translated(0.0, -bounds.y));
    }
}

/// The game world.
pub struct Shooter {
    assets: ShooterAssets,
    bounds: Vec2,
    player: Player,
    background: Background,
    enemies: Pool<Enemy>,
    bullets: Pool<Bullet>,
    explosions: Pool<Explosion>,
    score: u32,
    spawn_timer: f32,
    fire_cooldown: f32,
    rng: StdRng,
}

impl Shooter {
    /// A fresh game on a `bounds`-sized screen. `seed` drives meteor
    /// placement, speed and spin.
    pub fn new(assets: ShooterAssets, bounds: Vec2, seed: u64) -> Self {
        log::info!(
            "shooter: {}x{}, {} meteor kinds",
            bounds.x,
            bounds.y,
            assets.meteors.len()
        );
        Self {
            player: Player::new(&assets.player, bounds),
            assets,
            bounds,
            background: Background { offset: 0.0 },
            enemies: Pool::new(),
            bullets: Pool::new(),
            explosions: Pool::new(),
            score: 0,
            spawn_timer: 0.0,
            fire_cooldown: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &Pool<Enemy> {
        &self.enemies
    }

    pub fn bullets(&self) -> &Pool<Bullet> {
        &self.bullets
    }

    pub fn explosions(&self) -> &Pool<Explosion> {
        &self.explosions
    }

    /// Add an enemy outside the regular spawn timer.
    pub fn spawn_enemy(&mut self, enemy: Enemy) -> usize {
        self.enemies.insert(enemy)
    }

    /// Advance the world by `dt` seconds.
    pub fn update(&mut self, dt: f32, input: &Input) {
        self.player.update(dt, input, self.bounds);
        self.background.update(dt, self.bounds.y);
        self.update_enemies(dt);
        self.explosions.retain(|explosion| explosion.update(dt));
        self.update_bullets(dt);
    }

    fn update_enemies(&mut self, dt: f32) {
        self.spawn_timer += dt;
        if self.spawn_timer >= ENEMY_SPAWN_INTERVAL {
            self.spawn_timer -= ENEMY_SPAWN_INTERVAL;
            if !self.assets.meteors.is_empty() {
                let kind = self.rng.random_range(0..self.assets.meteors.len());
                let meteor = Meteor::spawn(&self.assets.meteors[kind], self.bounds.x, &mut self.rng);
                self.enemies.insert(Enemy::Meteor(meteor));
            }
        }

        let player = *self.player.collider();
        let height = self.bounds.y;
        self.enemies.retain(|enemy| {
            enemy.update(dt);

            let collider = enemy.collider();
            if self.bullets.release_first(|bullet| bullet.collider().intersects(collider)) {
                self.score += enemy.points();
                self.explosions.insert(Explosion::new(*enemy.rect()));
                return false;
            }
            if collider.intersects(&player) {
                self.explosions.insert(Explosion::new(*enemy.rect()));
                return false;
            }
            enemy.rect().y <= height
        });
    }

    fn update_bullets(&mut self, dt: f32) {
        self.fire_cooldown -= dt;
        if self.fire_cooldown <= 0.0 {
            self.fire_cooldown += FIRE_INTERVAL;
            let bullet = Bullet::fired_from(&self.assets.laser, self.player.rect());
            self.bullets.insert(bullet);
        }
        self.bullets.retain(|bullet| bullet.update(dt));
    }

    pub fn draw<B: SpriteBackend>(&self, renderer: &mut SpriteRenderer<B>) {
        self.background.draw(&self.assets.background, self.bounds, renderer);
        self.player.draw(renderer);
        for enemy in self.enemies.iter() {
            enemy.draw(renderer);
        }
        for bullet in self.bullets.iter() {
            bullet.draw(renderer);
        }
        for explosion in self.explosions.iter() {
            explosion.draw(&self.assets.explosion, renderer);
        }
        renderer.draw_string_with(
            &self.assets.font,
            &format!("Score: {}", self.score),
            SCORE_POSITION,
            Color::WHITE,
            SCORE_SCALE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::render2d::TextureHandle;
    use crate::render2d::backend::recording::RecordingBackend;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn texture(index: usize, width: u32, height: u32) -> Texture {
        Texture::new(TextureHandle::new(index), format!("t{index}"), width, height)
    }

    fn sprite(index: usize, width: f32, height: f32) -> Sprite {
        let rect = Rect::from_size(width, height);
        Sprite::new(texture(index, 256, 256), rect, rect)
    }

    fn assets() -> ShooterAssets {
        let atlas = texture(5, 64, 64);
        let mut font = SpriteFont::new(atlas, 16.0);
        font.insert_glyph('0', Rect::new(0.0, 0.0, 8.0, 8.0), 8.0, Vec2::ZERO);
        font.insert_glyph('1', Rect::new(8.0, 0.0, 8.0, 8.0), 8.0, Vec2::ZERO);
        ShooterAssets {
            player: sprite(0, 32.0, 32.0),
            laser: sprite(1, 4.0, 16.0),
            meteors: vec![sprite(2, 32.0, 32.0)],
            explosion: texture(3, 128, 128),
            background: texture(4, 256, 256),
            font,
        }
    }

    fn still_meteor(shooter: &Shooter, x: f32, y: f32) -> Enemy {
        let meteor = Meteor::new(&shooter.assets.meteors[0], Vec2::new(x, y), 0.0, 0.0);
        Enemy::Meteor(meteor)
    }

    #[test]
    fn player_starts_bottom_center_and_stays_on_screen() {
        let mut shooter = Shooter::new(assets(), BOUNDS, 1);
        assert_eq!(*shooter.player().rect(), Rect::new(384.0, 536.0, 32.0, 32.0));

        let mut input = Input::new();
        input.press(KeyCode::ArrowRight);
        input.press(KeyCode::ArrowDown);
        for _ in 0..100 {
            shooter.update(0.1, &input);
        }
        assert_eq!(*shooter.player().rect(), Rect::new(768.0, 568.0, 32.0, 32.0));
    }

    #[test]
    fn bullet_hit_scores_and_explodes() {
        let mut shooter = Shooter::new(assets(), BOUNDS, 1);
        let input = Input::new();
        // directly above the ship, where its first bullet appears
        let meteor = still_meteor(&shooter, 384.0, 490.0);
        shooter.spawn_enemy(meteor);

        shooter.update(0.01, &input);
        assert_eq!(shooter.bullets().len(), 1);
        assert_eq!(shooter.enemies().len(), 1);

        shooter.update(0.01, &input);
        assert_eq!(shooter.score(), 10);
        assert!(shooter.enemies().is_empty());
        assert!(shooter.bullets().is_empty());
        assert_eq!(shooter.explosions().len(), 1);
    }

    #[test]
    fn ramming_the_player_explodes_without_points() {
        let mut shooter = Shooter::new(assets(), BOUNDS, 1);
        let input = Input::new();
        let meteor = still_meteor(&shooter, 390.0, 540.0);
        shooter.spawn_enemy(meteor);

        shooter.update(0.01, &input);
        assert_eq!(shooter.score(), 0);
        assert!(shooter.enemies().is_empty());
        assert_eq!(shooter.explosions().len(), 1);
    }

    #[test]
    fn explosion_plays_sixteen_frames() {
        let mut explosion = Explosion::new(Rect::new(0.0, 0.0, 32.0, 32.0));
        assert_eq!(explosion.source_rect(), Rect::new(0.0, 0.0, 32.0, 32.0));

        assert!(explosion.update(EXPLOSION_FRAME_TIME * 5.5));
        assert_eq!(explosion.frame(), 5);
        assert_eq!(explosion.source_rect(), Rect::new(32.0, 32.0, 32.0, 32.0));

        assert!(!explosion.update(EXPLOSION_FRAME_TIME * 11.0));
    }

    #[test]
    fn pools_stop_growing_during_play() {
        let mut shooter = Shooter::new(assets(), BOUNDS, 7);
        let input = Input::new();
        for _ in 0..1200 {
            shooter.update(0.05, &input);
        }
        let (enemies, bullets) = (shooter.enemies().capacity(), shooter.bullets().capacity());

        for _ in 0..1200 {
            shooter.update(0.05, &input);
        }
        assert!(enemies <= 15, "enemy slots: {enemies}");
        assert!(bullets <= 5, "bullet slots: {bullets}");
        assert!(shooter.enemies().capacity() <= 15);
        assert!(shooter.bullets().capacity() <= 5);
    }

    #[test]
    fn draw_starts_with_scrolling_background() {
        let mut shooter = Shooter::new(assets(), BOUNDS, 1);
        shooter.update(0.2, &Input::new());

        let mut renderer = SpriteRenderer::new(RecordingBackend::new(), 800, 600).unwrap();
        renderer.begin_frame();
        shooter.draw(&mut renderer);
        let stats = renderer.end_frame().unwrap();

        let calls = renderer.backend().last_frame();
        assert_eq!(calls[0].texture.index(), 4);
        assert_eq!(calls[0].index_count, 12);
        assert_eq!(calls[0].vertices[0].position, [0.0, 50.0]);
        assert_eq!(calls[0].vertices[4].position, [0.0, -550.0]);
        // "Score: 0" has one glyph in the test font
        assert_eq!(stats.glyphs_skipped, 7);
    }

    #[test]
    fn assets_resolve_by_name() {
        let mut backend = RecordingBackend::new();
        let mut builder = Content::builder(&mut backend);
        let sheet = texture(0, 256, 256);
        builder.add_texture("sheet", sheet.clone());
        for name in [ShooterAssets::PLAYER, ShooterAssets::LASER, "meteorGrey_med2"] {
            builder.add_sprite(name, Sprite::from_texture(sheet.clone()));
        }
        builder.add_texture(ShooterAssets::EXPLOSION, texture(1, 128, 128));
        builder.add_texture(ShooterAssets::BACKGROUND, texture(2, 256, 256));

        let missing_font = ShooterAssets::from_content(&builder.finish()).unwrap_err();
        assert_eq!(missing_font.to_string(), "no font named 'font'");
    }
}
