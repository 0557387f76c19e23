//! Starfield — thousands of tinted stars, a spinning ship and a sprite
//! counter, all from textures generated at startup.
//!
//! Run with `RUST_LOG=vanta=debug cargo run --example starfield` to see the
//! per-frame batch statistics.

use rand::Rng;
use rand::rngs::ThreadRng;
use vanta::prelude::*;

const STAR_COUNT: usize = 2500;
const STAR_SIZE: u32 = 8;
const SHIP_SIZE: u32 = 32;

/// 3×5 digit glyphs, one row per string.
const DIGITS: [[&str; 5]; 10] = [
    ["###", "#.#", "#.#", "#.#", "###"],
    [".#.", "##.", ".#.", ".#.", "###"],
    ["###", "..#", "###", "#..", "###"],
    ["###", "..#", "###", "..#", "###"],
    ["#.#", "#.#", "###", "..#", "..#"],
    ["###", "#..", "###", "..#", "###"],
    ["###", "#..", "###", "#.#", "###"],
    ["###", "..#", "..#", "..#", "..#"],
    ["###", "#.#", "###", "#.#", "###"],
    ["###", "#.#", "###", "..#", "###"],
];
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;
const GLYPH_STRIDE: u32 = GLYPH_W + 1;

struct Star {
    rect: Rect,
    speed: f32,
    color: Color,
}

struct Starfield {
    content: Option<Content>,
    stars: Vec<Star>,
    ship_angle: f32,
    rng: ThreadRng,
    last_stats: FrameStats,
}

impl Starfield {
    fn new() -> Self {
        Self {
            content: None,
            stars: Vec::new(),
            ship_angle: 0.0,
            rng: rand::rng(),
            last_stats: FrameStats::default(),
        }
    }
}

impl Game for Starfield {
    fn setup(&mut self, backend: &mut WgpuBackend) -> Result<(), ContentError> {
        let mut builder = Content::builder(backend);
        builder.add_rgba_texture("star", STAR_SIZE, STAR_SIZE, &star_pixels())?;
        builder.add_rgba_texture("ship", SHIP_SIZE, SHIP_SIZE, &ship_pixels())?;
        let atlas = builder.add_rgba_texture(
            "digits",
            GLYPH_STRIDE * DIGITS.len() as u32,
            GLYPH_H,
            &digit_atlas(),
        )?;
        builder.insert_font("digits", digit_font(atlas));
        self.content = Some(builder.finish());

        for _ in 0..STAR_COUNT {
            let size = self.rng.random_range(1.0..5.0);
            let rect = Rect::new(
                self.rng.random_range(0.0..800.0),
                self.rng.random_range(0.0..600.0),
                size,
                size,
            );
            let warmth: f32 = self.rng.random();
            let star = Star {
                rect,
                speed: 20.0 + size * 30.0,
                color: Color::rgb(1.0, 0.8 + warmth * 0.2, 0.6 + (1.0 - warmth) * 0.4),
            };
            self.stars.push(star);
        }
        Ok(())
    }

    fn update(&mut self, time: &Time, _input: &Input) {
        let dt = time.delta_secs();
        for star in &mut self.stars {
            star.rect.y += star.speed * dt;
            if star.rect.y > 600.0 {
                star.rect.y -= 600.0 + star.rect.height;
            }
        }
        self.ship_angle += dt;
    }

    fn draw(&mut self, renderer: &mut SpriteRenderer<WgpuBackend>) {
        let Some(content) = &self.content else {
            return;
        };
        let (Some(star), Some(ship), Some(font)) = (
            content.texture("star"),
            content.texture("ship"),
            content.font("digits"),
        ) else {
            return;
        };

        for s in &self.stars {
            renderer.draw_sprite_with(star, s.rect, DrawParams::new().color(s.color));
        }

        renderer.draw_sprite_with(
            ship,
            Rect::new(368.0, 268.0, 64.0, 64.0),
            DrawParams::new()
                .rotation(self.ship_angle)
                .rotation_anchor(Vec2::splat(0.5)),
        );

        let label = self.last_stats.sprites.to_string();
        let width = font.measure(&label, 4.0).x;
        renderer.draw_string_with(
            font,
            &label,
            Vec2::new(790.0 - width, 10.0),
            Color::YELLOW,
            4.0,
        );
        renderer.draw_string_with(
            font,
            &self.last_stats.draw_calls.to_string(),
            Vec2::new(10.0, 10.0),
            Color::GREEN,
            4.0,
        );
    }

    fn frame_finished(&mut self, stats: &FrameStats) {
        self.last_stats = *stats;
    }
}

/// Soft round dot, premultiplied alpha.
fn star_pixels() -> Vec<u8> {
    let center = (STAR_SIZE as f32 - 1.0) / 2.0;
    let mut pixels = Vec::with_capacity((STAR_SIZE * STAR_SIZE * 4) as usize);
    for y in 0..STAR_SIZE {
        for x in 0..STAR_SIZE {
            let d = Vec2::new(x as f32 - center, y as f32 - center).length() / center;
            let a = ((1.0 - d).clamp(0.0, 1.0) * 255.0) as u8;
            pixels.extend_from_slice(&[a, a, a, a]);
        }
    }
    pixels
}

/// Upward-pointing triangle with a darker core.
fn ship_pixels() -> Vec<u8> {
    let size = SHIP_SIZE as f32;
    let mut pixels = Vec::with_capacity((SHIP_SIZE * SHIP_SIZE * 4) as usize);
    for y in 0..SHIP_SIZE {
        for x in 0..SHIP_SIZE {
            let half_width = (y as f32 + 1.0) / 2.0;
            let dx = (x as f32 + 0.5 - size / 2.0).abs();
            let pixel = if dx <= half_width {
                if dx < half_width / 3.0 { [80, 160, 255, 255] } else { [200, 220, 255, 255] }
            } else {
                [0, 0, 0, 0]
            };
            pixels.extend_from_slice(&pixel);
        }
    }
    pixels
}

fn digit_atlas() -> Vec<u8> {
    let width = GLYPH_STRIDE * DIGITS.len() as u32;
    let mut pixels = vec![0u8; (width * GLYPH_H * 4) as usize];
    for (digit, rows) in DIGITS.iter().enumerate() {
        for (y, row) in rows.iter().enumerate() {
            for (x, cell) in row.bytes().enumerate() {
                if cell == b'#' {
                    let px = digit as u32 * GLYPH_STRIDE + x as u32;
                    let i = ((y as u32 * width + px) * 4) as usize;
                    pixels[i..i + 4].copy_from_slice(&[255; 4]);
                }
            }
        }
    }
    pixels
}

fn digit_font(atlas: Texture) -> SpriteFont {
    let mut font = SpriteFont::new(atlas, GLYPH_H as f32 + 1.0);
    for (digit, ch) in ('0'..='9').enumerate() {
        let region = Rect::new(
            (digit as u32 * GLYPH_STRIDE) as f32,
            0.0,
            GLYPH_W as f32,
            GLYPH_H as f32,
        );
        font.insert_glyph(ch, region, GLYPH_STRIDE as f32, Vec2::ZERO);
    }
    font
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => RendererConfig::load(path)?,
        None => RendererConfig {
            window_title: String::from("vanta starfield"),
            clear_color: [0.02, 0.0, 0.06, 1.0],
            ..RendererConfig::default()
        },
    };

    App::new(config)?.run(Starfield::new())?;
    Ok(())
}
