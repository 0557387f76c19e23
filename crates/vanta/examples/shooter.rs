//! Shooter — the space shooter from `vanta::shooter` with textures generated
//! at startup.
//!
//! Arrow keys move the ship. It fires on its own.
//!
//! Run with `RUST_LOG=vanta=debug cargo run --example shooter` to see the
//! per-frame batch statistics.

use rand::Rng;
use vanta::prelude::*;
use vanta::shooter::{EXPLOSION_COLUMNS, EXPLOSION_FRAME_SIZE, EXPLOSION_ROWS};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

/// Pixels per font cell in the generated atlas. The score is drawn at half
/// scale.
const CELL: u32 = 8;
const GLYPH_COLUMNS: u32 = 3;
const GLYPH_ROWS: u32 = 5;

/// 3×5 glyphs for everything the score line prints.
const GLYPHS: [(char, [&str; 5]); 17] = [
    ('0', ["###", "#.#", "#.#", "#.#", "###"]),
    ('1', [".#.", "##.", ".#.", ".#.", "###"]),
    ('2', ["###", "..#", "###", "#..", "###"]),
    ('3', ["###", "..#", "###", "..#", "###"]),
    ('4', ["#.#", "#.#", "###", "..#", "..#"]),
    ('5', ["###", "#..", "###", "..#", "###"]),
    ('6', ["###", "#..", "###", "#.#", "###"]),
    ('7', ["###", "..#", "..#", "..#", "..#"]),
    ('8', ["###", "#.#", "###", "#.#", "###"]),
    ('9', ["###", "#.#", "###", "..#", "###"]),
    ('S', ["###", "#..", "###", "..#", "###"]),
    ('c', ["...", "###", "#..", "#..", "###"]),
    ('o', ["...", "###", "#.#", "#.#", "###"]),
    ('r', ["...", "###", "#..", "#..", "#.."]),
    ('e', ["###", "#.#", "###", "#..", "###"]),
    (':', ["...", ".#.", "...", ".#.", "..."]),
    (' ', ["...", "...", "...", "...", "..."]),
];

struct ShooterGame {
    world: Option<Shooter>,
}

impl Game for ShooterGame {
    fn setup(&mut self, backend: &mut WgpuBackend) -> Result<(), ContentError> {
        let mut rng = rand::rng();
        let mut builder = Content::builder(backend);

        let ship = builder.add_rgba_texture("ship", 32, 32, &ship_pixels())?;
        builder.add_sprite(ShooterAssets::PLAYER, Sprite::from_texture(ship));
        let laser = builder.add_rgba_texture("laser", 4, 16, &laser_pixels())?;
        builder.add_sprite(ShooterAssets::LASER, Sprite::from_texture(laser));

        for name in ShooterAssets::METEORS {
            let size = if name.contains("big") { 44 } else { 28 };
            let tint = if name.contains("Brown") { [150, 100, 60] } else { [140, 140, 150] };
            let pixels = meteor_pixels(size, tint, &mut rng);
            let rock = builder.add_rgba_texture(name, size, size, &pixels)?;
            builder.add_sprite(name, Sprite::from_texture(rock));
        }

        let sheet_size = EXPLOSION_COLUMNS as u32 * EXPLOSION_FRAME_SIZE as u32;
        let explosion = explosion_sheet();
        builder.add_rgba_texture(ShooterAssets::EXPLOSION, sheet_size, sheet_size, &explosion)?;
        let background = background_pixels(&mut rng);
        builder.add_rgba_texture(ShooterAssets::BACKGROUND, 64, 64, &background)?;

        let atlas_width = GLYPHS.len() as u32 * GLYPH_COLUMNS * CELL;
        let atlas = builder.add_rgba_texture(
            "font-atlas",
            atlas_width,
            GLYPH_ROWS * CELL,
            &font_atlas(),
        )?;
        builder.insert_font(ShooterAssets::FONT, score_font(atlas));

        let content = builder.finish();
        let assets = ShooterAssets::from_content(&content)?;
        self.world = Some(Shooter::new(
            assets,
            Vec2::new(WIDTH as f32, HEIGHT as f32),
            rng.random(),
        ));
        Ok(())
    }

    fn update(&mut self, time: &Time, input: &Input) {
        if let Some(world) = &mut self.world {
            world.update(time.delta_secs(), input);
        }
    }

    fn draw(&mut self, renderer: &mut SpriteRenderer<WgpuBackend>) {
        if let Some(world) = &self.world {
            world.draw(renderer);
        }
    }
}

fn ship_pixels() -> Vec<u8> {
    let mut pixels = Vec::with_capacity(32 * 32 * 4);
    for y in 0..32 {
        for x in 0..32 {
            let half_width = (y as f32 + 1.0) / 2.0;
            let dx = (x as f32 + 0.5 - 16.0).abs();
            let pixel = if dx > half_width {
                [0, 0, 0, 0]
            } else if dx < half_width / 3.0 {
                [40, 120, 255, 255]
            } else {
                [190, 210, 255, 255]
            };
            pixels.extend_from_slice(&pixel);
        }
    }
    pixels
}

fn laser_pixels() -> Vec<u8> {
    (0..4 * 16)
        .flat_map(|i| {
            if i % 4 == 0 || i % 4 == 3 {
                [30, 60, 200, 255]
            } else {
                [140, 220, 255, 255]
            }
        })
        .collect()
}

/// A lumpy disc, premultiplied alpha.
fn meteor_pixels(size: u32, tint: [u8; 3], rng: &mut impl Rng) -> Vec<u8> {
    let center = (size as f32 - 1.0) / 2.0;
    let bumps: [f32; 8] = std::array::from_fn(|_| rng.random_range(0.8..1.0));
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let offset = Vec2::new(x as f32 - center, y as f32 - center);
            let sector = ((offset.to_angle() + std::f32::consts::PI) / std::f32::consts::TAU * 8.0)
                as usize
                % 8;
            let inside = offset.length() <= center * bumps[sector];
            let shade = rng.random_range(0.8..1.0);
            let pixel = if inside {
                [
                    (tint[0] as f32 * shade) as u8,
                    (tint[1] as f32 * shade) as u8,
                    (tint[2] as f32 * shade) as u8,
                    255,
                ]
            } else {
                [0, 0, 0, 0]
            };
            pixels.extend_from_slice(&pixel);
        }
    }
    pixels
}

/// Expanding, fading fireball, one frame per 32×32 cell.
fn explosion_sheet() -> Vec<u8> {
    let frame = EXPLOSION_FRAME_SIZE as usize;
    let width = EXPLOSION_COLUMNS * frame;
    let height = EXPLOSION_ROWS * frame;
    let frames = (EXPLOSION_COLUMNS * EXPLOSION_ROWS) as f32;
    let mut pixels = vec![0u8; width * height * 4];

    for y in 0..height {
        for x in 0..width {
            let index = (y / frame) * EXPLOSION_COLUMNS + x / frame;
            let t = (index as f32 + 1.0) / frames;
            let d = Vec2::new((x % frame) as f32 - 15.5, (y % frame) as f32 - 15.5).length();
            let radius = 4.0 + t * 12.0;
            if d <= radius {
                let fade = (1.0 - t) * (1.0 - 0.5 * d / radius);
                let a = fade * 255.0;
                let px = [a, a * (0.9 - 0.6 * t), a * 0.2 * (1.0 - t), a];
                let i = (y * width + x) * 4;
                for (dst, src) in pixels[i..i + 4].iter_mut().zip(px) {
                    *dst = src as u8;
                }
            }
        }
    }
    pixels
}

/// Dark purple with scattered bright specks.
fn background_pixels(rng: &mut impl Rng) -> Vec<u8> {
    (0..64 * 64)
        .flat_map(|_| {
            if rng.random_ratio(1, 40) {
                [220, 210, 255, 255]
            } else {
                [30, 12, 48, 255]
            }
        })
        .collect()
}

fn font_atlas() -> Vec<u8> {
    let width = GLYPHS.len() as u32 * GLYPH_COLUMNS * CELL;
    let mut pixels = vec![0u8; (width * GLYPH_ROWS * CELL * 4) as usize];
    for (slot, (_, rows)) in GLYPHS.iter().enumerate() {
        for (row, cells) in rows.iter().enumerate() {
            for (column, cell) in cells.bytes().enumerate() {
                if cell != b'#' {
                    continue;
                }
                let left = (slot as u32 * GLYPH_COLUMNS + column as u32) * CELL;
                let top = row as u32 * CELL;
                for y in top..top + CELL {
                    let start = ((y * width + left) * 4) as usize;
                    pixels[start..start + (CELL * 4) as usize].fill(255);
                }
            }
        }
    }
    pixels
}

fn score_font(atlas: Texture) -> SpriteFont {
    let glyph_width = (GLYPH_COLUMNS * CELL) as f32;
    let mut font = SpriteFont::new(atlas, ((GLYPH_ROWS + 1) * CELL) as f32);
    for (slot, (ch, _)) in GLYPHS.iter().enumerate() {
        let region = Rect::new(
            slot as f32 * glyph_width,
            0.0,
            glyph_width,
            (GLYPH_ROWS * CELL) as f32,
        );
        font.insert_glyph(*ch, region, glyph_width + CELL as f32, Vec2::ZERO);
    }
    font
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = RendererConfig {
        window_title: String::from("vanta shooter"),
        window_width: WIDTH,
        window_height: HEIGHT,
        ..RendererConfig::default()
    };
    App::new(config)?.run(ShooterGame { world: None })?;
    Ok(())
}
