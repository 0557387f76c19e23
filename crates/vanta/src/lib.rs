//! # Vanta — Batched 2D Sprite Rendering
//!
//! A small 2D renderer built on wgpu. Game code issues sprite, sub-region
//! and text draws in any order. Vanta groups them by texture into
//! fixed-capacity batches and submits one indexed draw call per batch,
//! reusing vertex buffers across frames.
//!
//! Alongside the renderer:
//!
//! - [`math`]: `Rect` and `CircleCollider` overlap tests,
//! - [`content`]: a registry of textures, sprite sheets and bitmap fonts,
//! - [`shooter`]: a small space shooter (player, meteors, bullets,
//!   explosions) built on the pieces above,
//! - [`app`]: an optional winit game loop with keyboard [`input`].
//!
//! Start with `use vanta::prelude::*` and implement [`Game`](app::Game).

pub mod app;
pub mod config;
pub mod content;
pub mod error;
pub mod input;
pub mod math;
pub mod prelude;
pub mod render;
pub mod render2d;
pub mod shooter;
pub mod time;

mod window;
