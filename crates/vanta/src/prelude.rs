//! Convenience re-exports — `use vanta::prelude::*` for the common items.

pub use crate::app::{App, Game};
pub use crate::config::RendererConfig;
pub use crate::content::{Content, ContentBuilder};
pub use crate::error::{AppError, ConfigError, ContentError, RenderError};
pub use crate::input::{Input, KeyCode};
pub use crate::math::{CircleCollider, Mat4, Rect, Vec2, Vec3, Vec4};
pub use crate::render::{ClearColor, GpuContext};
pub use crate::render2d::{
    Camera, Color, DrawParams, FrameStats, Sprite, SpriteBackend, SpriteFont, SpriteRenderer,
    Texture, TextureHandle, TextureSource, WgpuBackend,
};
pub use crate::shooter::{Shooter, ShooterAssets};
pub use crate::time::Time;
